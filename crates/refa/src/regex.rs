// regex syntax accepted here, loosest binding first:
// <regex>  ::= <regex> '+' <term>            (union)
//           |  <term>
// <term>   ::= <term> <factor>               (concatenation, implicit)
//           |  <factor>
// <factor> ::= <base> { '*' }
// <base>   ::= <word char> | '$' | '(' <regex> ')'
//
// '$' stands for the empty string. No tree is built: the source is validated,
// made explicit (concatenation becomes a '.' token) and reordered to postfix
// with an operator stack. Thompson construction then consumes the postfix form.

use std::fmt;

use thiserror::Error;

use crate::fa::EPSILON;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    Symbol(char),
    Epsilon,
    Concat,
    Union,
    Star,
    LeftParen,
    RightParen,
}

impl Token {
    fn precedence(self) -> u8 {
        match self {
            Token::Star => 3,
            Token::Concat => 2,
            Token::Union => 1,
            _ => 0,
        }
    }

    // can the token end an operand, i.e. be followed by an implicit concatenation
    fn ends_operand(self) -> bool {
        matches!(
            self,
            Token::Symbol(_) | Token::Epsilon | Token::RightParen | Token::Star
        )
    }

    fn starts_operand(self) -> bool {
        matches!(self, Token::Symbol(_) | Token::Epsilon | Token::LeftParen)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Token::Symbol(c) => *c,
            Token::Epsilon => EPSILON,
            Token::Concat => '.',
            Token::Union => '+',
            Token::Star => '*',
            Token::LeftParen => '(',
            Token::RightParen => ')',
        };
        write!(f, "{}", c)
    }
}

/// A regex in reverse polish order. Contains no parentheses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Postfix(pub(crate) Vec<Token>);

impl Postfix {
    pub fn tokens(&self) -> &[Token] {
        &self.0
    }
}

impl fmt::Display for Postfix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.0 {
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegexError {
    #[error("Malformed regex: expression is empty")]
    Empty,
    #[error("Malformed regex: character '{0}' is not allowed")]
    DisallowedCharacter(char),
    #[error("Malformed regex: unbalanced parentheses")]
    UnbalancedParentheses,
    #[error("Malformed regex: ')' has no matching '('")]
    UnmatchedParenthesis,
    #[error("Malformed regex: '{0}' is missing an operand")]
    MissingOperand(Token),
    #[error("Malformed regex: {0} subexpressions are not joined by an operator")]
    DanglingOperands(usize),
}

/// Characters a regex may use as alphabet symbols.
pub fn is_symbol(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn tokenize(input: &str) -> Result<Vec<Token>, RegexError> {
    input
        .chars()
        .map(|c| match c {
            '(' => Ok(Token::LeftParen),
            ')' => Ok(Token::RightParen),
            '*' => Ok(Token::Star),
            '+' => Ok(Token::Union),
            EPSILON => Ok(Token::Epsilon),
            c if is_symbol(c) => Ok(Token::Symbol(c)),
            c => Err(RegexError::DisallowedCharacter(c)),
        })
        .collect()
}

fn check_parentheses(tokens: &[Token]) -> Result<(), RegexError> {
    let mut depth: usize = 0;
    for token in tokens {
        match token {
            Token::LeftParen => depth += 1,
            Token::RightParen => {
                depth = depth
                    .checked_sub(1)
                    .ok_or(RegexError::UnbalancedParentheses)?;
            }
            _ => (),
        }
    }

    if depth == 0 {
        Ok(())
    } else {
        Err(RegexError::UnbalancedParentheses)
    }
}

// makes concatenation explicit and wraps everything in one outer group
fn insert_concatenation(tokens: &[Token]) -> Vec<Token> {
    let mut explicit: Vec<Token> = Vec::with_capacity(tokens.len() * 2 + 2);
    explicit.push(Token::LeftParen);

    for (i, token) in tokens.iter().enumerate() {
        explicit.push(*token);
        if let Some(next) = tokens.get(i + 1) {
            if token.ends_operand() && next.starts_operand() {
                explicit.push(Token::Concat);
            }
        }
    }

    explicit.push(Token::RightParen);
    explicit
}

fn to_postfix(tokens: &[Token]) -> Result<Postfix, RegexError> {
    let mut output: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut operators: Vec<Token> = Vec::new();

    for token in tokens.iter().copied() {
        match token {
            // star is already postfix, so it goes straight to the output
            Token::Symbol(_) | Token::Epsilon | Token::Star => output.push(token),
            Token::LeftParen => operators.push(token),
            Token::RightParen => loop {
                match operators.pop() {
                    Some(Token::LeftParen) => break,
                    Some(op) => output.push(op),
                    None => return Err(RegexError::UnmatchedParenthesis),
                }
            },
            Token::Concat | Token::Union => match operators.last().copied() {
                None | Some(Token::LeftParen) => operators.push(token),
                Some(top) if token.precedence() > top.precedence() => operators.push(token),
                Some(top) if token.precedence() == top.precedence() => output.push(token),
                Some(_) => {
                    while let Some(top) = operators.last().copied() {
                        if top == Token::LeftParen || top.precedence() <= token.precedence() {
                            break;
                        }
                        output.push(top);
                        operators.pop();
                    }
                    operators.push(token);
                }
            },
        }
    }

    while let Some(op) = operators.pop() {
        if op == Token::LeftParen {
            return Err(RegexError::UnbalancedParentheses);
        }
        output.push(op);
    }

    Ok(Postfix(output))
}

/// Validates `input` and converts it to postfix order.
pub fn parse(input: &str) -> Result<Postfix, RegexError> {
    if input.is_empty() {
        return Err(RegexError::Empty);
    }

    let tokens = tokenize(input)?;
    check_parentheses(&tokens)?;
    let explicit = insert_concatenation(&tokens);
    to_postfix(&explicit)
}
