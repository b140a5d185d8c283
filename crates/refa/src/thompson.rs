use std::collections::BTreeSet;

use crate::fa::{FANode, Nfa};
use crate::label::StateLabel;
use crate::regex::{self, Postfix, RegexError, Token};

// states are arena indices; `states` keeps the order in which the fragment
// absorbed them, which becomes the numbering of the final NFA
#[derive(Debug)]
struct Fragment {
    states: Vec<usize>,
    start: usize,
    accept: usize,
}

/// Builds an NFA from postfix tokens using Thompson's construction.
#[derive(Debug, Default)]
pub struct ThompsonBuilder {
    transitions: Vec<Vec<(Option<char>, usize)>>,
    alphabet: BTreeSet<char>,
    stack: Vec<Fragment>,
}

impl ThompsonBuilder {
    pub fn new() -> ThompsonBuilder {
        ThompsonBuilder::default()
    }

    fn fresh_state(&mut self) -> usize {
        self.transitions.push(Vec::new());
        self.transitions.len() - 1
    }

    fn link(&mut self, from: usize, label: Option<char>, to: usize) {
        self.transitions[from].push((label, to));
    }

    fn pop(&mut self, op: Token) -> Result<Fragment, RegexError> {
        self.stack.pop().ok_or(RegexError::MissingOperand(op))
    }

    fn push_atom(&mut self, label: Option<char>) {
        let start = self.fresh_state();
        let accept = self.fresh_state();
        self.link(start, label, accept);
        if let Some(c) = label {
            self.alphabet.insert(c);
        }

        self.stack.push(Fragment {
            states: vec![start, accept],
            start,
            accept,
        });
    }

    pub fn push_token(&mut self, token: Token) -> Result<(), RegexError> {
        match token {
            Token::Symbol(c) => self.push_atom(Some(c)),
            Token::Epsilon => self.push_atom(None),
            Token::Concat => {
                let mut n2 = self.pop(token)?;
                let mut n1 = self.pop(token)?;
                self.link(n1.accept, None, n2.start);

                n1.states.append(&mut n2.states);
                self.stack.push(Fragment {
                    states: n1.states,
                    start: n1.start,
                    accept: n2.accept,
                });
            }
            Token::Union => {
                let mut n2 = self.pop(token)?;
                let mut n1 = self.pop(token)?;
                let start = self.fresh_state();
                let accept = self.fresh_state();
                self.link(start, None, n1.start);
                self.link(start, None, n2.start);
                self.link(n1.accept, None, accept);
                self.link(n2.accept, None, accept);

                n1.states.append(&mut n2.states);
                n1.states.extend([start, accept]);
                self.stack.push(Fragment {
                    states: n1.states,
                    start,
                    accept,
                });
            }
            Token::Star => {
                let mut n1 = self.pop(token)?;
                let start = self.fresh_state();
                let accept = self.fresh_state();
                self.link(start, None, n1.start);
                self.link(n1.accept, None, accept);
                self.link(start, None, accept);
                self.link(n1.accept, None, n1.start);

                n1.states.extend([start, accept]);
                self.stack.push(Fragment {
                    states: n1.states,
                    start,
                    accept,
                });
            }
            Token::LeftParen | Token::RightParen => return Err(RegexError::UnmatchedParenthesis),
        }

        Ok(())
    }

    /// Takes the single remaining fragment and renumbers its states `q0, q1, ...`
    /// in absorption order.
    pub fn finish(mut self) -> Result<Nfa, RegexError> {
        let fragment = match self.stack.len() {
            0 => return Err(RegexError::Empty),
            1 => self.stack.pop().ok_or(RegexError::Empty)?,
            n => return Err(RegexError::DanglingOperands(n)),
        };

        let mut remap: Vec<usize> = vec![0; self.transitions.len()];
        for (new, old) in fragment.states.iter().enumerate() {
            remap[*old] = new;
        }

        let nodes: Vec<FANode<Option<char>>> = fragment
            .states
            .iter()
            .enumerate()
            .map(|(new, old)| FANode {
                label: StateLabel::Name(format!("q{}", new)),
                transitions: self.transitions[*old]
                    .iter()
                    .map(|(label, next)| (*label, remap[*next]))
                    .collect(),
            })
            .collect();

        Ok(Nfa {
            nodes,
            alphabet: self.alphabet.into_iter().collect(),
            initial_states: vec![remap[fragment.start]],
            accept_states: vec![remap[fragment.accept]],
        })
    }

    pub fn build(postfix: &Postfix) -> Result<Nfa, RegexError> {
        let mut builder = ThompsonBuilder::new();
        for token in postfix.tokens() {
            builder.push_token(*token)?;
        }
        builder.finish()
    }
}

impl Nfa {
    // creates a NFA from a regex using Thompson's Construction
    // guaranteed to only have one accept state
    pub fn from_regex(re_str: &str) -> Result<Nfa, RegexError> {
        let postfix = regex::parse(re_str)?;
        ThompsonBuilder::build(&postfix)
    }
}
