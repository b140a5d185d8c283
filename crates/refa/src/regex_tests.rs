use crate::eliminate::{concat, kleene, union};
use crate::regex::{parse, RegexError, Token};
use crate::thompson::ThompsonBuilder;
use crate::Nfa;

fn postfix(re_str: &str) -> String {
    parse(re_str).expect("failed to parse regex").to_string()
}

#[test]
fn postfix_basic() {
    assert_eq!(postfix("a"), "a");
    assert_eq!(postfix("ab"), "ab.");
    assert_eq!(postfix("a+b"), "ab+");
    assert_eq!(postfix("a*b"), "a*b.");
    assert_eq!(postfix("(a+b)*"), "ab+*");
}

#[test]
fn postfix_precedence() {
    // concatenation binds tighter than union
    assert_eq!(postfix("a+bc"), "abc.+");
    assert_eq!(postfix("ab+c"), "ab.c+");
    // equal precedence is emitted right away, giving left associativity
    assert_eq!(postfix("abc"), "ab.c.");
    assert_eq!(postfix("a+b+c"), "ab+c+");
}

#[test]
fn postfix_implicit_concatenation() {
    assert_eq!(postfix("a(b)"), "ab.");
    assert_eq!(postfix("(a)(b)"), "ab.");
    assert_eq!(postfix("(a)b"), "ab.");
    assert_eq!(postfix("a*(b)"), "a*b.");
    assert_eq!(postfix("a*b*"), "a*b*.");
    assert_eq!(postfix("$a"), "$a.");
}

#[test]
fn alphabet_check() {
    assert_eq!(parse("a#b"), Err(RegexError::DisallowedCharacter('#')));
    assert_eq!(parse("a.b"), Err(RegexError::DisallowedCharacter('.')));
    assert_eq!(parse("a b"), Err(RegexError::DisallowedCharacter(' ')));
    assert!(parse("A_9z").is_ok());
}

#[test]
fn unbalanced_parentheses() {
    assert_eq!(parse("a(b"), Err(RegexError::UnbalancedParentheses));
    assert_eq!(parse("a)b("), Err(RegexError::UnbalancedParentheses));
    assert_eq!(parse("(a))"), Err(RegexError::UnbalancedParentheses));
    assert_eq!(parse(""), Err(RegexError::Empty));
}

#[test]
fn missing_operands() {
    let build = |re_str: &str| parse(re_str).and_then(|postfix| ThompsonBuilder::build(&postfix));

    assert_eq!(build("+a").unwrap_err(), RegexError::MissingOperand(Token::Union));
    assert_eq!(build("*").unwrap_err(), RegexError::MissingOperand(Token::Star));
    assert_eq!(build("()").unwrap_err(), RegexError::Empty);
    assert!(build("a()b").is_err());
}

#[test]
fn thompson_symbol() {
    let nfa = Nfa::from_regex("a").expect("failed to build nfa");
    assert_eq!(nfa.num_states(), 2);
    assert_eq!(nfa.alphabet(), &['a']);
    assert_eq!(nfa.initial_states(), &[0]);
    assert_eq!(nfa.accept_states(), &[1]);
    assert_eq!(nfa.nodes()[0].transitions(), &[(Some('a'), 1)]);
    assert_eq!(nfa.nodes()[1].label().to_string(), "q1");
}

#[test]
fn thompson_fragment_sizes() {
    // two states per symbol, two more per union and star
    assert_eq!(Nfa::from_regex("ab").unwrap().num_states(), 4);
    assert_eq!(Nfa::from_regex("a+b").unwrap().num_states(), 6);
    assert_eq!(Nfa::from_regex("a*").unwrap().num_states(), 4);
    assert_eq!(Nfa::from_regex("(a+b)*").unwrap().num_states(), 8);
}

#[test]
fn thompson_star_layout() {
    let nfa = Nfa::from_regex("a*").unwrap();
    // q0 -a-> q1 is the operand, q2/q3 are the new start/accept
    assert_eq!(nfa.initial_states(), &[2]);
    assert_eq!(nfa.accept_states(), &[3]);
    assert_eq!(nfa.nodes()[2].transitions(), &[(None, 0), (None, 3)]);
    assert_eq!(nfa.nodes()[1].transitions(), &[(None, 3), (None, 0)]);
}

#[test]
fn thompson_epsilon_literal() {
    let nfa = Nfa::from_regex("$").unwrap();
    assert!(nfa.alphabet().is_empty());
    assert!(nfa.accepts(""));
    assert!(!nfa.accepts("a"));

    let nfa = Nfa::from_regex("a($+b)").unwrap();
    assert_eq!(nfa.alphabet(), &['a', 'b']);
    assert!(nfa.accepts("a"));
    assert!(nfa.accepts("ab"));
    assert!(!nfa.accepts("b"));
}

#[test]
fn algebra_helpers() {
    assert_eq!(concat("a", ""), "");
    assert_eq!(concat("", "a"), "");
    assert_eq!(concat("$", "a"), "a");
    assert_eq!(concat("a", "$"), "a");
    assert_eq!(concat("$", "$"), "$");
    assert_eq!(concat("a", "b"), "ab");

    assert_eq!(union("a", ""), "a");
    assert_eq!(union("", "b"), "b");
    assert_eq!(union("a", "b"), "(a+b)");

    assert_eq!(kleene(""), "$");
    assert_eq!(kleene("$"), "$");
    assert_eq!(kleene("a"), "a*");
    assert_eq!(kleene("(a+b)"), "(a+b)*");
    assert_eq!(kleene("ab"), "(ab)*");
    // starts and ends with a parenthesis, but is not one group
    assert_eq!(kleene("(a+b)(c+d)"), "((a+b)(c+d))*");
}
