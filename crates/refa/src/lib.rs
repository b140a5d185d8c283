//! Conversions between regular expressions and finite automata:
//! regex to NFA (Thompson), NFA to DFA (subset construction), DFA to regex
//! (state elimination) and DFA minimization (table filling).

mod eliminate;
mod fa;
mod label;
mod minimize;
pub mod regex;
pub mod schema;
mod subset;
mod thompson;

#[cfg(test)]
mod regex_tests;

pub use eliminate::StateEliminator;
pub use fa::{AutomatonError, Dfa, FANode, Nfa, EPSILON};
pub use label::StateLabel;
pub use minimize::DfaMinimizer;
pub use regex::RegexError;
pub use subset::{SubsetConstructor, SubsetError, SubsetStrategy, MAX_POWER_SET_STATES};
pub use thompson::ThompsonBuilder;
