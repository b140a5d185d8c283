use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Persisted identity of an automaton state.
///
/// Thompson construction names its states `q0, q1, ...`. Subset construction
/// and minimization produce composite states, identified by the sorted list of
/// the labels they stand for; minimizing a subset-constructed DFA therefore
/// nests one composite inside another.
///
/// Composites read from JSON are normalized like [`StateLabel::set`], so
/// `["q2", "q0"]` and `["q0", "q2"]` name the same state.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum StateLabel {
    Name(String),
    Set(Vec<StateLabel>),
}

impl StateLabel {
    // members are sorted and deduplicated so that set equality is label equality
    pub fn set(members: impl IntoIterator<Item = StateLabel>) -> StateLabel {
        let mut members: Vec<StateLabel> = members.into_iter().collect();
        members.sort();
        members.dedup();
        StateLabel::Set(members)
    }

    pub fn is_empty_set(&self) -> bool {
        matches!(self, StateLabel::Set(members) if members.is_empty())
    }
}

impl<'de> Deserialize<'de> for StateLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Name(String),
            Set(Vec<StateLabel>),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Name(name) => StateLabel::Name(name),
            Raw::Set(members) => StateLabel::set(members),
        })
    }
}

impl From<&str> for StateLabel {
    fn from(value: &str) -> Self {
        StateLabel::Name(value.to_string())
    }
}

impl fmt::Display for StateLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateLabel::Name(name) => write!(f, "{}", name),
            StateLabel::Set(members) => {
                write!(f, "{{")?;
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", member)?;
                }
                write!(f, "}}")
            }
        }
    }
}
