//! Interchange form shared by every stage.
//!
//! ```json
//! {
//!     "states": ["q0", "q1"],
//!     "letters": ["a"],
//!     "transition_function": [["q0", "a", "q1"]],
//!     "start_states": ["q0"],
//!     "final_states": ["q1"]
//! }
//! ```
//!
//! Epsilon moves of an NFA use the symbol `$`. A DFA transition has exactly one
//! target; an NFA transition may list several targets in an array, unless that
//! array is itself the label of a declared (composite) state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::fa::{AutomatonError, Dfa, FANode, Nfa, EPSILON};
use crate::label::StateLabel;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionDef(pub StateLabel, pub char, pub StateLabel);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomatonDef {
    pub states: Vec<StateLabel>,
    pub letters: Vec<char>,
    pub transition_function: Vec<TransitionDef>,
    pub start_states: Vec<StateLabel>,
    pub final_states: Vec<StateLabel>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegexDef {
    pub regex: String,
}

struct StateIndex<'a> {
    ids: HashMap<&'a StateLabel, usize>,
}

impl<'a> StateIndex<'a> {
    fn new(states: &'a [StateLabel]) -> Result<StateIndex<'a>, AutomatonError> {
        let mut ids = HashMap::with_capacity(states.len());
        for (i, state) in states.iter().enumerate() {
            if ids.insert(state, i).is_some() {
                return Err(AutomatonError::DuplicateState(state.clone()));
            }
        }
        Ok(StateIndex { ids })
    }

    fn get(&self, label: &StateLabel) -> Result<usize, AutomatonError> {
        self.ids
            .get(label)
            .copied()
            .ok_or_else(|| AutomatonError::UnknownState(label.clone()))
    }

    fn get_all(&self, labels: &[StateLabel]) -> Result<Vec<usize>, AutomatonError> {
        let mut ids: Vec<usize> = Vec::with_capacity(labels.len());
        for label in labels {
            let id = self.get(label)?;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    // an NFA target is either one declared state or an array of them
    fn targets(&self, label: &StateLabel) -> Result<Vec<usize>, AutomatonError> {
        match (self.ids.get(label), label) {
            (Some(id), _) => Ok(vec![*id]),
            (None, StateLabel::Set(members)) => members.iter().map(|x| self.get(x)).collect(),
            (None, _) => Err(AutomatonError::UnknownState(label.clone())),
        }
    }
}

impl AutomatonDef {
    fn alphabet(&self) -> Vec<char> {
        let mut alphabet: Vec<char> = self
            .letters
            .iter()
            .copied()
            .filter(|c| *c != EPSILON)
            .collect();
        alphabet.sort_unstable();
        alphabet.dedup();
        alphabet
    }

    fn nodes<L>(&self) -> Vec<FANode<L>> {
        self.states.iter().cloned().map(FANode::new).collect()
    }
}

impl TryFrom<&AutomatonDef> for Nfa {
    type Error = AutomatonError;

    fn try_from(def: &AutomatonDef) -> Result<Self, Self::Error> {
        let index = StateIndex::new(&def.states)?;
        let alphabet = def.alphabet();
        let mut nodes: Vec<FANode<Option<char>>> = def.nodes();

        for TransitionDef(from, symbol, to) in &def.transition_function {
            let from = index.get(from)?;
            let label = match *symbol {
                EPSILON => None,
                c if alphabet.binary_search(&c).is_ok() => Some(c),
                c => return Err(AutomatonError::UnknownSymbol(c)),
            };

            for next in index.targets(to)? {
                if !nodes[from].transitions.contains(&(label, next)) {
                    nodes[from].transitions.push((label, next));
                }
            }
        }

        let initial_states = index.get_all(&def.start_states)?;
        if initial_states.is_empty() {
            return Err(AutomatonError::NoStartState);
        }

        Ok(Nfa {
            nodes,
            alphabet,
            initial_states,
            accept_states: index.get_all(&def.final_states)?,
        })
    }
}

impl TryFrom<&AutomatonDef> for Dfa {
    type Error = AutomatonError;

    fn try_from(def: &AutomatonDef) -> Result<Self, Self::Error> {
        let index = StateIndex::new(&def.states)?;
        let alphabet = def.alphabet();
        let mut nodes: Vec<FANode<char>> = def.nodes();

        for TransitionDef(from, symbol, to) in &def.transition_function {
            let from_id = index.get(from)?;
            let to = index.get(to)?;
            let c = match *symbol {
                EPSILON => return Err(AutomatonError::EpsilonInDfa(from.clone())),
                c if alphabet.binary_search(&c).is_ok() => c,
                c => return Err(AutomatonError::UnknownSymbol(c)),
            };

            let node = &mut nodes[from_id];
            match node.transitions.iter().find(|(label, _)| *label == c) {
                Some((_, existing)) if *existing == to => (),
                Some(_) => return Err(AutomatonError::Nondeterministic(from.clone(), c)),
                None => node.transitions.push((c, to)),
            }
        }

        let initial_states = index.get_all(&def.start_states)?;
        if initial_states.is_empty() {
            return Err(AutomatonError::NoStartState);
        }

        Ok(Dfa {
            nodes,
            alphabet,
            initial_states,
            accept_states: index.get_all(&def.final_states)?,
        })
    }
}

fn labels_of<L>(nodes: &[FANode<L>], states: &[usize]) -> Vec<StateLabel> {
    states.iter().map(|x| nodes[*x].label.clone()).collect()
}

impl From<&Nfa> for AutomatonDef {
    fn from(nfa: &Nfa) -> Self {
        let transition_function = nfa
            .nodes
            .iter()
            .flat_map(|node| {
                node.transitions.iter().map(|(label, next)| {
                    TransitionDef(
                        node.label.clone(),
                        label.unwrap_or(EPSILON),
                        nfa.nodes[*next].label.clone(),
                    )
                })
            })
            .collect();

        AutomatonDef {
            states: nfa.nodes.iter().map(|node| node.label.clone()).collect(),
            letters: nfa.alphabet.clone(),
            transition_function,
            start_states: labels_of(&nfa.nodes, &nfa.initial_states),
            final_states: labels_of(&nfa.nodes, &nfa.accept_states),
        }
    }
}

impl From<&Dfa> for AutomatonDef {
    fn from(dfa: &Dfa) -> Self {
        let transition_function = dfa
            .nodes
            .iter()
            .flat_map(|node| {
                node.transitions.iter().map(|(c, next)| {
                    TransitionDef(node.label.clone(), *c, dfa.nodes[*next].label.clone())
                })
            })
            .collect();

        AutomatonDef {
            states: dfa.nodes.iter().map(|node| node.label.clone()).collect(),
            letters: dfa.alphabet.clone(),
            transition_function,
            start_states: labels_of(&dfa.nodes, &dfa.initial_states),
            final_states: labels_of(&dfa.nodes, &dfa.accept_states),
        }
    }
}
