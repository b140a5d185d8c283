use std::collections::{HashMap, VecDeque};

use bit_set::BitSet;
use thiserror::Error;

use crate::fa::{Dfa, FANode, Nfa};
use crate::label::StateLabel;

/// Largest NFA the power-set strategy will enumerate (2^20 subsets).
pub const MAX_POWER_SET_STATES: usize = 20;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubsetStrategy {
    /// Every subset of NFA states becomes a DFA state, reachable or not.
    /// Subset `i` holds NFA state `k` iff bit `k` of `i` is set.
    #[default]
    PowerSet,
    /// Only subsets reachable from the start closure, discovered breadth first.
    /// The empty subset is kept as an explicit dead state.
    Reachable,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubsetError {
    #[error("power set of {states} NFA states is too large (limit is {limit})")]
    PowerSetTooLarge { states: usize, limit: usize },
}

pub struct SubsetConstructor<'a> {
    nfa: &'a Nfa,
    closures: Vec<BitSet>,
}

impl<'a> SubsetConstructor<'a> {
    pub fn new(nfa: &'a Nfa) -> SubsetConstructor<'a> {
        let closures = (0..nfa.num_states())
            .map(|state| {
                let mut closure = BitSet::with_capacity(nfa.num_states());
                closure.insert(state);
                nfa.epsilon_closure(&mut closure);
                closure
            })
            .collect();

        SubsetConstructor { nfa, closures }
    }

    pub fn closure(&self, state: usize) -> &BitSet {
        &self.closures[state]
    }

    pub fn start(&self) -> BitSet {
        let mut start = BitSet::with_capacity(self.nfa.num_states());
        for state in &self.nfa.initial_states {
            start.union_with(&self.closures[*state]);
        }
        start
    }

    /// Closure of every state reachable on `c` from the closure of `subset`.
    pub fn transition(&self, subset: &BitSet, c: char) -> BitSet {
        let mut result = BitSet::with_capacity(self.nfa.num_states());

        for state in subset.iter() {
            for member in self.closures[state].iter() {
                for (label, next) in &self.nfa.nodes[member].transitions {
                    if *label == Some(c) {
                        result.union_with(&self.closures[*next]);
                    }
                }
            }
        }

        result
    }

    fn label(&self, subset: &BitSet) -> StateLabel {
        StateLabel::set(subset.iter().map(|x| self.nfa.nodes[x].label.clone()))
    }

    fn is_accepting(&self, subset: &BitSet) -> bool {
        self.nfa.accept_states.iter().any(|x| subset.contains(*x))
    }

    fn mask(subset: &BitSet) -> usize {
        subset.iter().fold(0, |mask, bit| mask | (1usize << bit))
    }

    pub fn power_set(&self) -> Result<Dfa, SubsetError> {
        let n = self.nfa.num_states();
        if n > MAX_POWER_SET_STATES {
            return Err(SubsetError::PowerSetTooLarge {
                states: n,
                limit: MAX_POWER_SET_STATES,
            });
        }

        let subsets: Vec<BitSet> = (0..1usize << n)
            .map(|mask| (0..n).filter(|bit| mask & (1usize << *bit) != 0).collect())
            .collect();

        let nodes: Vec<FANode<char>> = subsets
            .iter()
            .map(|subset| FANode {
                label: self.label(subset),
                transitions: self
                    .nfa
                    .alphabet
                    .iter()
                    .map(|c| (*c, Self::mask(&self.transition(subset, *c))))
                    .collect(),
            })
            .collect();

        let accept_states: Vec<usize> = subsets
            .iter()
            .enumerate()
            .filter(|(_, subset)| self.is_accepting(subset))
            .map(|(i, _)| i)
            .collect();

        Ok(Dfa {
            nodes,
            alphabet: self.nfa.alphabet.clone(),
            initial_states: vec![Self::mask(&self.start())],
            accept_states,
        })
    }

    pub fn reachable(&self) -> Dfa {
        let start = self.start();

        // configuration -> id
        let mut ids: HashMap<BitSet, usize> = HashMap::new();
        let mut subsets: Vec<BitSet> = Vec::new();
        let mut transitions: Vec<Vec<(char, usize)>> = Vec::new();

        ids.insert(start.clone(), 0);
        subsets.push(start);
        transitions.push(Vec::new());

        let mut work_queue: VecDeque<usize> = VecDeque::new();
        work_queue.push_back(0);

        while let Some(q) = work_queue.pop_front() {
            for c in &self.nfa.alphabet {
                let t = self.transition(&subsets[q], *c);
                let target = match ids.get(&t) {
                    Some(id) => *id,
                    None => {
                        let id = subsets.len();
                        ids.insert(t.clone(), id);
                        subsets.push(t);
                        transitions.push(Vec::new());
                        work_queue.push_back(id);
                        id
                    }
                };
                transitions[q].push((*c, target));
            }
        }

        let accept_states: Vec<usize> = subsets
            .iter()
            .enumerate()
            .filter(|(_, subset)| self.is_accepting(subset))
            .map(|(i, _)| i)
            .collect();

        let nodes: Vec<FANode<char>> = subsets
            .iter()
            .zip(transitions)
            .map(|(subset, transitions)| FANode {
                label: self.label(subset),
                transitions,
            })
            .collect();

        Dfa {
            nodes,
            alphabet: self.nfa.alphabet.clone(),
            initial_states: vec![0],
            accept_states,
        }
    }
}

impl Dfa {
    // creates a DFA from an NFA using subset construction
    pub fn from_nfa(nfa: &Nfa, strategy: SubsetStrategy) -> Result<Dfa, SubsetError> {
        let constructor = SubsetConstructor::new(nfa);
        match strategy {
            SubsetStrategy::PowerSet => constructor.power_set(),
            SubsetStrategy::Reachable => Ok(constructor.reachable()),
        }
    }
}
