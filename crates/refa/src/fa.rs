use std::collections::VecDeque;

use bit_set::BitSet;
use thiserror::Error;

use crate::label::StateLabel;

/// Reserved marker for the empty string, both in regex sources and as the
/// persisted label of an epsilon transition.
pub const EPSILON: char = '$';

// pointer-based graphs in safe rust are somewhat tricky, so just do indices to keep things simple
#[derive(Debug, Clone)]
pub struct FANode<L> {
    pub(crate) label: StateLabel,
    pub(crate) transitions: Vec<(L, usize)>,
}

impl<L> FANode<L> {
    pub(crate) fn new(label: StateLabel) -> FANode<L> {
        FANode {
            label,
            transitions: Vec::new(),
        }
    }

    pub fn label(&self) -> &StateLabel {
        &self.label
    }

    pub fn transitions(&self) -> &[(L, usize)] {
        &self.transitions
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AutomatonError {
    #[error("state {0} is declared more than once")]
    DuplicateState(StateLabel),
    #[error("transition refers to undeclared state {0}")]
    UnknownState(StateLabel),
    #[error("symbol '{0}' is not in the alphabet")]
    UnknownSymbol(char),
    #[error("DFA transition out of {0} is labelled with epsilon")]
    EpsilonInDfa(StateLabel),
    #[error("automaton has no start state")]
    NoStartState,
    #[error("state {0} has more than one transition on '{1}'")]
    Nondeterministic(StateLabel, char),
    #[error("symbol '{0}' cannot be written in a regex")]
    UnwritableSymbol(char),
}

/// Nondeterministic automaton; a `None` transition label is an epsilon move.
#[derive(Debug, Clone)]
pub struct Nfa {
    pub(crate) nodes: Vec<FANode<Option<char>>>,
    // sorted, never contains EPSILON
    pub(crate) alphabet: Vec<char>,
    pub(crate) initial_states: Vec<usize>,
    pub(crate) accept_states: Vec<usize>,
}

/// Deterministic automaton. The transition function may be partial; see
/// [`Dfa::complete`].
#[derive(Debug, Clone)]
pub struct Dfa {
    pub(crate) nodes: Vec<FANode<char>>,
    pub(crate) alphabet: Vec<char>,
    pub(crate) initial_states: Vec<usize>,
    pub(crate) accept_states: Vec<usize>,
}

impl Nfa {
    pub fn nodes(&self) -> &[FANode<Option<char>>] {
        &self.nodes
    }

    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    pub fn initial_states(&self) -> &[usize] {
        &self.initial_states
    }

    pub fn accept_states(&self) -> &[usize] {
        &self.accept_states
    }

    pub fn num_states(&self) -> usize {
        self.nodes.len()
    }

    // basic BFS to compute epsilon closure
    pub(crate) fn epsilon_closure(&self, set: &mut BitSet) {
        let mut queue: VecDeque<usize> = set.iter().collect();
        let mut visited: BitSet = BitSet::with_capacity(self.nodes.len());

        while let Some(i) = queue.pop_front() {
            if visited.contains(i) {
                continue;
            }

            for (label, next) in &self.nodes[i].transitions {
                if label.is_none() && !visited.contains(*next) {
                    queue.push_back(*next);
                }
            }

            set.insert(i);
            visited.insert(i);
        }
    }

    pub(crate) fn delta(&self, set: &BitSet, c: char) -> BitSet {
        let mut result = BitSet::with_capacity(self.nodes.len());

        for i in set.iter() {
            for (label, next) in &self.nodes[i].transitions {
                if label.is_some_and(|x| x == c) {
                    result.insert(*next);
                }
            }
        }

        result
    }

    /// Membership check by tracking the set of live states.
    pub fn accepts(&self, input: &str) -> bool {
        let mut current: BitSet = self.initial_states.iter().copied().collect();
        self.epsilon_closure(&mut current);

        for c in input.chars() {
            let mut next = self.delta(&current, c);
            if next.is_empty() {
                return false;
            }
            self.epsilon_closure(&mut next);
            current = next;
        }

        self.accept_states.iter().any(|x| current.contains(*x))
    }
}

impl Dfa {
    pub fn nodes(&self) -> &[FANode<char>] {
        &self.nodes
    }

    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    pub fn initial_states(&self) -> &[usize] {
        &self.initial_states
    }

    pub fn accept_states(&self) -> &[usize] {
        &self.accept_states
    }

    pub fn num_states(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_accepting(&self, state: usize) -> bool {
        self.accept_states.contains(&state)
    }

    pub fn index_of(&self, label: &StateLabel) -> Option<usize> {
        self.nodes.iter().position(|node| &node.label == label)
    }

    pub fn next_state(&self, state: usize, c: char) -> Option<usize> {
        self.nodes[state]
            .transitions
            .iter()
            .find(|(label, _)| *label == c)
            .map(|(_, next)| *next)
    }

    pub fn accepts(&self, input: &str) -> bool {
        self.initial_states.iter().any(|start| {
            let mut state = *start;
            for c in input.chars() {
                match self.next_state(state, c) {
                    Some(next) => state = next,
                    None => return false,
                }
            }
            self.is_accepting(state)
        })
    }

    pub fn is_complete(&self) -> bool {
        self.nodes.iter().all(|node| {
            self.alphabet
                .iter()
                .all(|c| node.transitions.iter().any(|(label, _)| label == c))
        })
    }

    /// States reachable from any start state, in depth-first discovery order.
    pub fn reachable_states(&self) -> Vec<usize> {
        let mut visited = BitSet::with_capacity(self.nodes.len());
        let mut order: Vec<usize> = Vec::new();
        let mut stack: Vec<usize> = self.initial_states.iter().rev().copied().collect();

        while let Some(i) = stack.pop() {
            if visited.contains(i) {
                continue;
            }
            visited.insert(i);
            order.push(i);

            // reversed so the first transition is explored first
            for (_, next) in self.nodes[i].transitions.iter().rev() {
                if !visited.contains(*next) {
                    stack.push(*next);
                }
            }
        }

        order
    }

    /// Keeps only the given states (in the given order), dropping transitions
    /// and start/accept membership of everything else.
    pub(crate) fn restrict(&self, keep: &[usize]) -> Dfa {
        let mut remap: Vec<Option<usize>> = vec![None; self.nodes.len()];
        for (new, old) in keep.iter().enumerate() {
            remap[*old] = Some(new);
        }

        let nodes = keep
            .iter()
            .map(|old| {
                let node = &self.nodes[*old];
                FANode {
                    label: node.label.clone(),
                    transitions: node
                        .transitions
                        .iter()
                        .filter_map(|(c, next)| remap[*next].map(|next| (*c, next)))
                        .collect(),
                }
            })
            .collect();

        let keep_all = |states: &[usize]| -> Vec<usize> {
            states.iter().filter_map(|x| remap[*x]).collect()
        };

        Dfa {
            nodes,
            alphabet: self.alphabet.clone(),
            initial_states: keep_all(&self.initial_states),
            accept_states: keep_all(&self.accept_states),
        }
    }

    /// Routes every missing transition to a single added dead state. Returns
    /// an unchanged copy when the transition function is already total.
    pub fn complete(&self) -> Dfa {
        let mut dfa = self.clone();
        if self.is_complete() {
            return dfa;
        }

        let dead = dfa.nodes.len();
        dfa.nodes.push(FANode::new(self.fresh_dead_label()));

        for node in dfa.nodes.iter_mut() {
            for c in &self.alphabet {
                if !node.transitions.iter().any(|(label, _)| label == c) {
                    node.transitions.push((*c, dead));
                }
            }
            node.transitions.sort_by_key(|(label, _)| *label);
        }

        dfa
    }

    fn fresh_dead_label(&self) -> StateLabel {
        let taken = |label: &StateLabel| self.nodes.iter().any(|node| &node.label == label);

        let empty = StateLabel::Set(Vec::new());
        if !taken(&empty) {
            return empty;
        }

        let mut suffix = 0;
        loop {
            let candidate = StateLabel::Name(format!("dead{}", suffix));
            if !taken(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }

    /// Moves the first start state to index 0, keeping the relative order of
    /// everything else.
    pub(crate) fn with_initial_first(&self) -> Dfa {
        let Some(&start) = self.initial_states.first() else {
            return self.clone();
        };

        let order: Vec<usize> = std::iter::once(start)
            .chain((0..self.nodes.len()).filter(|x| *x != start))
            .collect();

        self.restrict(&order)
    }
}
