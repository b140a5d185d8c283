use crate::fa::{Dfa, FANode};
use crate::label::StateLabel;

/// Table-filling (Myhill-Nerode) minimization.
///
/// Works on the reachable part of the input, completed with a dead state when
/// the transition function is partial.
pub struct DfaMinimizer {
    dfa: Dfa,
    // marked[i][j] for i < j
    marked: Vec<Vec<bool>>,
}

impl DfaMinimizer {
    pub fn new(dfa: &Dfa) -> DfaMinimizer {
        let dfa = dfa.prune_unreachable().complete();
        let n = dfa.num_states();

        let mut marked = vec![vec![false; n]; n];
        for i in 0..n {
            for j in (i + 1)..n {
                marked[i][j] = dfa.is_accepting(i) != dfa.is_accepting(j);
            }
        }

        let mut minimizer = DfaMinimizer { dfa, marked };
        minimizer.fill_table();
        minimizer
    }

    pub fn is_distinguishable(&self, i: usize, j: usize) -> bool {
        match i.cmp(&j) {
            std::cmp::Ordering::Less => self.marked[i][j],
            std::cmp::Ordering::Greater => self.marked[j][i],
            std::cmp::Ordering::Equal => false,
        }
    }

    fn fill_table(&mut self) {
        let n = self.dfa.num_states();
        loop {
            let mut changed = false;
            for i in 0..n {
                for j in (i + 1)..n {
                    if self.marked[i][j] {
                        continue;
                    }

                    let split = self.dfa.alphabet.iter().any(|c| {
                        match (self.dfa.next_state(i, *c), self.dfa.next_state(j, *c)) {
                            (Some(p), Some(q)) => self.is_distinguishable(p, q),
                            (p, q) => p.is_some() != q.is_some(),
                        }
                    });

                    if split {
                        self.marked[i][j] = true;
                        changed = true;
                    }
                }
            }

            if !changed {
                break;
            }
        }
    }

    /// Groups of mutually indistinguishable states, ordered by their smallest
    /// member. Indices refer to the pruned, completed DFA.
    pub fn equivalence_classes(&self) -> Vec<Vec<usize>> {
        let n = self.dfa.num_states();
        let mut class_of: Vec<Option<usize>> = vec![None; n];
        let mut classes: Vec<Vec<usize>> = Vec::new();

        for i in 0..n {
            for j in (i + 1)..n {
                if self.marked[i][j] {
                    continue;
                }

                match (class_of[i], class_of[j]) {
                    (None, None) => {
                        class_of[i] = Some(classes.len());
                        class_of[j] = Some(classes.len());
                        classes.push(vec![i, j]);
                    }
                    (Some(class), None) => {
                        class_of[j] = Some(class);
                        classes[class].push(j);
                    }
                    (None, Some(class)) => {
                        class_of[i] = Some(class);
                        classes[class].push(i);
                    }
                    (Some(_), Some(_)) => (),
                }
            }
        }

        for (i, class) in class_of.iter().enumerate() {
            if class.is_none() {
                classes.push(vec![i]);
            }
        }

        for class in classes.iter_mut() {
            class.sort_unstable();
        }
        classes.sort_by_key(|class| class[0]);
        classes
    }

    pub fn minimize(&self) -> Dfa {
        let classes = self.equivalence_classes();
        let mut class_of: Vec<usize> = vec![0; self.dfa.num_states()];
        for (id, class) in classes.iter().enumerate() {
            for member in class {
                class_of[*member] = id;
            }
        }

        let nodes: Vec<FANode<char>> = classes
            .iter()
            .map(|class| FANode {
                label: StateLabel::set(class.iter().map(|x| self.dfa.nodes[*x].label.clone())),
                // any member will do, they agree on every symbol
                transitions: self.dfa.nodes[class[0]]
                    .transitions
                    .iter()
                    .map(|(c, next)| (*c, class_of[*next]))
                    .collect(),
            })
            .collect();

        let classes_of = |states: &[usize]| -> Vec<usize> {
            let mut ids: Vec<usize> = states.iter().map(|x| class_of[*x]).collect();
            ids.sort_unstable();
            ids.dedup();
            ids
        };

        Dfa {
            nodes,
            alphabet: self.dfa.alphabet.clone(),
            initial_states: classes_of(&self.dfa.initial_states),
            accept_states: classes_of(&self.dfa.accept_states),
        }
    }
}

impl Dfa {
    /// Drops every state not reachable from a start state. Surviving states
    /// keep their relative order.
    pub fn prune_unreachable(&self) -> Dfa {
        let mut reachable = self.reachable_states();
        reachable.sort_unstable();
        self.restrict(&reachable)
    }

    pub fn minimize(&self) -> Dfa {
        DfaMinimizer::new(self).minimize()
    }
}
