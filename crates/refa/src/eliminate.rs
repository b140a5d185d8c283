//! DFA to regex by state elimination (Brzozowski-McCluskey).
//!
//! Each state `i` is read as an equation `X_i = sum_j A[i][j] X_j + B[i]`
//! where `A[i][j]` is the union of the symbols leading from `i` to `j` and
//! `B[i]` is `$` when `i` accepts. Equations are eliminated from the last
//! state down to the start state (index 0), using Arden's rule to fold
//! self-loops: `X = A X + B` becomes `X = A* B`.
//!
//! Fragments are plain strings. The empty string denotes the empty language
//! and `$` the empty word.

use crate::fa::{AutomatonError, Dfa, EPSILON};
use crate::regex::is_symbol;

const EPSILON_STR: &str = "$";

// true if `re` is a single group: its first '(' closes at the very end
fn is_parenthesized(re: &str) -> bool {
    if !(re.starts_with('(') && re.ends_with(')')) {
        return false;
    }

    let mut depth: usize = 0;
    for (i, c) in re.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return i == re.len() - 1;
                }
            }
            _ => (),
        }
    }

    false
}

pub(crate) fn concat(r1: &str, r2: &str) -> String {
    if r1.is_empty() || r2.is_empty() {
        String::new()
    } else if r1 == EPSILON_STR {
        r2.to_string()
    } else if r2 == EPSILON_STR {
        r1.to_string()
    } else {
        format!("{}{}", r1, r2)
    }
}

pub(crate) fn union(r1: &str, r2: &str) -> String {
    if r1.is_empty() || r2.is_empty() {
        format!("{}{}", r1, r2)
    } else {
        format!("({}+{})", r1, r2)
    }
}

pub(crate) fn kleene(r: &str) -> String {
    let mut chars = r.chars();
    let single_symbol = matches!((chars.next(), chars.next()), (Some(c), None) if c != EPSILON);

    if r.is_empty() || r == EPSILON_STR {
        EPSILON_STR.to_string()
    } else if single_symbol || is_parenthesized(r) {
        format!("{}*", r)
    } else {
        format!("({})*", r)
    }
}

pub struct StateEliminator {
    a: Vec<Vec<String>>,
    b: Vec<String>,
}

impl StateEliminator {
    /// Sets up the equations with the (first) start state moved to index 0.
    /// Fails if a letter of the alphabet has no regex spelling.
    pub fn new(dfa: &Dfa) -> Result<StateEliminator, AutomatonError> {
        if let Some(c) = dfa.alphabet.iter().find(|c| !is_symbol(**c)) {
            return Err(AutomatonError::UnwritableSymbol(*c));
        }

        let dfa = dfa.with_initial_first();
        let n = dfa.num_states();

        let mut a: Vec<Vec<String>> = vec![vec![String::new(); n]; n];
        let mut b: Vec<String> = vec![String::new(); n];

        for (i, node) in dfa.nodes.iter().enumerate() {
            if dfa.is_accepting(i) {
                b[i] = EPSILON_STR.to_string();
            }

            let mut transitions = node.transitions.clone();
            transitions.sort_by_key(|(c, _)| *c);
            for (c, j) in transitions {
                a[i][j] = union(&a[i][j], &c.to_string());
            }
        }

        Ok(StateEliminator { a, b })
    }

    fn eliminate(&mut self, k: usize) {
        let a = &mut self.a;
        let b = &mut self.b;

        if !a[k][k].is_empty() {
            let star = kleene(&a[k][k]);
            b[k] = concat(&star, &b[k]);
            for j in 0..k {
                a[k][j] = concat(&star, &a[k][j]);
            }
        }

        for i in 0..k {
            if a[i][k].is_empty() {
                continue;
            }

            b[i] = union(&b[i], &concat(&a[i][k], &b[k]));
            for j in 0..k {
                let through_k = concat(&a[i][k], &a[k][j]);
                a[i][j] = union(&a[i][j], &through_k);
            }
        }
    }

    pub fn synthesize(mut self) -> String {
        let n = self.b.len();
        for k in (0..n).rev() {
            self.eliminate(k);
        }

        self.b.into_iter().next().unwrap_or_default()
    }
}

impl Dfa {
    /// Regex for the language of this DFA. An empty string means the DFA
    /// accepts nothing.
    pub fn to_regex(&self) -> Result<String, AutomatonError> {
        Ok(StateEliminator::new(self)?.synthesize())
    }
}
