//! Language-equivalence properties across every stage, checked on all strings
//! over {a, b} up to a bounded length.

use std::collections::BTreeSet;

use proptest::prelude::*;
use refa::{Dfa, DfaMinimizer, Nfa, SubsetStrategy};

const MAX_LEN: usize = 5;

#[derive(Clone, Debug)]
enum Re {
    Sym(char),
    Eps,
    Cat(Box<Re>, Box<Re>),
    Alt(Box<Re>, Box<Re>),
    Star(Box<Re>),
}

impl Re {
    fn render(&self) -> String {
        match self {
            Re::Sym(c) => c.to_string(),
            Re::Eps => "$".to_string(),
            Re::Cat(l, r) => format!("({}{})", l.render(), r.render()),
            Re::Alt(l, r) => format!("({}+{})", l.render(), r.render()),
            Re::Star(inner) => format!("({})*", inner.render()),
        }
    }

    // positions where a match starting at `start` can end
    fn ends(&self, input: &[char], start: usize) -> BTreeSet<usize> {
        match self {
            Re::Sym(c) => match input.get(start) {
                Some(x) if x == c => BTreeSet::from([start + 1]),
                _ => BTreeSet::new(),
            },
            Re::Eps => BTreeSet::from([start]),
            Re::Cat(l, r) => l
                .ends(input, start)
                .into_iter()
                .flat_map(|mid| r.ends(input, mid))
                .collect(),
            Re::Alt(l, r) => {
                let mut ends = l.ends(input, start);
                ends.extend(r.ends(input, start));
                ends
            }
            Re::Star(inner) => {
                let mut ends = BTreeSet::from([start]);
                let mut frontier = vec![start];
                while let Some(pos) = frontier.pop() {
                    for next in inner.ends(input, pos) {
                        if ends.insert(next) {
                            frontier.push(next);
                        }
                    }
                }
                ends
            }
        }
    }

    fn matches(&self, input: &str) -> bool {
        let chars: Vec<char> = input.chars().collect();
        self.ends(&chars, 0).contains(&chars.len())
    }
}

fn regex_strategy() -> impl Strategy<Value = Re> {
    let leaf = prop_oneof![Just(Re::Sym('a')), Just(Re::Sym('b')), Just(Re::Eps)];
    leaf.prop_recursive(4, 12, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Re::Cat(Box::new(l), Box::new(r))),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Re::Alt(Box::new(l), Box::new(r))),
            inner.prop_map(|x| Re::Star(Box::new(x))),
        ]
    })
}

fn all_strings() -> Vec<String> {
    let mut strings = vec![String::new()];
    let mut layer = vec![String::new()];
    for _ in 0..MAX_LEN {
        layer = layer
            .iter()
            .flat_map(|prefix| ['a', 'b'].map(|c| format!("{}{}", prefix, c)))
            .collect();
        strings.extend(layer.iter().cloned());
    }
    strings
}

fn reachable_dfa(re_str: &str) -> Dfa {
    let nfa = Nfa::from_regex(re_str).expect("failed to build nfa");
    Dfa::from_nfa(&nfa, SubsetStrategy::Reachable).expect("reachable strategy is total")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn thompson_matches_reference(re in regex_strategy()) {
        let re_str = re.render();
        let nfa = Nfa::from_regex(&re_str).unwrap();
        prop_assert_eq!(nfa.initial_states().len(), 1);
        prop_assert_eq!(nfa.accept_states().len(), 1);

        for input in all_strings() {
            prop_assert_eq!(nfa.accepts(&input), re.matches(&input), "{} on '{}'", re_str, input);
        }
    }

    #[test]
    fn subset_construction_preserves_language(re in regex_strategy()) {
        let re_str = re.render();
        let nfa = Nfa::from_regex(&re_str).unwrap();
        let reachable = Dfa::from_nfa(&nfa, SubsetStrategy::Reachable).unwrap();

        for input in all_strings() {
            prop_assert_eq!(reachable.accepts(&input), nfa.accepts(&input), "{} on '{}'", re_str, input);
        }

        // keep the exponential variant to small automata
        if nfa.num_states() <= 12 {
            let power_set = Dfa::from_nfa(&nfa, SubsetStrategy::PowerSet).unwrap();
            prop_assert_eq!(power_set.num_states(), 1usize << nfa.num_states());
            for input in all_strings() {
                prop_assert_eq!(power_set.accepts(&input), nfa.accepts(&input), "{} on '{}'", re_str, input);
            }
        }
    }

    #[test]
    fn minimization_is_sound(re in regex_strategy()) {
        let re_str = re.render();
        let dfa = reachable_dfa(&re_str);
        let minimized = dfa.minimize();

        prop_assert!(minimized.num_states() <= dfa.prune_unreachable().complete().num_states());
        for input in all_strings() {
            prop_assert_eq!(minimized.accepts(&input), dfa.accepts(&input), "{} on '{}'", re_str, input);
        }

        let minimizer = DfaMinimizer::new(&minimized);
        for i in 0..minimized.num_states() {
            for j in (i + 1)..minimized.num_states() {
                prop_assert!(minimizer.is_distinguishable(i, j));
            }
        }

        let again = minimized.minimize();
        prop_assert_eq!(again.num_states(), minimized.num_states());
    }

    #[test]
    fn elimination_round_trips(re in regex_strategy()) {
        let re_str = re.render();
        let dfa = reachable_dfa(&re_str).minimize();
        let derived = dfa.to_regex().unwrap();

        // the generated regexes always match something, so the derived one is never empty
        prop_assert!(!derived.is_empty());
        let back = reachable_dfa(&derived);
        for input in all_strings() {
            prop_assert_eq!(back.accepts(&input), dfa.accepts(&input), "{} -> {} on '{}'", re_str, derived, input);
        }
    }
}
