use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use crate::nfa::{Nfa, StateId};
use crate::token::TokenClass;

#[derive(Debug, Default, Clone)]
pub struct DfaState {
    pub transitions: BTreeMap<char, StateId>,
    pub accepting: Option<TokenClass>,
}

/// A deterministic finite automaton obtained from an [`Nfa`] by subset
/// construction. States are addressed by arena index, as with [`Nfa`].
#[derive(Debug, Clone)]
pub struct Dfa {
    pub states: Vec<DfaState>,
    pub start: StateId,
}

impl Dfa {
    /// Standard powerset construction. Ties between distinct accepting NFA
    /// states folded into one DFA state are resolved by taking the class of
    /// the lowest-id accepting state in the set (`BTreeSet` iterates in
    /// ascending order), a first-found rule that works out correctly given
    /// NFA states are numbered in rule-declaration order.
    pub fn from_nfa(nfa: &Nfa) -> Self {
        let initial = nfa.epsilon_closure(&[nfa.start].into_iter().collect::<BTreeSet<_>>());

        let mut dfa = Dfa {
            states: Vec::new(),
            start: 0,
        };
        let mut seen: HashMap<BTreeSet<StateId>, StateId> = HashMap::new();
        let mut worklist: VecDeque<BTreeSet<StateId>> = VecDeque::new();

        let start_id = dfa.alloc(&initial, nfa);
        seen.insert(initial.clone(), start_id);
        dfa.start = start_id;
        worklist.push_back(initial);

        while let Some(current) = worklist.pop_front() {
            let current_id = seen[&current];

            let mut inputs: BTreeSet<char> = BTreeSet::new();
            for &id in &current {
                inputs.extend(nfa.states[id].transitions.keys().copied());
            }

            for c in inputs {
                let moved = nfa.step(&current, c);
                if moved.is_empty() {
                    continue;
                }
                let closure = nfa.epsilon_closure(&moved);
                if closure.is_empty() {
                    continue;
                }
                let target_id = if let Some(&id) = seen.get(&closure) {
                    id
                } else {
                    let id = dfa.alloc(&closure, nfa);
                    seen.insert(closure.clone(), id);
                    worklist.push_back(closure);
                    id
                };
                dfa.states[current_id].transitions.insert(c, target_id);
            }
        }

        dfa
    }

    fn alloc(&mut self, nfa_states: &BTreeSet<StateId>, nfa: &Nfa) -> StateId {
        let accepting = nfa_states
            .iter()
            .find_map(|&id| nfa.states[id].accepting.map(|class| (id, class)))
            .map(|(_, class)| class);
        self.states.push(DfaState {
            transitions: BTreeMap::new(),
            accepting,
        });
        self.states.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::TokenRule;

    #[test]
    fn subset_construction_accepts_keyword() {
        let rules = vec![TokenRule {
            class: TokenClass::Keyword,
            pattern: "if".to_string(),
        }];
        let nfa = Nfa::build(&rules);
        let dfa = Dfa::from_nfa(&nfa);
        let mut state = dfa.start;
        for c in "if".chars() {
            state = dfa.states[state].transitions[&c];
        }
        assert_eq!(dfa.states[state].accepting, Some(TokenClass::Keyword));
    }

    #[test]
    fn longest_match_prefers_two_char_operator() {
        let rules = vec![
            TokenRule {
                class: TokenClass::Operator,
                pattern: "=".to_string(),
            },
            TokenRule {
                class: TokenClass::Operator,
                pattern: "==".to_string(),
            },
        ];
        let nfa = Nfa::build(&rules);
        let dfa = Dfa::from_nfa(&nfa);
        let mut state = dfa.start;
        let mut best_len = 0;
        for (i, c) in "==".chars().enumerate() {
            state = dfa.states[state].transitions[&c];
            if dfa.states[state].accepting.is_some() {
                best_len = i + 1;
            }
        }
        assert_eq!(best_len, 2);
    }
}
