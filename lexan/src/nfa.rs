use std::collections::{BTreeSet, HashMap};

use crate::rule::TokenRule;
use crate::token::TokenClass;

/// Identifies a state within an [`Nfa`]'s arena. Using a plain `usize`
/// index instead of a shared, reference-counted state graph keeps states
/// trivially `Copy`, `Eq` and `Hash`, and removes the possibility of
/// reference cycles.
pub type StateId = usize;

#[derive(Debug, Default, Clone)]
pub struct NfaState {
    pub transitions: HashMap<char, Vec<StateId>>,
    pub epsilon: Vec<StateId>,
    pub accepting: Option<TokenClass>,
}

/// A nondeterministic finite automaton built from a set of token rules, with
/// one shared start state and one accepting state per rule.
#[derive(Debug, Clone)]
pub struct Nfa {
    pub states: Vec<NfaState>,
    pub start: StateId,
}

impl Nfa {
    fn new_state(&mut self) -> StateId {
        self.states.push(NfaState::default());
        self.states.len() - 1
    }

    /// Builds the ε-closure of a set of NFA states.
    pub fn epsilon_closure(&self, seed: &BTreeSet<StateId>) -> BTreeSet<StateId> {
        let mut closure = seed.clone();
        let mut worklist: Vec<StateId> = seed.iter().copied().collect();
        while let Some(id) = worklist.pop() {
            for &next in &self.states[id].epsilon {
                if closure.insert(next) {
                    worklist.push(next);
                }
            }
        }
        closure
    }

    /// The states reachable from `states` by consuming `c` on a non-ε edge.
    pub fn step(&self, states: &BTreeSet<StateId>, c: char) -> BTreeSet<StateId> {
        let mut result = BTreeSet::new();
        for &id in states {
            if let Some(targets) = self.states[id].transitions.get(&c) {
                result.extend(targets.iter().copied());
            }
        }
        result
    }

    /// Builds one global-start NFA from a rule set.
    pub fn build(rules: &[TokenRule]) -> Self {
        let mut nfa = Nfa {
            states: Vec::new(),
            start: 0,
        };
        nfa.start = nfa.new_state();
        for rule in rules {
            let entry = nfa.build_rule(rule);
            nfa.states[nfa.start].epsilon.push(entry);
        }
        nfa
    }

    fn build_rule(&mut self, rule: &TokenRule) -> StateId {
        if !rule.is_structural() {
            self.build_literal(&rule.pattern, rule.class)
        } else {
            match rule.class {
                TokenClass::Identifier => self.build_identifier(),
                TokenClass::Constant => self.build_constant(&rule.pattern),
                other => self.build_literal(&rule.pattern, other),
            }
        }
    }

    /// A chain of single-character transitions; `\` escapes the next
    /// character (the backslash is dropped, the next character matched
    /// literally).
    fn build_literal(&mut self, pattern: &str, class: TokenClass) -> StateId {
        let entry = self.new_state();
        let mut current = entry;
        let chars: Vec<char> = pattern.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            let c = if chars[i] == '\\' && i + 1 < chars.len() {
                i += 1;
                chars[i]
            } else {
                chars[i]
            };
            let next = self.new_state();
            self.states[current].transitions.entry(c).or_default().push(next);
            current = next;
            i += 1;
        }
        self.states[current].accepting = Some(class);
        entry
    }

    /// `start --{a-zA-Z_}--> middle`, `middle --{alnum_}--> middle`,
    /// `middle --{alnum_}--> accept`, `middle --ε--> accept` (length-1
    /// identifiers).
    fn build_identifier(&mut self) -> StateId {
        let start = self.new_state();
        let middle = self.new_state();
        let accept = self.new_state();
        self.states[accept].accepting = Some(TokenClass::Identifier);

        for c in first_identifier_chars() {
            self.states[start].transitions.entry(c).or_default().push(middle);
        }
        for c in identifier_body_chars() {
            self.states[middle].transitions.entry(c).or_default().push(middle);
            self.states[middle].transitions.entry(c).or_default().push(accept);
        }
        self.states[middle].epsilon.push(accept);
        start
    }

    /// `start --{0-9}--> num`, self-loop on digits at `num`, `num --ε-->
    /// accept`; if the pattern mentions `.`, also `num --.--> dec`, digit
    /// self-loop at `dec`, `dec --ε--> accept`.
    fn build_constant(&mut self, pattern: &str) -> StateId {
        let start = self.new_state();
        let num = self.new_state();
        let accept = self.new_state();
        self.states[accept].accepting = Some(TokenClass::Constant);

        for c in '0'..='9' {
            self.states[start].transitions.entry(c).or_default().push(num);
            self.states[num].transitions.entry(c).or_default().push(num);
        }
        self.states[num].epsilon.push(accept);

        if pattern.contains('.') {
            let dec = self.new_state();
            self.states[num].transitions.entry('.').or_default().push(dec);
            for c in '0'..='9' {
                self.states[dec].transitions.entry(c).or_default().push(dec);
            }
            self.states[dec].epsilon.push(accept);
        }
        start
    }
}

fn first_identifier_chars() -> impl Iterator<Item = char> {
    ('a'..='z').chain('A'..='Z').chain(std::iter::once('_'))
}

fn identifier_body_chars() -> impl Iterator<Item = char> {
    ('a'..='z').chain('A'..='Z').chain('0'..='9').chain(std::iter::once('_'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_chain_accepts_exact_keyword() {
        let rules = vec![TokenRule {
            class: TokenClass::Keyword,
            pattern: "int".to_string(),
        }];
        let nfa = Nfa::build(&rules);
        let mut states: BTreeSet<StateId> = [nfa.start].into_iter().collect();
        states = nfa.epsilon_closure(&states);
        for c in "int".chars() {
            states = nfa.epsilon_closure(&nfa.step(&states, c));
        }
        assert!(states
            .iter()
            .any(|&id| nfa.states[id].accepting == Some(TokenClass::Keyword)));
    }

    #[test]
    fn identifier_accepts_single_letter() {
        let rules = vec![TokenRule {
            class: TokenClass::Identifier,
            pattern: "[a-zA-Z_][a-zA-Z0-9_]*".to_string(),
        }];
        let nfa = Nfa::build(&rules);
        let states = nfa.epsilon_closure(&[nfa.start].into_iter().collect());
        let states = nfa.epsilon_closure(&nfa.step(&states, 'x'));
        assert!(states
            .iter()
            .any(|&id| nfa.states[id].accepting == Some(TokenClass::Identifier)));
    }
}
