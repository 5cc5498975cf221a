use std::collections::{BTreeSet, HashMap};

use crate::grammar::Grammar;
use crate::symbol::Symbol;

pub type SymbolSets = HashMap<Symbol, BTreeSet<Symbol>>;

/// FIRST sets by fixed-point iteration. `FIRST(t) = {t}` for every terminal,
/// `FIRST(ε) = {ε}`, and each production contributes to its lhs's FIRST set
/// by walking its rhs while the prefix stays nullable.
pub fn compute_first(grammar: &Grammar) -> SymbolSets {
    let mut first: SymbolSets = HashMap::new();
    for terminal in &grammar.terminals {
        first.insert(terminal.clone(), [terminal.clone()].into_iter().collect());
    }
    first.insert(Symbol::end_marker(), [Symbol::end_marker()].into_iter().collect());
    first.insert(Symbol::epsilon(), [Symbol::epsilon()].into_iter().collect());
    for non_terminal in &grammar.non_terminals {
        first.entry(non_terminal.clone()).or_default();
    }

    loop {
        let mut changed = false;
        for production in &grammar.productions {
            let body = production.body();
            let additions = first_of_sequence_ref(&first, &body);
            let nullable = additions.contains(&Symbol::epsilon());
            let entry = first.entry(production.lhs.clone()).or_default();
            for symbol in additions.iter().filter(|s| !s.is_epsilon()) {
                changed |= entry.insert(symbol.clone());
            }
            if (body.is_empty() || nullable) && entry.insert(Symbol::epsilon()) {
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    first
}

/// FIRST of a symbol sequence, per the same recipe used for a production's
/// rhs: take FIRST of each symbol while its predecessors are all nullable.
pub fn first_of_sequence(first: &SymbolSets, sequence: &[Symbol]) -> BTreeSet<Symbol> {
    let refs: Vec<&Symbol> = sequence.iter().collect();
    first_of_sequence_ref(first, &refs)
}

fn first_of_sequence_ref(first: &SymbolSets, sequence: &[&Symbol]) -> BTreeSet<Symbol> {
    let mut result = BTreeSet::new();
    if sequence.is_empty() {
        result.insert(Symbol::epsilon());
        return result;
    }
    let mut all_nullable = true;
    for symbol in sequence {
        let symbol_first = first.get(*symbol).cloned().unwrap_or_default();
        for item in symbol_first.iter().filter(|s| !s.is_epsilon()) {
            result.insert(item.clone());
        }
        if !symbol_first.contains(&Symbol::epsilon()) {
            all_nullable = false;
            break;
        }
    }
    if all_nullable {
        result.insert(Symbol::epsilon());
    }
    result
}

/// FOLLOW sets by fixed-point iteration, seeded with `# ∈ FOLLOW(S')`.
pub fn compute_follow(grammar: &Grammar, first: &SymbolSets) -> SymbolSets {
    let mut follow: SymbolSets = HashMap::new();
    for non_terminal in &grammar.non_terminals {
        follow.entry(non_terminal.clone()).or_default();
    }
    follow
        .entry(grammar.augmented_start.clone())
        .or_default()
        .insert(Symbol::end_marker());

    loop {
        let mut changed = false;
        for production in &grammar.productions {
            let body = production.body();
            for (i, symbol) in body.iter().enumerate() {
                if !symbol.is_non_terminal() {
                    continue;
                }
                let beta = &body[i + 1..];
                let beta_first = first_of_sequence_ref(first, beta);
                let entry = follow.entry((*symbol).clone()).or_default();
                for item in beta_first.iter().filter(|s| !s.is_epsilon()) {
                    changed |= entry.insert(item.clone());
                }
                if beta.is_empty() || beta_first.contains(&Symbol::epsilon()) {
                    let lhs_follow = follow.get(&production.lhs).cloned().unwrap_or_default();
                    let entry = follow.entry((*symbol).clone()).or_default();
                    for item in lhs_follow {
                        changed |= entry.insert(item);
                    }
                }
            }
        }
        if !changed {
            break;
        }
    }
    follow
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;

    #[test]
    fn first_and_follow_match_the_a_or_epsilon_scenario() {
        let grammar = Grammar::parse("S -> A B\nA -> a\nA ->\nB -> b\n").unwrap();
        let first = compute_first(&grammar);
        let follow = compute_follow(&grammar, &first);

        let s = Symbol::non_terminal("S");
        let a = Symbol::non_terminal("A");
        let b = Symbol::non_terminal("B");

        assert_eq!(
            first[&s],
            [Symbol::terminal("a"), Symbol::terminal("b")].into_iter().collect()
        );
        assert_eq!(
            first[&a],
            [Symbol::terminal("a"), Symbol::epsilon()].into_iter().collect()
        );
        assert_eq!(follow[&a], [Symbol::terminal("b")].into_iter().collect());
        assert_eq!(follow[&s], [Symbol::end_marker()].into_iter().collect());
    }
}
