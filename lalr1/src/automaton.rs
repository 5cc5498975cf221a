use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::grammar::Grammar;
use crate::item::Item;
use crate::sets::{first_of_sequence, SymbolSets};
use crate::symbol::Symbol;

pub type ItemSet = BTreeSet<Item>;

/// Closure of a seed item set (§4.7): items sharing production and dot are
/// merged by lookahead union while the fixed point is found, then emitted
/// as one item per distinct `(production, dot, lookahead-set)`.
pub fn closure(grammar: &Grammar, first: &SymbolSets, items: ItemSet) -> ItemSet {
    let mut core: HashMap<(usize, usize), BTreeSet<Symbol>> = HashMap::new();
    for item in items {
        core.entry((item.production, item.dot)).or_default().extend(item.lookahead);
    }

    loop {
        let mut additions: HashMap<(usize, usize), BTreeSet<Symbol>> = HashMap::new();
        for (&(prod_idx, dot), lookaheads) in core.iter() {
            let production = &grammar.productions[prod_idx];
            let body = production.body();
            if dot >= body.len() {
                continue;
            }
            let next = body[dot];
            if !next.is_non_terminal() {
                continue;
            }
            let beta: Vec<Symbol> = body[dot + 1..].iter().map(|s| (*s).clone()).collect();
            for a in lookaheads {
                let mut sequence = beta.clone();
                sequence.push(a.clone());
                let first_beta_a = first_of_sequence(first, &sequence);
                for candidate in grammar.productions.iter().filter(|p| &p.lhs == next) {
                    for b in first_beta_a.iter().filter(|s| !s.is_epsilon()) {
                        additions.entry((candidate.index, 0)).or_default().insert(b.clone());
                    }
                }
            }
        }

        let mut changed = false;
        for (key, additional) in additions {
            let entry = core.entry(key).or_default();
            for symbol in additional {
                changed |= entry.insert(symbol);
            }
        }
        if !changed {
            break;
        }
    }

    core.into_iter()
        .map(|((production, dot), lookahead)| Item::new(production, dot, lookahead))
        .collect()
}

/// GOTO(I, X) (§4.8): advance every item of `I` whose next symbol is `X`,
/// then close the result. Lookaheads pass through unchanged.
pub fn goto(grammar: &Grammar, first: &SymbolSets, items: &ItemSet, x: &Symbol) -> ItemSet {
    let mut moved: ItemSet = BTreeSet::new();
    for item in items {
        let production = &grammar.productions[item.production];
        let body = production.body();
        if let Some(next) = item.next_symbol(&body) {
            if next == x {
                moved.insert(item.advanced());
            }
        }
    }
    if moved.is_empty() {
        moved
    } else {
        closure(grammar, first, moved)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Shift(usize),
    Reduce(usize),
    Accept,
}

impl fmt::Display for Action {
    fn fmt(&self, dest: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Action::Shift(state) => write!(dest, "shift {}", state),
            Action::Reduce(production) => write!(dest, "reduce {}", production),
            Action::Accept => write!(dest, "accept"),
        }
    }
}

/// A shift/reduce or reduce/reduce conflict resolved during table
/// construction. Construction never fails on a conflict; it resolves it
/// (shift wins; reduce/reduce favors the lower production index) and keeps
/// a record for the caller to inspect or report.
#[derive(Debug, Clone)]
pub struct Conflict {
    pub state: usize,
    pub symbol: Symbol,
    pub existing: Action,
    pub rejected: Action,
    pub resolved: Action,
}

impl fmt::Display for Conflict {
    fn fmt(&self, dest: &mut fmt::Formatter) -> fmt::Result {
        write!(
            dest,
            "conflict in state {} on {}: {} vs {}, resolved to {}",
            self.state, self.symbol, self.existing, self.rejected, self.resolved
        )
    }
}

/// The canonical LR(1) automaton plus its ACTION/GOTO tables (§4.9).
#[derive(Debug)]
pub struct Automaton {
    pub states: Vec<ItemSet>,
    pub action: HashMap<(usize, Symbol), Action>,
    pub goto_table: HashMap<(usize, Symbol), usize>,
    pub conflicts: Vec<Conflict>,
}

impl Automaton {
    pub fn build(grammar: &Grammar, first: &SymbolSets) -> Self {
        let start_item = Item::new(0, 0, [Symbol::end_marker()].into_iter().collect());
        let start_set = closure(grammar, first, [start_item].into_iter().collect());

        let mut states = vec![start_set.clone()];
        let mut index_of: HashMap<ItemSet, usize> = HashMap::new();
        index_of.insert(start_set, 0);

        let mut action: HashMap<(usize, Symbol), Action> = HashMap::new();
        let mut goto_table: HashMap<(usize, Symbol), usize> = HashMap::new();
        let mut conflicts = Vec::new();

        let mut k = 0;
        while k < states.len() {
            let item_set = states[k].clone();

            let mut symbols_after_dot: BTreeSet<Symbol> = BTreeSet::new();
            for item in &item_set {
                let production = &grammar.productions[item.production];
                let body = production.body();
                if let Some(next) = item.next_symbol(&body) {
                    symbols_after_dot.insert(next.clone());
                }
            }

            for symbol in &symbols_after_dot {
                let goto_set = goto(grammar, first, &item_set, symbol);
                if goto_set.is_empty() {
                    continue;
                }
                let target = if let Some(&id) = index_of.get(&goto_set) {
                    id
                } else {
                    let id = states.len();
                    states.push(goto_set.clone());
                    index_of.insert(goto_set, id);
                    id
                };
                if symbol.is_non_terminal() {
                    goto_table.insert((k, symbol.clone()), target);
                } else {
                    set_action(&mut action, &mut conflicts, k, symbol.clone(), Action::Shift(target));
                }
            }

            for item in &item_set {
                let production = &grammar.productions[item.production];
                let body = production.body();
                if !item.is_complete(body.len()) {
                    continue;
                }
                for lookahead in &item.lookahead {
                    let directive = if production.index == 0 && lookahead.is_end_marker() {
                        Action::Accept
                    } else {
                        Action::Reduce(production.index)
                    };
                    set_action(&mut action, &mut conflicts, k, lookahead.clone(), directive);
                }
            }

            k += 1;
        }

        Automaton {
            states,
            action,
            goto_table,
            conflicts,
        }
    }
}

fn set_action(
    action: &mut HashMap<(usize, Symbol), Action>,
    conflicts: &mut Vec<Conflict>,
    state: usize,
    symbol: Symbol,
    new_action: Action,
) {
    let key = (state, symbol.clone());
    match action.get(&key) {
        None => {
            action.insert(key, new_action);
        }
        Some(&existing) if existing == new_action => {}
        Some(&existing) => {
            let resolved = resolve_conflict(existing, new_action);
            conflicts.push(Conflict {
                state,
                symbol,
                existing,
                rejected: new_action,
                resolved,
            });
            action.insert(key, resolved);
        }
    }
}

/// Shift wins over reduce; reduce/reduce favors the lower production index
/// (the earlier-declared rule), per the default policy (§4.9, §9).
fn resolve_conflict(existing: Action, new_action: Action) -> Action {
    match (existing, new_action) {
        (Action::Shift(_), Action::Reduce(_)) => existing,
        (Action::Reduce(_), Action::Shift(_)) => new_action,
        (Action::Reduce(p1), Action::Reduce(p2)) => {
            if p1 <= p2 {
                existing
            } else {
                new_action
            }
        }
        (Action::Accept, _) => existing,
        (_, Action::Accept) => new_action,
        _ => existing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;
    use crate::sets::compute_first;

    fn expr_grammar() -> Grammar {
        Grammar::parse(
            "E -> E + T\nE -> T\nT -> T * F\nT -> F\nF -> ( E )\nF -> id\n",
        )
        .unwrap()
    }

    #[test]
    fn start_state_kernel_is_augmented_production_at_dot_zero() {
        let grammar = expr_grammar();
        let first = compute_first(&grammar);
        let automaton = Automaton::build(&grammar, &first);
        assert!(automaton.states[0]
            .iter()
            .any(|item| item.production == 0 && item.dot == 0));
    }

    #[test]
    fn expression_grammar_has_no_conflicts() {
        let grammar = expr_grammar();
        let first = compute_first(&grammar);
        let automaton = Automaton::build(&grammar, &first);
        assert!(automaton.conflicts.is_empty());
    }

    #[test]
    fn accept_action_is_reachable_on_end_marker() {
        let grammar = expr_grammar();
        let first = compute_first(&grammar);
        let automaton = Automaton::build(&grammar, &first);
        let accepts = automaton
            .action
            .values()
            .filter(|a| matches!(a, Action::Accept))
            .count();
        assert_eq!(accepts, 1);
    }
}
