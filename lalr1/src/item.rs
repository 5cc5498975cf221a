use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use crate::production::Production;
use crate::symbol::Symbol;

/// An LR(1) item: a production index, a dot position, and a non-empty
/// lookahead set. Carrying the production's index rather than a reference
/// to it keeps items freely hashable/orderable without lifetime entanglement
/// with the production vector they index into.
#[derive(Debug, Clone, Eq, Hash)]
pub struct Item {
    pub production: usize,
    pub dot: usize,
    pub lookahead: BTreeSet<Symbol>,
}

impl Item {
    pub fn new(production: usize, dot: usize, lookahead: BTreeSet<Symbol>) -> Self {
        Self {
            production,
            dot,
            lookahead,
        }
    }

    pub fn is_complete(&self, body_len: usize) -> bool {
        self.dot >= body_len
    }

    /// The symbol immediately after the dot, if any, out of `body` (the
    /// production's non-epsilon rhs symbols).
    pub fn next_symbol<'a>(&self, body: &[&'a Symbol]) -> Option<&'a Symbol> {
        body.get(self.dot).copied()
    }

    pub fn advanced(&self) -> Self {
        Self {
            production: self.production,
            dot: self.dot + 1,
            lookahead: self.lookahead.clone(),
        }
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.production == other.production
            && self.dot == other.dot
            && self.lookahead == other.lookahead
    }
}

impl PartialOrd for Item {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Item {
    fn cmp(&self, other: &Self) -> Ordering {
        self.production
            .cmp(&other.production)
            .then_with(|| self.dot.cmp(&other.dot))
            .then_with(|| self.lookahead.cmp(&other.lookahead))
    }
}

pub fn format_item(item: &Item, production: &Production) -> String {
    let body = production.body();
    let mut rhs: Vec<String> = body.iter().map(|s| s.to_string()).collect();
    let dot = item.dot.min(rhs.len());
    rhs.insert(dot, "\u{b7}".to_string());
    let lookahead: Vec<String> = item.lookahead.iter().map(|s| s.to_string()).collect();
    format!(
        "[{} -> {}, {}]",
        production.lhs,
        rhs.join(" "),
        lookahead.join("/")
    )
}

impl fmt::Display for Item {
    fn fmt(&self, dest: &mut fmt::Formatter) -> fmt::Result {
        let lookahead: Vec<String> = self.lookahead.iter().map(|s| s.to_string()).collect();
        write!(
            dest,
            "[production {}, dot {}, {}]",
            self.production,
            self.dot,
            lookahead.join("/")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookahead(names: &[&str]) -> BTreeSet<Symbol> {
        names.iter().map(|n| Symbol::terminal(*n)).collect()
    }

    #[test]
    fn complete_when_dot_reaches_body_len() {
        let item = Item::new(0, 2, lookahead(&["#"]));
        assert!(item.is_complete(2));
        assert!(!item.is_complete(3));
    }

    #[test]
    fn equal_items_ignore_production_reference_identity() {
        let a = Item::new(1, 0, lookahead(&["a", "b"]));
        let b = Item::new(1, 0, lookahead(&["b", "a"]));
        assert_eq!(a, b);
    }
}
