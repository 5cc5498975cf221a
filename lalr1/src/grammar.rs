use std::collections::BTreeSet;
use std::{fs, path::Path};

use crate::error::Error;
use crate::production::Production;
use crate::symbol::{classify_spelling, Symbol};

/// A loaded context-free grammar: the augmented production set, and the
/// terminal/nonterminal vocabularies induced by them.
#[derive(Debug, Clone)]
pub struct Grammar {
    pub productions: Vec<Production>,
    pub terminals: BTreeSet<Symbol>,
    pub non_terminals: BTreeSet<Symbol>,
    /// The user's start symbol, before augmentation.
    pub start: Symbol,
    /// `S'`, the augmented production's lhs.
    pub augmented_start: Symbol,
}

impl Grammar {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Parses the textual contents of a grammar file. Blank lines and
    /// `#`-comments are skipped; lines missing `->` are skipped as
    /// malformed, mirroring the token-rule loader's permissiveness. The
    /// first retained line's lhs becomes the start symbol.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let mut raw_productions: Vec<(Symbol, Vec<Symbol>)> = Vec::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some(arrow) = line.find("->") else {
                continue;
            };
            let lhs_str = line[..arrow].trim();
            if lhs_str.is_empty() {
                continue;
            }
            let lhs = classify_spelling(lhs_str);
            let rhs_str = line[arrow + 2..].trim();
            let rhs: Vec<Symbol> = if rhs_str.is_empty() {
                vec![]
            } else {
                rhs_str
                    .split_whitespace()
                    .map(classify_spelling)
                    .filter(|s| !s.is_epsilon())
                    .collect()
            };
            raw_productions.push((lhs, rhs));
        }

        let Some((start, _)) = raw_productions.first().cloned() else {
            return Err(Error::Grammar(
                "grammar file contains no productions".to_string(),
            ));
        };

        let augmented_start = Symbol::non_terminal(format!("{}'", start.name));

        let mut productions = Vec::with_capacity(raw_productions.len() + 1);
        productions.push(Production::new(
            augmented_start.clone(),
            vec![start.clone()],
            0,
        ));
        for (index, (lhs, rhs)) in raw_productions.into_iter().enumerate() {
            productions.push(Production::new(lhs, rhs, index + 1));
        }

        let mut terminals = BTreeSet::new();
        let mut non_terminals = BTreeSet::new();
        non_terminals.insert(augmented_start.clone());
        for production in &productions {
            non_terminals.insert(production.lhs.clone());
            for symbol in &production.rhs {
                if symbol.is_terminal() {
                    terminals.insert(symbol.clone());
                } else if symbol.is_non_terminal() {
                    non_terminals.insert(symbol.clone());
                }
            }
        }

        Ok(Self {
            productions,
            terminals,
            non_terminals,
            start,
            augmented_start,
        })
    }

    pub fn production(&self, index: usize) -> &Production {
        &self.productions[index]
    }

    /// The non-epsilon rhs symbols of `production`, as owned references
    /// suitable for walking with an item's dot.
    pub fn body_of<'a>(&'a self, production: &'a Production) -> Vec<&'a Symbol> {
        production.body()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn augments_start_symbol_and_numbers_from_one() {
        let grammar = Grammar::parse("S -> A B\nA -> a\nA ->\nB -> b\n").unwrap();
        assert_eq!(grammar.productions[0].index, 0);
        assert_eq!(grammar.productions[0].lhs, Symbol::non_terminal("S'"));
        assert_eq!(grammar.productions[0].rhs, vec![Symbol::non_terminal("S")]);
        assert_eq!(grammar.productions[1].index, 1);
        assert!(grammar.productions[3].is_nullable());
        assert_eq!(grammar.start, Symbol::non_terminal("S"));
    }

    #[test]
    fn collects_terminal_and_non_terminal_vocabularies() {
        let grammar = Grammar::parse("E -> E + T\nE -> T\nT -> id\n").unwrap();
        assert!(grammar.terminals.contains(&Symbol::terminal("+")));
        assert!(grammar.terminals.contains(&Symbol::terminal("id")));
        assert!(grammar.non_terminals.contains(&Symbol::non_terminal("E")));
        assert!(grammar.non_terminals.contains(&Symbol::non_terminal("T")));
    }

    #[test]
    fn empty_grammar_file_is_an_error() {
        assert!(Grammar::parse("# just a comment\n").is_err());
    }
}
