use std::{fs, path::Path};

use crate::error::Error;
use crate::token::TokenClass;

/// A single `CLASS -> PATTERN` line from a token-rule file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRule {
    pub class: TokenClass,
    pub pattern: String,
}

impl TokenRule {
    /// A pattern is a character-class rule (identifier or constant) iff it
    /// contains `[`; everything else is matched as a literal string.
    pub fn is_structural(&self) -> bool {
        self.pattern.contains('[')
    }
}

/// Reads and parses a token-rule file. The file handle is released (by
/// `fs::read_to_string` returning) before this function returns on every
/// path.
pub fn load_rules(path: &Path) -> Result<Vec<TokenRule>, Error> {
    let text = fs::read_to_string(path)?;
    Ok(parse_rules(&text))
}

/// Parses the textual contents of a token-rule file.
///
/// Blank lines, `#`-comments, and any line missing the `->` delimiter are
/// silently skipped: the loader is permissive by design, not merely lenient
/// by omission.
pub fn parse_rules(text: &str) -> Vec<TokenRule> {
    let mut rules = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(arrow) = line.find("->") else {
            continue;
        };
        let class_str = line[..arrow].trim();
        let pattern = line[arrow + 2..].trim();
        let Some(letter) = class_str.chars().next() else {
            continue;
        };
        let Some(class) = TokenClass::from_letter(letter) else {
            continue;
        };
        if pattern.is_empty() {
            continue;
        }
        rules.push(TokenRule {
            class,
            pattern: pattern.to_string(),
        });
    }
    rules
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_class_letters() {
        let text = "K -> int\nI -> [a-zA-Z_][a-zA-Z0-9_]*\nC -> [0-9]+\nL -> ;\nO -> =\n";
        let rules = parse_rules(text);
        assert_eq!(rules.len(), 5);
        assert_eq!(rules[0].class, TokenClass::Keyword);
        assert_eq!(rules[0].pattern, "int");
        assert_eq!(rules[1].class, TokenClass::Identifier);
        assert!(rules[1].is_structural());
    }

    #[test]
    fn skips_comments_blanks_and_malformed_lines() {
        let text = "# a comment\n\nK int\nK -> return\n";
        let rules = parse_rules(text);
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].pattern, "return");
    }
}
