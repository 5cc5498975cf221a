use std::path::Path;

use crate::dfa::Dfa;
use crate::error::Error;
use crate::nfa::Nfa;
use crate::rule::{self, TokenRule};
use crate::token::{Diagnostic, Token, TokenClass};

/// Characters that always end a maximal-munch run and are themselves
/// single- or double-character limiter/operator tokens.
const PUNCTUATION: &str = "[](){};,+-*/<>=!";
const LIMITERS: &str = "[](){};,";

/// Behavior shared by the two lexer strategies: the canonical DFA-driven
/// scanner ([`DfaScanner`]) and the regex-driven alternative
/// ([`crate::regex_scanner::RegexScanner`]).
pub trait Scanner {
    fn tokenize(&self, source: &str) -> (Vec<Token>, Vec<Diagnostic>);
}

/// The canonical scanner: builds an NFA from the rule set, converts it to a
/// DFA by subset construction, then drives the DFA with maximal munch plus
/// the pre-lexer rules for punctuation, numeric literals and illegal
/// identifiers.
pub struct DfaScanner {
    rules: Vec<TokenRule>,
    dfa: Dfa,
}

impl DfaScanner {
    pub fn new(rules: Vec<TokenRule>) -> Self {
        let nfa = Nfa::build(&rules);
        let dfa = Dfa::from_nfa(&nfa);
        Self { rules, dfa }
    }

    /// Loads a token-rule file and builds its scanner.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let rules = rule::load_rules(path)?;
        Ok(Self::new(rules))
    }

    pub fn rules(&self) -> &[TokenRule] {
        &self.rules
    }

    fn keyword_match(&self, possible_token: &str) -> bool {
        self.rules
            .iter()
            .any(|r| r.class == TokenClass::Keyword && r.pattern == possible_token)
    }

    /// Runs the DFA from its start state over `chars[from..]`, stopping at
    /// whitespace or punctuation, and returns the length of the longest
    /// accepting prefix together with its class, if any.
    fn longest_dfa_match(&self, chars: &[char], from: usize) -> Option<(usize, TokenClass)> {
        let mut state = self.dfa.start;
        let mut best = None;
        let mut k = from;
        while k < chars.len() {
            let c = chars[k];
            if c.is_whitespace() || PUNCTUATION.contains(c) {
                break;
            }
            match self.dfa.states[state].transitions.get(&c) {
                Some(&next) => {
                    state = next;
                    k += 1;
                    if let Some(class) = self.dfa.states[next].accepting {
                        best = Some((k - from, class));
                    }
                }
                None => break,
            }
        }
        best
    }
}

impl Scanner for DfaScanner {
    fn tokenize(&self, source: &str) -> (Vec<Token>, Vec<Diagnostic>) {
        let chars: Vec<char> = source.chars().collect();
        let n = chars.len();
        let mut i = 0usize;
        let mut line = 1usize;
        let mut tokens = Vec::new();
        let mut diagnostics = Vec::new();

        while i < n {
            let c = chars[i];

            if c == '\n' {
                line += 1;
                i += 1;
                continue;
            }
            if c.is_whitespace() {
                i += 1;
                continue;
            }

            if c.is_ascii_digit() {
                let (lexeme, len, invalid) = scan_numeric_prefix(&chars, i);
                if invalid {
                    diagnostics.push(Diagnostic {
                        line,
                        message: format!("Identifier cannot start with a number: {}", lexeme),
                    });
                    tokens.push(Token::new(TokenClass::Invalid, lexeme, line));
                } else {
                    tokens.push(Token::new(TokenClass::Constant, lexeme, line));
                }
                i += len;
                continue;
            }

            if PUNCTUATION.contains(c) {
                let mut lexeme = String::new();
                lexeme.push(c);
                if i + 1 < n {
                    let next = chars[i + 1];
                    if matches!((c, next), ('=', '=') | ('!', '=') | ('<', '=') | ('>', '=')) {
                        lexeme.push(next);
                        i += 1;
                    }
                }
                let class = if LIMITERS.contains(c) {
                    TokenClass::Limiter
                } else {
                    TokenClass::Operator
                };
                tokens.push(Token::new(class, lexeme, line));
                i += 1;
                continue;
            }

            let start = i;
            let mut j = i;
            while j < n && !chars[j].is_whitespace() && !PUNCTUATION.contains(chars[j]) {
                j += 1;
            }
            let possible_token: String = chars[start..j].iter().collect();

            if self.keyword_match(&possible_token) {
                tokens.push(Token::new(TokenClass::Keyword, possible_token, line));
                i = j;
                continue;
            }

            if let Some((len, class)) = self.longest_dfa_match(&chars, start) {
                let lexeme: String = chars[start..start + len].iter().collect();
                tokens.push(Token::new(class, lexeme, line));
                i = start + len;
            } else {
                diagnostics.push(Diagnostic {
                    line,
                    message: format!("Unrecognized token: {}", possible_token),
                });
                i += 1;
            }
        }

        (tokens, diagnostics)
    }
}

/// Consumes the numeric-literal prefix starting at `chars[i]` (`i` points at
/// a digit). Returns the matched lexeme, its length, and whether it turned
/// out to be a digit-prefixed illegal identifier.
fn scan_numeric_prefix(chars: &[char], i: usize) -> (String, usize, bool) {
    let n = chars.len();
    let start = i;
    let mut j = i;
    while j < n && chars[j].is_ascii_digit() {
        j += 1;
    }

    if j < n && (chars[j].is_ascii_alphabetic() || chars[j] == '_') {
        while j < n && (chars[j].is_ascii_alphanumeric() || chars[j] == '_') {
            j += 1;
        }
        let lexeme: String = chars[start..j].iter().collect();
        return (lexeme.clone(), lexeme.chars().count(), true);
    }

    if j < n && chars[j] == '.' {
        j += 1;
        while j < n && chars[j].is_ascii_digit() {
            j += 1;
        }
    }

    if j < n && (chars[j] == 'e' || chars[j] == 'E') {
        j += 1;
        if j < n && (chars[j] == '+' || chars[j] == '-') {
            j += 1;
        }
        while j < n && chars[j].is_ascii_digit() {
            j += 1;
        }
    }

    let lexeme: String = chars[start..j].iter().collect();
    let len = lexeme.chars().count();
    (lexeme, len, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::parse_rules;

    fn calc_rules() -> Vec<TokenRule> {
        parse_rules(
            "K -> int\nK -> return\nI -> [a-zA-Z_][a-zA-Z0-9_]*\nC -> [0-9]+\nL -> ;\nO -> =\n",
        )
    }

    #[test]
    fn lexer_smoke() {
        let scanner = DfaScanner::new(calc_rules());
        let (tokens, diags) = scanner.tokenize("int x = 42;");
        assert!(diags.is_empty());
        let rendered: Vec<(TokenClass, &str)> =
            tokens.iter().map(|t| (t.class(), t.lexeme())).collect();
        assert_eq!(
            rendered,
            vec![
                (TokenClass::Keyword, "int"),
                (TokenClass::Identifier, "x"),
                (TokenClass::Operator, "="),
                (TokenClass::Constant, "42"),
                (TokenClass::Limiter, ";"),
            ]
        );
    }

    #[test]
    fn illegal_identifier_is_one_invalid_token() {
        let scanner = DfaScanner::new(calc_rules());
        let (tokens, diags) = scanner.tokenize("3abc");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].class(), TokenClass::Invalid);
        assert_eq!(tokens[0].lexeme(), "3abc");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].line, 1);
    }

    #[test]
    fn longest_match_operator() {
        let rules = parse_rules("O -> =\nO -> ==\nI -> [a-zA-Z_][a-zA-Z0-9_]*\n");
        let scanner = DfaScanner::new(rules);
        let (tokens, _) = scanner.tokenize("x == y");
        let ops: Vec<&str> = tokens
            .iter()
            .filter(|t| t.class() == TokenClass::Operator)
            .map(|t| t.lexeme())
            .collect();
        assert_eq!(ops, vec!["=="]);
    }

    #[test]
    fn scientific_notation_is_one_constant() {
        let scanner = DfaScanner::new(calc_rules());
        let (tokens, _) = scanner.tokenize("1.5e-10");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].class(), TokenClass::Constant);
        assert_eq!(tokens[0].lexeme(), "1.5e-10");
    }

    #[test]
    fn keyword_wins_over_identifier() {
        let scanner = DfaScanner::new(calc_rules());
        let (tokens, _) = scanner.tokenize("return");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].class(), TokenClass::Keyword);
    }

    #[test]
    fn unrecognized_character_advances_by_one() {
        let scanner = DfaScanner::new(calc_rules());
        let (tokens, diags) = scanner.tokenize("@@x");
        assert_eq!(diags.len(), 2);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].lexeme(), "x");
    }
}
