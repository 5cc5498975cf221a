//! An alternative lexer strategy: a `regex`-driven classifier, grounded on
//! the alternative implementation in the original source
//! (`LexicalAnalyzer.cpp`) rather than on the DFA path. It recognizes a
//! seventh token class, `Complex`, via a coalescing post-pass that is never
//! run by [`crate::scanner::DfaScanner`].

use regex::Regex;

use crate::error::Error;
use crate::scanner::Scanner;
use crate::token::{Diagnostic, Token, TokenClass};

pub struct RegexScanner {
    keyword: Regex,
    identifier: Regex,
    constant: Regex,
    complex: Regex,
    limiter: Regex,
    operator: Regex,
}

impl RegexScanner {
    /// `keywords` are exact reserved words, e.g. `["int", "return", "if"]`.
    pub fn new(keywords: &[&str]) -> Result<Self, Error> {
        let alternatives = keywords
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");
        let keyword_pattern = if alternatives.is_empty() {
            r"\A\b\B".to_string() // matches nothing
        } else {
            format!(r"^(?:{})$", alternatives)
        };
        Ok(Self {
            keyword: Regex::new(&keyword_pattern)?,
            identifier: Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$")?,
            constant: Regex::new(
                r"^[+-]?\d*\.\d+([eE][+-]?\d+)?$|^[+-]?\d+([eE][+-]?\d+)?$",
            )?,
            complex: Regex::new(r"^[+-]?\d+(?:[+-]\d+)?i$")?,
            limiter: Regex::new(r"^[;,.(){}]$")?,
            operator: Regex::new(r"^[+\-*/%&|!<>^=]$")?,
        })
    }

    fn classify(&self, s: &str) -> TokenClass {
        if self.keyword.is_match(s) {
            TokenClass::Keyword
        } else if self.identifier.is_match(s) {
            TokenClass::Identifier
        } else if self.complex.is_match(s) {
            TokenClass::Complex
        } else if self.constant.is_match(s) {
            TokenClass::Constant
        } else if self.limiter.is_match(s) {
            TokenClass::Limiter
        } else if self.operator.is_match(s) {
            TokenClass::Operator
        } else {
            TokenClass::Invalid
        }
    }
}

impl Scanner for RegexScanner {
    /// Accumulates maximal runs of non-space characters (special-casing a
    /// trailing `E`/`e` exponent marker so it stays attached to its
    /// constant) and classifies each with the regex set above, then runs
    /// the complex-literal and scientific-notation coalescing passes.
    ///
    /// A run that classifies as `Invalid` is dropped from the token stream
    /// only at a whitespace boundary, matching `LexicalAnalyzer.cpp:47-56`;
    /// at a punctuation boundary or at end of input it is still pushed as an
    /// `Invalid` token (`LexicalAnalyzer.cpp:62-68`, `:78-81`), so a bad
    /// lexeme there still reaches the caller instead of vanishing silently.
    /// Every `Invalid` run also raises a `Diagnostic`, whether or not it
    /// ends up in the token stream.
    fn tokenize(&self, source: &str) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut tokens: Vec<Token> = Vec::new();
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let mut current = String::new();
        let mut line = 1usize;
        let chars: Vec<char> = source.chars().collect();
        let mut i = 0usize;

        while i < chars.len() {
            let c = chars[i];

            if c == '\n' {
                line += 1;
                i += 1;
                continue;
            }

            if (c == 'E' || c == 'e')
                && !current.is_empty()
                && i + 1 < chars.len()
                && (current.chars().last().unwrap().is_ascii_digit()
                    || current.ends_with('.'))
            {
                current.push(c);
                i += 1;
                if i < chars.len() && (chars[i] == '+' || chars[i] == '-') {
                    current.push(chars[i]);
                    i += 1;
                }
                continue;
            }

            if c.is_whitespace() {
                if !current.is_empty() {
                    let class = self.classify(&current);
                    push_filtered(&mut tokens, &mut diagnostics, class, &current, line);
                    current.clear();
                }
                i += 1;
                continue;
            }

            if c.is_alphanumeric()
                || c == '.'
                || ((c == '+' || c == '-')
                    && !current.is_empty()
                    && matches!(current.chars().last(), Some('E') | Some('e')))
            {
                current.push(c);
                i += 1;
                continue;
            }

            if !current.is_empty() {
                let class = self.classify(&current);
                push_unfiltered(&mut tokens, &mut diagnostics, class, &current, line);
                current.clear();
            }
            let mut single = String::new();
            single.push(c);
            let class = self.classify(&single);
            push_unfiltered(&mut tokens, &mut diagnostics, class, &single, line);
            i += 1;
        }

        if !current.is_empty() {
            let class = self.classify(&current);
            push_unfiltered(&mut tokens, &mut diagnostics, class, &current, line);
        }

        coalesce_complex(&mut tokens);
        coalesce_scientific(&mut tokens);
        (tokens, diagnostics)
    }
}

/// Whitespace-terminated flush: drops an `Invalid` run from the token
/// stream (`LexicalAnalyzer.cpp:47-56`'s `if (type != INVALID)`), but still
/// reports it as a diagnostic.
fn push_filtered(
    tokens: &mut Vec<Token>,
    diagnostics: &mut Vec<Diagnostic>,
    class: TokenClass,
    lexeme: &str,
    line: usize,
) {
    if class == TokenClass::Invalid {
        diagnostics.push(Diagnostic {
            line,
            message: format!("Unrecognized token: {}", lexeme),
        });
        return;
    }
    tokens.push(Token::new(class, lexeme, line));
}

/// Punctuation- and end-of-input-terminated flush: pushes unconditionally,
/// matching `LexicalAnalyzer.cpp:62-68` and `:78-81`, which keep an
/// `Invalid` run in the stream rather than drop it.
fn push_unfiltered(
    tokens: &mut Vec<Token>,
    diagnostics: &mut Vec<Diagnostic>,
    class: TokenClass,
    lexeme: &str,
    line: usize,
) {
    if class == TokenClass::Invalid {
        diagnostics.push(Diagnostic {
            line,
            message: format!("Unrecognized token: {}", lexeme),
        });
    }
    tokens.push(Token::new(class, lexeme, line));
}

/// Folds a `constant (+|-) complex` triple into a single `Complex` token,
/// mirroring `LexicalAnalyzer.cpp::processTokens`'s complex-literal pass.
fn coalesce_complex(tokens: &mut Vec<Token>) {
    let mut i = 0;
    while i + 2 < tokens.len() {
        let is_sign_op = tokens[i + 1].class() == TokenClass::Operator
            && matches!(tokens[i + 1].lexeme(), "+" | "-");
        if tokens[i].class() == TokenClass::Constant
            && is_sign_op
            && tokens[i + 2].class() == TokenClass::Complex
        {
            let merged = format!(
                "{}{}{}",
                tokens[i].lexeme(),
                tokens[i + 1].lexeme(),
                tokens[i + 2].lexeme()
            );
            let line = tokens[i].line();
            tokens[i] = Token::new(TokenClass::Complex, merged, line);
            tokens.drain(i + 1..i + 3);
        } else {
            i += 1;
        }
    }
}

/// Folds a constant, an `E`/`e` identifier, and a following constant (with
/// an optional signed exponent split across tokens) back into a single
/// scientific-notation constant, mirroring the second pass of
/// `LexicalAnalyzer.cpp::processTokens`.
fn coalesce_scientific(tokens: &mut Vec<Token>) {
    let mut i = 0;
    while i + 2 < tokens.len() {
        let is_e_marker = tokens[i + 1].class() == TokenClass::Identifier
            && matches!(tokens[i + 1].lexeme(), "E" | "e");
        if tokens[i].class() != TokenClass::Constant || !is_e_marker {
            i += 1;
            continue;
        }
        if tokens[i + 2].class() == TokenClass::Constant {
            let merged = format!("{}E{}", tokens[i].lexeme(), tokens[i + 2].lexeme());
            let line = tokens[i].line();
            tokens[i] = Token::new(TokenClass::Constant, merged, line);
            tokens.drain(i + 1..i + 3);
            continue;
        }
        if i + 3 < tokens.len()
            && tokens[i + 2].class() == TokenClass::Operator
            && tokens[i + 3].class() == TokenClass::Constant
            && matches!(tokens[i + 2].lexeme(), "+" | "-")
        {
            let merged = if tokens[i + 2].lexeme() == "-" {
                format!(
                    "{}E{}{}",
                    tokens[i].lexeme(),
                    tokens[i + 2].lexeme(),
                    tokens[i + 3].lexeme()
                )
            } else {
                format!("{}E{}", tokens[i].lexeme(), tokens[i + 3].lexeme())
            };
            let line = tokens[i].line();
            tokens[i] = Token::new(TokenClass::Constant, merged, line);
            tokens.drain(i + 1..i + 4);
            continue;
        }
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanner() -> RegexScanner {
        RegexScanner::new(&["int", "return"]).unwrap()
    }

    #[test]
    fn classifies_keyword_and_identifier() {
        let s = scanner();
        let (tokens, diags) = s.tokenize("int x");
        assert!(diags.is_empty());
        assert_eq!(tokens[0].class(), TokenClass::Keyword);
        assert_eq!(tokens[1].class(), TokenClass::Identifier);
    }

    #[test]
    fn coalesces_complex_literal() {
        let s = scanner();
        let (tokens, _) = s.tokenize("3+4i");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].class(), TokenClass::Complex);
        assert_eq!(tokens[0].lexeme(), "3+4i");
    }

    #[test]
    fn coalesces_scientific_notation_with_explicit_sign() {
        let s = scanner();
        let (tokens, _) = s.tokenize("3 E -4");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].class(), TokenClass::Constant);
        assert_eq!(tokens[0].lexeme(), "3E-4");
    }

    #[test]
    fn invalid_run_at_whitespace_boundary_is_dropped_but_diagnosed() {
        let s = scanner();
        let (tokens, diags) = s.tokenize("int 3x y");
        assert_eq!(diags.len(), 1);
        let lexemes: Vec<&str> = tokens.iter().map(|t| t.lexeme()).collect();
        assert_eq!(lexemes, vec!["int", "y"]);
    }

    #[test]
    fn invalid_run_at_end_of_input_is_kept() {
        let s = scanner();
        let (tokens, diags) = s.tokenize("int 3x");
        assert_eq!(diags.len(), 1);
        assert_eq!(tokens.last().unwrap().class(), TokenClass::Invalid);
        assert_eq!(tokens.last().unwrap().lexeme(), "3x");
    }
}
