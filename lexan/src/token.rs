use std::fmt;

/// The closed tag set a lexeme is classified into.
///
/// `Complex` is only ever produced by [`crate::regex_scanner::RegexScanner`];
/// [`crate::scanner::DfaScanner`] never emits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenClass {
    Keyword,
    Identifier,
    Constant,
    Limiter,
    Operator,
    Invalid,
    Complex,
}

impl TokenClass {
    /// Maps a rule-file class letter (`K`, `I`, `C`, `L`, `O`, `E`) to a class.
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'K' => Some(TokenClass::Keyword),
            'I' => Some(TokenClass::Identifier),
            'C' => Some(TokenClass::Constant),
            'L' => Some(TokenClass::Limiter),
            'O' => Some(TokenClass::Operator),
            'E' => Some(TokenClass::Invalid),
            _ => None,
        }
    }
}

impl fmt::Display for TokenClass {
    fn fmt(&self, dest: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            TokenClass::Keyword => "Keyword",
            TokenClass::Identifier => "Identifier",
            TokenClass::Constant => "Constant",
            TokenClass::Limiter => "Limiter",
            TokenClass::Operator => "Operator",
            TokenClass::Invalid => "Invalid",
            TokenClass::Complex => "Complex",
        };
        write!(dest, "{}", name)
    }
}

/// A single lexeme recognized by a scanner, with its originating line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    class: TokenClass,
    lexeme: String,
    line: usize,
}

impl Token {
    pub fn new(class: TokenClass, lexeme: impl Into<String>, line: usize) -> Self {
        Self {
            class,
            lexeme: lexeme.into(),
            line,
        }
    }

    pub fn class(&self) -> TokenClass {
        self.class
    }

    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    pub fn line(&self) -> usize {
        self.line
    }
}

impl fmt::Display for Token {
    fn fmt(&self, dest: &mut fmt::Formatter) -> fmt::Result {
        write!(
            dest,
            "(Line: {}, Type: {}, Value: {})",
            self.line, self.class, self.lexeme
        )
    }
}

/// A scanner-reported problem that did not prevent scanning from continuing:
/// the scanner recovers locally and keeps going.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, dest: &mut fmt::Formatter) -> fmt::Result {
        write!(dest, "line {}: {}", self.line, self.message)
    }
}
