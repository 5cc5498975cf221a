//! A table-driven lexical analyzer: declarative token rules compiled to an
//! NFA, the NFA subset-constructed into a DFA, and a maximal-munch scanner
//! driven by that DFA, plus a second, regex-driven scanner strategy for
//! callers that want complex-literal support.

pub mod dfa;
pub mod error;
pub mod nfa;
pub mod regex_scanner;
pub mod rule;
pub mod scanner;
pub mod token;

pub use dfa::Dfa;
pub use error::Error;
pub use nfa::Nfa;
pub use regex_scanner::RegexScanner;
pub use rule::{load_rules, parse_rules, TokenRule};
pub use scanner::{DfaScanner, Scanner};
pub use token::{Diagnostic, Token, TokenClass};
