//! LL(1) predictive parsing.
//!
//! A [`Grammar`] is turned into First and Follow sets, then into a predictive
//! table; the [`Parser`] drives a stack automaton over that table and records
//! every step of the derivation.
//!
//! ```
//! let parser = yuce::load(r#"
//!   EE'TT'F
//!   +*()i
//!   E -> TE'
//!   E' -> +TE' | &
//!   T -> FT'
//!   T' -> *FT' | &
//!   F -> (E) | i
//! "#).unwrap();
//!
//! assert!(parser.parse_str("i+i*i#").is_accepted());
//! assert!(!parser.parse_str("i+#").is_accepted());
//! ```

pub mod bnf;
pub mod error;
pub mod grammar;
pub mod parser;
pub mod report;

pub use error::{AmbiguousGrammarError, Error, GrammarError, LoadError, SyntaxError};
pub use grammar::{grammar, Grammar};
pub use parser::{Derivation, Parser, ParserOptions, Verdict};

pub fn build(grammar: Grammar) -> Result<Parser, AmbiguousGrammarError> {
  Parser::new(grammar)
}

/// Loads grammar text (see [`bnf`]) and builds its parser.
pub fn load(text: &str) -> Result<Parser, Error> {
  let grammar = bnf::parse(text)?;
  Ok(Parser::new(grammar)?)
}
