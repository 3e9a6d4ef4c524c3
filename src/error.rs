use std::fmt::{self, Display, Formatter};
use thiserror::Error;

/// The grammar description violates an invariant of the grammar model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
  #[error("start symbol `{0}` is not a declared nonterminal")]
  MissingStart(String),
  #[error("no nonterminals declared")]
  NoNonterminals,
  #[error("undeclared symbol `{symbol}` in production `{production}`")]
  UndeclaredSymbol {
    symbol: String,
    production: String,
  },
  #[error("left-hand side `{0}` is not a nonterminal")]
  NotANonterminal(String),
  #[error("`{0}` is declared both as terminal and nonterminal")]
  Overlap(String),
  #[error("`{0}` is reserved and cannot be declared here")]
  Reserved(String),
}

/// The grammar text could not be turned into a grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
  #[error("missing nonterminal declaration line")]
  MissingNonterminals,
  #[error("missing terminal declaration line")]
  MissingTerminals,
  #[error("line {line}: unexpected third declaration line")]
  ExtraDeclaration {
    line: usize,
  },
  #[error("line {line}: production has no left-hand side")]
  EmptyLhs {
    line: usize,
  },
  #[error("line {line}: cannot split `{text}` into declared symbols")]
  UnknownSymbol {
    line: usize,
    text: String,
  },
  #[error(transparent)]
  Grammar(#[from] GrammarError),
}

/// Two distinct productions claim the same predictive table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
  pub nonterm: String,
  pub term: String,
  pub existing: String,
  pub incoming: String,
}

impl Display for Conflict {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "M[{}, {}]: `{}` vs `{}`",
      self.nonterm, self.term, self.existing, self.incoming)
  }
}

/// The grammar is not LL(1).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("grammar is not LL(1): {}", join(.conflicts))]
pub struct AmbiguousGrammarError {
  /// non-empty, in table construction order
  pub conflicts: Vec<Conflict>,
}

fn join(conflicts: &[Conflict]) -> String {
  conflicts.iter()
    .map(|c| c.to_string())
    .collect::<Vec<_>>()
    .join("; ")
}

/// Why a sentence was rejected. `position` is the index of the current input
/// symbol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
  #[error("expected `{expected}`, found `{found}` at {position}")]
  Mismatch {
    expected: String,
    found: String,
    position: usize,
  },
  #[error("no predictive entry for `{nonterm}` on `{term}` at {position}")]
  NoEntry {
    nonterm: String,
    term: String,
    position: usize,
  },
  #[error("unknown input symbol `{symbol}` at {position}")]
  UnknownSymbol {
    symbol: String,
    position: usize,
  },
  #[error("end marker before the end of input at {position}")]
  MisplacedEnd {
    position: usize,
  },
  #[error("gave up after {0} steps")]
  StepLimit(usize),
}

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Load(#[from] LoadError),
  #[error(transparent)]
  Grammar(#[from] GrammarError),
  #[error(transparent)]
  Ambiguous(#[from] AmbiguousGrammarError),
}
