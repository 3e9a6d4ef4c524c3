use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use indexmap::IndexSet;
use crate::error::{GrammarError, LoadError};

/// Marker for the empty string on a right-hand side.
pub const EPSILON: &str = "ε";

/// End-of-input terminal, appended to every grammar.
pub const END: &str = "#";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TermId(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NontermId(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProdId(pub(crate) u32);

impl TermId {
  pub fn index(self) -> usize {
    self.0 as usize
  }
}

impl NontermId {
  pub fn index(self) -> usize {
    self.0 as usize
  }
}

impl ProdId {
  pub fn index(self) -> usize {
    self.0 as usize
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
  Term(TermId),
  Nonterm(NontermId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
  pub(crate) nonterm: NontermId,
  /// empty for an ε-production
  pub(crate) symbols: Vec<Symbol>,
}

impl Production {
  pub fn nonterm(&self) -> NontermId {
    self.nonterm
  }

  pub fn symbols(&self) -> &[Symbol] {
    &self.symbols
  }

  pub fn is_epsilon(&self) -> bool {
    self.symbols.is_empty()
  }
}

/// A validated context-free grammar. Symbol ids are dense indices into the
/// declared symbol sets, so tables over the grammar can be plain arrays.
#[derive(Debug, Clone)]
pub struct Grammar {
  start: NontermId,
  nonterms: IndexSet<String>,
  /// the last one is always `END`
  terms: IndexSet<String>,
  prods: Vec<Production>,
}

impl Grammar {
  /// Builds a grammar. A right-hand side of just `EPSILON` (or no symbols at
  /// all) is an ε-production. `END` is appended to the terminals.
  pub fn new(
    start: impl Into<String>,
    nonterms: Vec<String>,
    terms: Vec<String>,
    prods: Vec<(String, Vec<String>)>,
  ) -> Result<Self, GrammarError> {
    let start = start.into();
    if nonterms.is_empty() {
      return Err(GrammarError::NoNonterminals);
    }

    let mut nonterm_set = IndexSet::new();
    for name in nonterms {
      if name == EPSILON || name == END {
        return Err(GrammarError::Reserved(name));
      }
      nonterm_set.insert(name);
    }

    let mut term_set = IndexSet::new();
    for name in terms {
      if name == EPSILON {
        return Err(GrammarError::Reserved(name));
      }
      if nonterm_set.contains(&name) {
        return Err(GrammarError::Overlap(name));
      }
      if name != END {
        term_set.insert(name);
      }
    }
    term_set.insert(END.to_owned());

    let start = match nonterm_set.get_index_of(&start) {
      Some(ix) => NontermId(ix as u32),
      None => return Err(GrammarError::MissingStart(start)),
    };

    let prods = prods.into_iter()
      .map(|(lhs, rhs)| gen_prod(&nonterm_set, &term_set, lhs, rhs))
      .collect::<Result<Vec<_>, _>>()?;

    Ok(Grammar {
      start,
      nonterms: nonterm_set,
      terms: term_set,
      prods,
    })
  }

  pub fn start(&self) -> NontermId {
    self.start
  }

  pub fn end(&self) -> TermId {
    TermId(self.terms.len() as u32 - 1)
  }

  pub fn is_terminal(&self, name: &str) -> bool {
    self.terms.contains(name)
  }

  pub fn is_nonterminal(&self, name: &str) -> bool {
    self.nonterms.contains(name)
  }

  pub fn term_id(&self, name: &str) -> Option<TermId> {
    self.terms.get_index_of(name).map(|ix| TermId(ix as u32))
  }

  pub fn nonterm_id(&self, name: &str) -> Option<NontermId> {
    self.nonterms.get_index_of(name).map(|ix| NontermId(ix as u32))
  }

  pub fn symbol(&self, name: &str) -> Option<Symbol> {
    self.term_id(name).map(Symbol::Term)
      .or_else(|| self.nonterm_id(name).map(Symbol::Nonterm))
  }

  pub fn term_name(&self, id: TermId) -> &str {
    &self.terms[id.index()]
  }

  pub fn nonterm_name(&self, id: NontermId) -> &str {
    &self.nonterms[id.index()]
  }

  pub fn name(&self, sym: Symbol) -> &str {
    match sym {
      Symbol::Term(id) => self.term_name(id),
      Symbol::Nonterm(id) => self.nonterm_name(id),
    }
  }

  pub fn num_terms(&self) -> usize {
    self.terms.len()
  }

  pub fn num_nonterms(&self) -> usize {
    self.nonterms.len()
  }

  pub fn terminals(&self) -> impl Iterator<Item = (TermId, &str)> {
    self.terms.iter()
      .enumerate()
      .map(|(i, name)| (TermId(i as u32), name.as_str()))
  }

  pub fn nonterminals(&self) -> impl Iterator<Item = (NontermId, &str)> {
    self.nonterms.iter()
      .enumerate()
      .map(|(i, name)| (NontermId(i as u32), name.as_str()))
  }

  pub fn productions(&self) -> impl Iterator<Item = (ProdId, &Production)> {
    self.prods.iter()
      .enumerate()
      .map(|(i, prod)| (ProdId(i as u32), prod))
  }

  pub fn productions_of(
    &self,
    nonterm: NontermId,
  ) -> impl Iterator<Item = (ProdId, &Production)> {
    self.productions().filter(move |(_, prod)| prod.nonterm == nonterm)
  }

  pub fn production(&self, id: ProdId) -> &Production {
    &self.prods[id.index()]
  }

  pub fn num_prods(&self) -> usize {
    self.prods.len()
  }

  /// Displays a production as `A -> x y`.
  pub fn display(&self, id: ProdId) -> ProductionDisplay {
    ProductionDisplay {
      grammar: self,
      prod: self.production(id),
    }
  }
}

impl FromStr for Grammar {
  type Err = LoadError;

  fn from_str(s: &str) -> Result<Self, LoadError> {
    crate::bnf::parse(s)
  }
}

fn gen_prod(
  nonterms: &IndexSet<String>,
  terms: &IndexSet<String>,
  lhs: String,
  rhs: Vec<String>,
) -> Result<Production, GrammarError> {
  let nonterm = match nonterms.get_index_of(&lhs) {
    Some(ix) => NontermId(ix as u32),
    None if terms.contains(&lhs) => {
      return Err(GrammarError::NotANonterminal(lhs));
    }
    None => {
      return Err(GrammarError::UndeclaredSymbol {
        production: format!("{} -> {}", lhs, rhs.join(" ")),
        symbol: lhs,
      });
    }
  };

  let mut symbols = vec![];
  for name in &rhs {
    if name == EPSILON {
      continue;
    }
    if let Some(ix) = terms.get_index_of(name) {
      symbols.push(Symbol::Term(TermId(ix as u32)));
    } else if let Some(ix) = nonterms.get_index_of(name) {
      symbols.push(Symbol::Nonterm(NontermId(ix as u32)));
    } else {
      return Err(GrammarError::UndeclaredSymbol {
        symbol: name.clone(),
        production: format!("{} -> {}", lhs, rhs.join(" ")),
      });
    }
  }

  Ok(Production {
    nonterm,
    symbols,
  })
}

pub struct ProductionDisplay<'a> {
  grammar: &'a Grammar,
  prod: &'a Production,
}

impl Display for ProductionDisplay<'_> {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "{} ->", self.grammar.nonterm_name(self.prod.nonterm))?;
    if self.prod.is_epsilon() {
      return write!(f, " {}", EPSILON);
    }
    for &sym in &self.prod.symbols {
      write!(f, " {}", self.grammar.name(sym))?;
    }
    Ok(())
  }
}

/// Builds a grammar whose start symbol is the first nonterminal. Right-hand
/// sides are whitespace separated symbol names.
pub fn grammar(
  nonterms: &[&str],
  terms: &[&str],
  prods: &[(&str, &str)],
) -> Result<Grammar, GrammarError> {
  let start = nonterms.first().ok_or(GrammarError::NoNonterminals)?;
  Grammar::new(
    *start,
    nonterms.iter().map(|&s| s.to_owned()).collect(),
    terms.iter().map(|&s| s.to_owned()).collect(),
    prods.iter()
      .map(|(lhs, rhs)| {
        let rhs = rhs.split_whitespace().map(|s| s.to_owned()).collect();
        ((*lhs).to_owned(), rhs)
      })
      .collect(),
  )
}
