use crate::bnf;
use crate::error::{AmbiguousGrammarError, SyntaxError};
use crate::grammar::{Grammar, Symbol, END};

mod token_set;
mod sets;
mod table;
mod driver;

pub use token_set::TokenSet;
pub use sets::{FirstSet, FirstSets, FollowSets};
pub use table::Table;
pub use driver::{Action, Derivation, Step, Verdict};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserOptions {
  max_steps: Option<usize>,
}

impl ParserOptions {
  /// Caps the number of automaton steps per parse. The default cap is an
  /// upper bound on the steps of any accepted sentence of that length.
  pub fn max_steps(mut self, max_steps: usize) -> Self {
    self.max_steps = Some(max_steps);
    self
  }
}

/// A grammar together with its First/Follow sets and predictive table.
/// Immutable once built; `parse` can be called from several threads.
#[derive(Debug)]
pub struct Parser {
  grammar: Grammar,
  first: FirstSets,
  follow: FollowSets,
  table: Table,
  erase_cost: usize,
  options: ParserOptions,
}

impl Parser {
  pub fn new(grammar: Grammar) -> Result<Self, AmbiguousGrammarError> {
    Self::with_options(grammar, ParserOptions::default())
  }

  pub fn with_options(
    grammar: Grammar,
    options: ParserOptions,
  ) -> Result<Self, AmbiguousGrammarError> {
    let first = FirstSets::compute(&grammar);
    let follow = FollowSets::compute(&grammar, &first);
    let table = Table::build(&grammar, &first, &follow)?;
    let erase_cost = max_erase_cost(&grammar, &first);
    Ok(Parser {
      grammar,
      first,
      follow,
      table,
      erase_cost,
      options,
    })
  }

  pub fn grammar(&self) -> &Grammar {
    &self.grammar
  }

  pub fn first_sets(&self) -> &FirstSets {
    &self.first
  }

  pub fn follow_sets(&self) -> &FollowSets {
    &self.follow
  }

  pub fn table(&self) -> &Table {
    &self.table
  }

  /// Parses a sentence given as terminal names. The trailing `#` is optional.
  pub fn parse<S: AsRef<str>>(&self, input: &[S]) -> Derivation {
    let mut terms = Vec::with_capacity(input.len() + 1);
    for (position, name) in input.iter().enumerate() {
      let name = name.as_ref();
      match self.grammar.term_id(name) {
        Some(_) if name == END && position + 1 != input.len() => {
          return Derivation::reject(vec![], SyntaxError::MisplacedEnd {
            position,
          });
        }
        Some(id) => terms.push(id),
        None => {
          return Derivation::reject(vec![], SyntaxError::UnknownSymbol {
            symbol: name.to_owned(),
            position,
          });
        }
      }
    }
    let end = self.grammar.end();
    if terms.last() != Some(&end) {
      terms.push(end);
    }

    let max_steps = self.options.max_steps
      .unwrap_or_else(|| self.step_limit(terms.len()));
    driver::derive(&self.grammar, &self.table, &terms, max_steps)
  }

  /// Parses a sentence written without separators, such as `i+i*i#`; see
  /// [`bnf::split_sentence`].
  pub fn parse_str(&self, sentence: &str) -> Derivation {
    match bnf::split_sentence(&self.grammar, sentence) {
      Ok(symbols) => self.parse(&symbols),
      Err(error) => Derivation::reject(vec![], error),
    }
  }

  /// In a parse tree built from a conflict-free table, a nonterminal never
  /// repeats among the nodes whose leftmost input symbol is the same, so at
  /// most `input_len * nonterms` nodes lead to input. Every other subtree
  /// derives ε, hangs off one of those nodes and costs at most `erase_cost`.
  fn step_limit(&self, input_len: usize) -> usize {
    let nonterms = self.grammar.num_nonterms();
    let longest_rhs = self.grammar.productions()
      .map(|(_, prod)| prod.symbols().len())
      .max()
      .unwrap_or(0);
    let nodes = input_len.saturating_mul(nonterms).saturating_add(1);
    let per_node = longest_rhs.saturating_mul(self.erase_cost).saturating_add(1);
    nodes.saturating_mul(per_node)
      .saturating_add(self.erase_cost)
      .saturating_add(input_len)
      .saturating_add(nonterms + 1)
  }
}

/// The most expansions any nullable nonterminal takes to derive ε, or
/// `usize::MAX` if some ε-derivation is cyclic.
fn max_erase_cost(grammar: &Grammar, first: &FirstSets) -> usize {
  let mut cost = vec![0usize; grammar.num_nonterms()];

  for _ in 0..=grammar.num_nonterms() {
    let mut changed = false;
    for (_, prod) in grammar.productions() {
      let mut total = 1usize;
      let mut nullable = true;
      for &sym in prod.symbols() {
        match sym {
          Symbol::Nonterm(n) if first.nonterm(n).contains_empty() => {
            total = total.saturating_add(cost[n.index()]);
          }
          _ => {
            nullable = false;
            break;
          }
        }
      }

      let slot = &mut cost[prod.nonterm().index()];
      if nullable && total > *slot {
        *slot = total;
        changed = true;
      }
    }
    if !changed {
      return cost.into_iter().max().unwrap_or(0);
    }
  }
  usize::MAX
}
