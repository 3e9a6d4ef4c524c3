use crate::error::{AmbiguousGrammarError, Conflict};
use crate::grammar::*;
use super::sets::{FirstSets, FollowSets};

/// LL(1) predictive table: nonterminal × terminal -> production. Rows are
/// nonterminal ids, columns terminal ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
  cols: usize,
  cells: Box<[Option<ProdId>]>,
}

impl Table {
  /// Fails with every conflicting cell if the grammar is not LL(1).
  pub fn build(
    grammar: &Grammar,
    first: &FirstSets,
    follow: &FollowSets,
  ) -> Result<Self, AmbiguousGrammarError> {
    let cols = grammar.num_terms();
    let mut table = Table {
      cols,
      cells: vec![None; grammar.num_nonterms() * cols].into_boxed_slice(),
    };
    let mut conflicts = vec![];

    for (prod_id, prod) in grammar.productions() {
      let first_rhs = first.of_symbols(&prod.symbols);
      for term in first_rhs.terms() {
        table.add(grammar, &mut conflicts, prod.nonterm, term, prod_id);
      }
      if first_rhs.contains_empty() {
        for term in follow.get(prod.nonterm) {
          table.add(grammar, &mut conflicts, prod.nonterm, term, prod_id);
        }
      }
    }

    if conflicts.is_empty() {
      Ok(table)
    } else {
      Err(AmbiguousGrammarError {
        conflicts,
      })
    }
  }

  fn add(
    &mut self,
    grammar: &Grammar,
    conflicts: &mut Vec<Conflict>,
    nonterm: NontermId,
    term: TermId,
    prod: ProdId,
  ) {
    let ix = self.cell(nonterm, term);
    match self.cells[ix] {
      None => self.cells[ix] = Some(prod),
      Some(old) if old == prod => {}
      Some(old) => {
        conflicts.push(Conflict {
          nonterm: grammar.nonterm_name(nonterm).to_owned(),
          term: grammar.term_name(term).to_owned(),
          existing: grammar.display(old).to_string(),
          incoming: grammar.display(prod).to_string(),
        });
      }
    }
  }

  fn cell(&self, nonterm: NontermId, term: TermId) -> usize {
    nonterm.index() * self.cols + term.index()
  }

  pub fn get(&self, nonterm: NontermId, term: TermId) -> Option<ProdId> {
    self.cells[self.cell(nonterm, term)]
  }

  pub fn rows(&self) -> usize {
    if self.cols == 0 {
      0
    } else {
      self.cells.len() / self.cols
    }
  }

  pub fn cols(&self) -> usize {
    self.cols
  }

  /// Populated cells, row-major.
  pub fn entries(&self) -> impl Iterator<Item = (NontermId, TermId, ProdId)> + '_ {
    let cols = self.cols;
    self.cells.iter()
      .enumerate()
      .filter_map(move |(ix, cell)| {
        cell.map(|prod| {
          (NontermId((ix / cols) as u32), TermId((ix % cols) as u32), prod)
        })
      })
  }
}
