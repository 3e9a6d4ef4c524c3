use crate::grammar::*;
use super::token_set::TokenSet;

/// First set of a symbol or symbol string: terminals, plus whether the empty
/// string is derivable.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct FirstSet {
  pub(crate) terms: TokenSet,
  pub(crate) empty: bool,
}

impl FirstSet {
  fn new(num_terms: usize) -> Self {
    FirstSet {
      terms: TokenSet::new(num_terms),
      empty: false,
    }
  }

  pub fn terms(&self) -> &TokenSet {
    &self.terms
  }

  /// Whether ε is a member.
  pub fn contains_empty(&self) -> bool {
    self.empty
  }

  pub fn contains(&self, term: TermId) -> bool {
    self.terms.contains(term)
  }

  /// Returns whether the set has changed.
  fn union_with(&mut self, other: &FirstSet) -> bool {
    let changed = self.terms.union_with(&other.terms);
    let empty = self.empty | other.empty;
    let changed = changed || empty != self.empty;
    self.empty = empty;
    changed
  }
}

#[derive(Debug)]
pub struct FirstSets {
  num_terms: usize,
  terms: Vec<FirstSet>,
  nonterms: Vec<FirstSet>,
  empty: FirstSet,
}

impl FirstSets {
  pub fn compute(grammar: &Grammar) -> Self {
    let num_terms = grammar.num_terms();
    let terms = grammar.terminals()
      .map(|(id, _)| FirstSet {
        terms: TokenSet::from_token(num_terms, id),
        empty: false,
      })
      .collect();
    let mut empty = FirstSet::new(num_terms);
    empty.empty = true;

    let mut sets = FirstSets {
      num_terms,
      terms,
      nonterms: vec![FirstSet::new(num_terms); grammar.num_nonterms()],
      empty,
    };

    let mut buf = FirstSet::new(num_terms);
    loop {
      let mut changed = false;
      for (_, prod) in grammar.productions() {
        sets.compute_for_symbols(&mut buf, &prod.symbols);
        changed |= sets.nonterms[prod.nonterm.index()].union_with(&buf);
      }
      if !changed {
        break;
      }
    }

    sets
  }

  pub fn get(&self, sym: Symbol) -> &FirstSet {
    match sym {
      Symbol::Term(id) => &self.terms[id.index()],
      Symbol::Nonterm(id) => &self.nonterms[id.index()],
    }
  }

  pub fn nonterm(&self, id: NontermId) -> &FirstSet {
    &self.nonterms[id.index()]
  }

  /// First(ε), that is `{ε}`.
  pub fn empty(&self) -> &FirstSet {
    &self.empty
  }

  /// First of a symbol string; the empty string gives `{ε}`.
  pub fn of_symbols(&self, symbols: &[Symbol]) -> FirstSet {
    let mut result = FirstSet::new(self.num_terms);
    self.compute_for_symbols(&mut result, symbols);
    result
  }

  fn compute_for_symbols(&self, result: &mut FirstSet, symbols: &[Symbol]) {
    result.terms.clear();
    result.empty = false;
    for &sym in symbols {
      let first = self.get(sym);
      result.terms.union_with(&first.terms);
      if !first.empty {
        return;
      }
    }
    result.empty = true;
  }
}

#[derive(Debug)]
pub struct FollowSets {
  nonterms: Vec<TokenSet>,
}

impl FollowSets {
  pub fn compute(grammar: &Grammar, first: &FirstSets) -> Self {
    let mut follow = vec![TokenSet::new(grammar.num_terms());
      grammar.num_nonterms()];
    follow[grammar.start().index()].insert(grammar.end());

    let mut buf = FirstSet::new(grammar.num_terms());
    loop {
      let mut changed = false;
      for (_, prod) in grammar.productions() {
        for (i, &sym) in prod.symbols.iter().enumerate() {
          let nonterm = match sym {
            Symbol::Nonterm(id) => id.index(),
            Symbol::Term(_) => continue,
          };
          first.compute_for_symbols(&mut buf, &prod.symbols[i + 1..]);
          changed |= follow[nonterm].union_with(&buf.terms);
          if buf.empty && nonterm != prod.nonterm.index() {
            let lhs = follow[prod.nonterm.index()].clone();
            changed |= follow[nonterm].union_with(&lhs);
          }
        }
      }
      if !changed {
        break;
      }
    }

    FollowSets {
      nonterms: follow,
    }
  }

  pub fn get(&self, id: NontermId) -> &TokenSet {
    &self.nonterms[id.index()]
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  fn simple() -> Grammar {
    r#"
      Z X Y
      a c d
      Z -> d
      Z -> X Y Z
      Y -> &
      Y -> c
      X -> Y
      X -> a
    "#.parse().unwrap()
  }

  fn names(g: &Grammar, set: &TokenSet) -> Vec<String> {
    set.iter().map(|t| g.term_name(t).to_owned()).collect()
  }

  #[test]
  fn simple_nullable() {
    let g = simple();
    let first = FirstSets::compute(&g);
    let nullable = g.nonterminals()
      .map(|(id, _)| first.nonterm(id).contains_empty())
      .collect::<Vec<_>>();
    assert_eq!(nullable, vec![false, true, true]);
  }

  #[test]
  fn simple_first() {
    let g = simple();
    let first = FirstSets::compute(&g);
    let z = g.nonterm_id("Z").unwrap();
    let x = g.nonterm_id("X").unwrap();
    let y = g.nonterm_id("Y").unwrap();
    assert_eq!(names(&g, first.nonterm(z).terms()), vec!["a", "c", "d"]);
    assert_eq!(names(&g, first.nonterm(x).terms()), vec!["a", "c"]);
    assert_eq!(names(&g, first.nonterm(y).terms()), vec!["c"]);
  }

  #[test]
  fn terminal_and_empty_first() {
    let g = simple();
    let first = FirstSets::compute(&g);
    for (id, _) in g.terminals() {
      let set = first.get(Symbol::Term(id));
      assert_eq!(set.terms().iter().collect::<Vec<_>>(), vec![id]);
      assert!(!set.contains_empty());
    }
    assert!(first.empty().contains_empty());
    assert!(first.empty().terms().is_empty());
    assert_eq!(first.of_symbols(&[]), *first.empty());
  }

  #[test]
  fn string_first_walks_nullable_prefix() {
    let g = simple();
    let first = FirstSets::compute(&g);
    let x = Symbol::Nonterm(g.nonterm_id("X").unwrap());
    let y = Symbol::Nonterm(g.nonterm_id("Y").unwrap());
    let d = Symbol::Term(g.term_id("d").unwrap());

    let xy = first.of_symbols(&[x, y]);
    assert_eq!(names(&g, xy.terms()), vec!["a", "c"]);
    assert!(xy.contains_empty());

    let yd = first.of_symbols(&[y, d, x]);
    assert_eq!(names(&g, yd.terms()), vec!["c", "d"]);
    assert!(!yd.contains_empty());
  }

  #[test]
  fn simple_follow() {
    let g = simple();
    let first = FirstSets::compute(&g);
    let follow = FollowSets::compute(&g, &first);
    let z = g.nonterm_id("Z").unwrap();
    let x = g.nonterm_id("X").unwrap();
    let y = g.nonterm_id("Y").unwrap();
    assert_eq!(names(&g, follow.get(z)), vec!["#"]);
    assert_eq!(names(&g, follow.get(x)), vec!["a", "c", "d"]);
    assert_eq!(names(&g, follow.get(y)), vec!["a", "c", "d"]);
  }

  #[test]
  fn follow_contains_first_of_rest() {
    let g = simple();
    let first = FirstSets::compute(&g);
    let follow = FollowSets::compute(&g, &first);
    for (_, prod) in g.productions() {
      for (i, &sym) in prod.symbols().iter().enumerate() {
        if let Symbol::Nonterm(id) = sym {
          let rest = first.of_symbols(&prod.symbols()[i + 1..]);
          assert!(rest.terms().is_subset(follow.get(id)));
        }
      }
    }
  }
}
