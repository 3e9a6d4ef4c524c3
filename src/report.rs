//! Plain-text rendering of the sets, the table and derivations.

use std::fmt::{self, Display, Formatter};
use crate::grammar::{Grammar, EPSILON};
use crate::parser::{Action, Derivation, FirstSets, FollowSets, Table, TokenSet, Verdict};

struct Report<F>(F);

fn report<F>(f: F) -> Report<F>
where
  F: Fn(&mut Formatter) -> fmt::Result,
{
  Report(f)
}

impl<F> Display for Report<F>
where
  F: Fn(&mut Formatter) -> fmt::Result,
{
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    (self.0)(f)
  }
}

/// Start symbol, symbol sets and productions.
pub fn grammar<'a>(grammar: &'a Grammar) -> impl Display + 'a {
  report(move |f: &mut Formatter| {
    writeln!(f, "start: {}", grammar.nonterm_name(grammar.start()))?;
    let nonterms = grammar.nonterminals().map(|(_, name)| name).collect::<Vec<_>>();
    writeln!(f, "nonterminals: {{ {} }}", nonterms.join(", "))?;
    let terms = grammar.terminals().map(|(_, name)| name).collect::<Vec<_>>();
    writeln!(f, "terminals: {{ {} }}", terms.join(", "))?;
    writeln!(f, "productions:")?;
    for (id, _) in grammar.productions() {
      writeln!(f, "{}", grammar.display(id))?;
    }
    Ok(())
  })
}

/// `First(E) = { (, i }`, one line per nonterminal.
pub fn first_sets<'a>(
  grammar: &'a Grammar,
  first: &'a FirstSets,
) -> impl Display + 'a {
  report(move |f: &mut Formatter| {
    for (id, name) in grammar.nonterminals() {
      let set = first.nonterm(id);
      write!(f, "First({}) = ", name)?;
      write_set(f, grammar, set.terms(), set.contains_empty())?;
      writeln!(f)?;
    }
    Ok(())
  })
}

/// `Follow(E) = { ), # }`, one line per nonterminal.
pub fn follow_sets<'a>(
  grammar: &'a Grammar,
  follow: &'a FollowSets,
) -> impl Display + 'a {
  report(move |f: &mut Formatter| {
    for (id, name) in grammar.nonterminals() {
      write!(f, "Follow({}) = ", name)?;
      write_set(f, grammar, follow.get(id), false)?;
      writeln!(f)?;
    }
    Ok(())
  })
}

/// `M[E, (] = E -> T E'`, one line per populated cell.
pub fn table<'a>(grammar: &'a Grammar, table: &'a Table) -> impl Display + 'a {
  report(move |f: &mut Formatter| {
    for (nonterm, term, prod) in table.entries() {
      writeln!(f, "M[{}, {}] = {}",
        grammar.nonterm_name(nonterm),
        grammar.term_name(term),
        grammar.display(prod))?;
    }
    Ok(())
  })
}

/// The whole table, one row per nonterminal and one column per terminal,
/// `err` in empty cells.
pub fn grid<'a>(grammar: &'a Grammar, table: &'a Table) -> impl Display + 'a {
  report(move |f: &mut Formatter| {
    let mut rows = vec![];
    rows.push(Some("M".to_owned()).into_iter()
      .chain(grammar.terminals().map(|(_, name)| name.to_owned()))
      .collect::<Vec<_>>());
    for (nonterm, name) in grammar.nonterminals() {
      let mut row = vec![name.to_owned()];
      for (term, _) in grammar.terminals() {
        row.push(match table.get(nonterm, term) {
          Some(prod) => grammar.display(prod).to_string(),
          None => "err".to_owned(),
        });
      }
      rows.push(row);
    }

    let mut widths = vec![0; rows[0].len()];
    for row in &rows {
      for (width, cell) in widths.iter_mut().zip(row) {
        *width = (*width).max(cell.chars().count());
      }
    }
    for row in &rows {
      let line = row.iter()
        .zip(&widths)
        .map(|(cell, &width)| format!("{:<1$}", cell, width))
        .collect::<Vec<_>>()
        .join(" | ");
      writeln!(f, "{}", line.trim_end())?;
    }
    Ok(())
  })
}

/// `step | stack | input | action`, one line per step.
pub fn steps<'a>(
  grammar: &'a Grammar,
  derivation: &'a Derivation,
) -> impl Display + 'a {
  report(move |f: &mut Formatter| {
    for (i, step) in derivation.steps.iter().enumerate() {
      write!(f, "{} |", i + 1)?;
      for &sym in &step.stack {
        write!(f, " {}", grammar.name(sym))?;
      }
      write!(f, " |")?;
      for &term in &step.input {
        write!(f, " {}", grammar.term_name(term))?;
      }
      write!(f, " | ")?;
      match step.action {
        Action::Expand(prod) => writeln!(f, "{}", grammar.display(prod))?,
        Action::Match(term) => writeln!(f, "match {}", grammar.term_name(term))?,
        Action::Accept => writeln!(f, "accept")?,
        Action::Error => writeln!(f, "error")?,
      }
    }
    Ok(())
  })
}

/// [`steps`] followed by the verdict.
pub fn derivation<'a>(
  grammar: &'a Grammar,
  derivation: &'a Derivation,
) -> impl Display + 'a {
  report(move |f: &mut Formatter| {
    write!(f, "{}", steps(grammar, derivation))?;
    match &derivation.verdict {
      Verdict::Accept => writeln!(f, "accepted"),
      Verdict::Reject(error) => writeln!(f, "rejected: {}", error),
    }
  })
}

fn write_set(
  f: &mut Formatter,
  grammar: &Grammar,
  terms: &TokenSet,
  empty: bool,
) -> fmt::Result {
  let names = terms.iter()
    .map(|t| grammar.term_name(t))
    .chain(if empty { Some(EPSILON) } else { None })
    .collect::<Vec<_>>();
  if names.is_empty() {
    write!(f, "{{ }}")
  } else {
    write!(f, "{{ {} }}", names.join(", "))
  }
}
