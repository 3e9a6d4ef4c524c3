//! Line-oriented grammar text.
//!
//! ```text
//! EE'TT'F
//! +*()i
//! E -> TE'
//! E' -> +TE' | &
//! T -> FT'
//! T' -> *FT' | &
//! F -> (E) | i
//! ```
//!
//! The first line without `->` declares the nonterminals, the first of which
//! is the start symbol; the second declares the terminals. A declaration line
//! containing whitespace is split on it, otherwise every character is a
//! symbol and trailing `'` marks stick to the character before them.
//! Right-hand sides are split into the longest declared names, so `TE'` and
//! `T E'` mean the same. `&` or `ε` alone is the empty string. `//` starts a
//! comment line.

use crate::error::{LoadError, SyntaxError};
use crate::grammar::{Grammar, END, EPSILON};

pub fn parse(text: &str) -> Result<Grammar, LoadError> {
  let mut decls = vec![];
  let mut prods = vec![];

  for (i, line) in text.lines().enumerate() {
    let line_no = i + 1;
    let line = line.trim();
    if line.is_empty() || line.starts_with("//") {
      continue;
    }
    match line.find("->") {
      Some(pos) => {
        let lhs = line[..pos].trim();
        if lhs.is_empty() {
          return Err(LoadError::EmptyLhs {
            line: line_no,
          });
        }
        prods.push((line_no, lhs, line[pos + 2..].trim()));
      }
      None => {
        if decls.len() == 2 {
          return Err(LoadError::ExtraDeclaration {
            line: line_no,
          });
        }
        decls.push(split_declaration(line));
      }
    }
  }

  let mut decls = decls.into_iter();
  let nonterms = decls.next().ok_or(LoadError::MissingNonterminals)?;
  let terms = decls.next().ok_or(LoadError::MissingTerminals)?;

  let mut names = nonterms.iter()
    .chain(terms.iter())
    .map(|s| s.as_str())
    .chain(Some(END))
    .collect::<Vec<_>>();
  sort_longest_first(&mut names);
  let bar_is_terminal = terms.iter().any(|t| t == "|");

  let mut rules = vec![];
  for (line_no, lhs, rhs) in prods {
    let alts = if bar_is_terminal {
      vec![rhs]
    } else {
      rhs.split('|').map(|s| s.trim()).collect()
    };
    for alt in alts {
      let symbols = if alt.is_empty() || alt == "&" || alt == EPSILON {
        vec![]
      } else {
        split_symbols(&names, alt).map_err(|text| LoadError::UnknownSymbol {
          line: line_no,
          text,
        })?
      };
      rules.push((lhs.to_owned(), symbols));
    }
  }

  let start = nonterms.first().cloned().ok_or(LoadError::MissingNonterminals)?;
  Ok(Grammar::new(start, nonterms, terms, rules)?)
}

/// Splits a sentence such as `i+i*i#` into terminal names by longest match.
/// Whitespace separates symbols and is otherwise ignored.
pub fn split_sentence(
  grammar: &Grammar,
  sentence: &str,
) -> Result<Vec<String>, SyntaxError> {
  let mut names = grammar.terminals().map(|(_, name)| name).collect::<Vec<_>>();
  sort_longest_first(&mut names);

  let mut result = vec![];
  for chunk in sentence.split_whitespace() {
    let mut rest = chunk;
    while !rest.is_empty() {
      match longest_prefix(&names, rest) {
        Some(name) => {
          result.push(name.to_owned());
          rest = &rest[name.len()..];
        }
        None => {
          return Err(SyntaxError::UnknownSymbol {
            symbol: rest.chars().next().map(String::from).unwrap_or_default(),
            position: result.len(),
          });
        }
      }
    }
  }
  Ok(result)
}

fn split_declaration(line: &str) -> Vec<String> {
  if line.contains(char::is_whitespace) {
    return line.split_whitespace().map(|s| s.to_owned()).collect();
  }

  let mut symbols: Vec<String> = vec![];
  for c in line.chars() {
    match symbols.last_mut() {
      Some(last) if c == '\'' => last.push(c),
      _ => symbols.push(c.to_string()),
    }
  }
  symbols
}

/// On failure returns the part that could not be split.
fn split_symbols(names: &[&str], text: &str) -> Result<Vec<String>, String> {
  let mut symbols = vec![];
  for chunk in text.split_whitespace() {
    let mut rest = chunk;
    while !rest.is_empty() {
      let name = longest_prefix(names, rest).ok_or_else(|| rest.to_owned())?;
      symbols.push(name.to_owned());
      rest = &rest[name.len()..];
    }
  }
  Ok(symbols)
}

fn sort_longest_first(names: &mut [&str]) {
  names.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
}

/// `names` must be sorted longest first.
fn longest_prefix<'a>(names: &[&'a str], text: &str) -> Option<&'a str> {
  names.iter()
    .copied()
    .find(|name| !name.is_empty() && text.starts_with(name))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::GrammarError;
  use pretty_assertions::assert_eq;

  const EXPR: &str = r#"
    EE'TT'F
    +*()i
    E -> TE'
    E' -> +TE' | &
    T -> F T'
    T' -> *FT'
    T' -> ε
    F -> (E) | i
  "#;

  fn productions(g: &Grammar) -> Vec<String> {
    g.productions().map(|(id, _)| g.display(id).to_string()).collect()
  }

  #[test]
  fn declarations() {
    assert_eq!(split_declaration("EE'TT'F"), vec!["E", "E'", "T", "T'", "F"]);
    assert_eq!(split_declaration("expr term"), vec!["expr", "term"]);
    assert_eq!(split_declaration("+*()i"), vec!["+", "*", "(", ")", "i"]);
  }

  #[test]
  fn expression_grammar() {
    let g = parse(EXPR).unwrap();
    assert_eq!(g.nonterm_name(g.start()), "E");
    let terms = g.terminals().map(|(_, name)| name).collect::<Vec<_>>();
    assert_eq!(terms, vec!["+", "*", "(", ")", "i", "#"]);
    assert_eq!(productions(&g), vec![
      "E -> T E'",
      "E' -> + T E'",
      "E' -> ε",
      "T -> F T'",
      "T' -> * F T'",
      "T' -> ε",
      "F -> ( E )",
      "F -> i",
    ]);
  }

  #[test]
  fn multi_char_names() {
    let g = parse(r#"
      // identifiers as terminals
      list items
      id ,
      list -> id items
      items -> , id items | &
    "#).unwrap();
    assert_eq!(productions(&g), vec![
      "list -> id items",
      "items -> , id items",
      "items -> ε",
    ]);
  }

  #[test]
  fn bar_as_terminal() {
    let g = parse(r#"
      S
      a |
      S -> a|a
    "#).unwrap();
    assert_eq!(productions(&g), vec!["S -> a | a"]);
  }

  #[test]
  fn errors() {
    assert_eq!(parse("").unwrap_err(), LoadError::MissingNonterminals);
    assert_eq!(parse("S\n").unwrap_err(), LoadError::MissingTerminals);
    assert_eq!(parse("S\na\nb\n").unwrap_err(), LoadError::ExtraDeclaration {
      line: 3,
    });
    assert_eq!(parse("S\na\n -> a\n").unwrap_err(), LoadError::EmptyLhs {
      line: 3,
    });
    assert_eq!(parse("S\na\n\nS -> ab\n").unwrap_err(),
      LoadError::UnknownSymbol {
        line: 4,
        text: "b".to_owned(),
      });
    assert_eq!(parse("S\na\nX -> a\n").unwrap_err(),
      LoadError::Grammar(GrammarError::UndeclaredSymbol {
        symbol: "X".to_owned(),
        production: "X -> a".to_owned(),
      }));
  }

  #[test]
  fn sentences() {
    let g = parse(EXPR).unwrap();
    assert_eq!(split_sentence(&g, "i+i*i#").unwrap(),
      vec!["i", "+", "i", "*", "i", "#"]);
    assert_eq!(split_sentence(&g, "( i ) ").unwrap(), vec!["(", "i", ")"]);
    assert_eq!(split_sentence(&g, "i-i").unwrap_err(),
      SyntaxError::UnknownSymbol {
        symbol: "-".to_owned(),
        position: 1,
      });
  }
}
