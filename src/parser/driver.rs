use crate::error::SyntaxError;
use crate::grammar::*;
use super::table::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
  /// Replace the nonterminal on top with the production's right-hand side.
  Expand(ProdId),
  /// Pop the terminal on top and consume it from the input.
  Match(TermId),
  Accept,
  Error,
}

/// The automaton's configuration before `action` was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
  /// bottom to top
  pub stack: Vec<Symbol>,
  /// remaining input, ends with `#`
  pub input: Vec<TermId>,
  pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
  Accept,
  Reject(SyntaxError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Derivation {
  pub steps: Vec<Step>,
  pub verdict: Verdict,
}

impl Derivation {
  pub(crate) fn reject(steps: Vec<Step>, error: SyntaxError) -> Self {
    Derivation {
      steps,
      verdict: Verdict::Reject(error),
    }
  }

  pub fn is_accepted(&self) -> bool {
    self.verdict == Verdict::Accept
  }

  pub fn error(&self) -> Option<&SyntaxError> {
    match &self.verdict {
      Verdict::Accept => None,
      Verdict::Reject(error) => Some(error),
    }
  }

  /// Productions applied, in order: the leftmost derivation.
  pub fn productions(&self) -> impl Iterator<Item = ProdId> + '_ {
    self.steps.iter().filter_map(|step| match step.action {
      Action::Expand(prod) => Some(prod),
      _ => None,
    })
  }
}

/// Runs the predictive automaton over `input`, which must end with the end
/// marker and contain it nowhere else.
pub(super) fn derive(
  grammar: &Grammar,
  table: &Table,
  input: &[TermId],
  max_steps: usize,
) -> Derivation {
  let end = grammar.end();
  let mut stack = vec![Symbol::Term(end), Symbol::Nonterm(grammar.start())];
  let mut cursor = 0;
  let mut steps = vec![];

  loop {
    if steps.len() >= max_steps {
      return Derivation::reject(steps, SyntaxError::StepLimit(max_steps));
    }

    // `#` stays at the bottom until accepted, and the cursor never moves
    // past the final `#`
    let top = stack[stack.len() - 1];
    let cur = input[cursor];
    let mut step = Step {
      stack: stack.clone(),
      input: input[cursor..].to_vec(),
      action: Action::Error,
    };

    match top {
      Symbol::Term(term) if term == end && cur == end => {
        step.action = Action::Accept;
        steps.push(step);
        return Derivation {
          steps,
          verdict: Verdict::Accept,
        };
      }
      Symbol::Term(term) if term == cur => {
        step.action = Action::Match(term);
        steps.push(step);
        stack.pop();
        cursor += 1;
      }
      Symbol::Term(term) => {
        steps.push(step);
        return Derivation::reject(steps, SyntaxError::Mismatch {
          expected: grammar.term_name(term).to_owned(),
          found: grammar.term_name(cur).to_owned(),
          position: cursor,
        });
      }
      Symbol::Nonterm(nonterm) => match table.get(nonterm, cur) {
        Some(prod) => {
          step.action = Action::Expand(prod);
          steps.push(step);
          stack.pop();
          stack.extend(grammar.production(prod).symbols.iter().rev());
        }
        None => {
          steps.push(step);
          return Derivation::reject(steps, SyntaxError::NoEntry {
            nonterm: grammar.nonterm_name(nonterm).to_owned(),
            term: grammar.term_name(cur).to_owned(),
            position: cursor,
          });
        }
      },
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::parser::sets::{FirstSets, FollowSets};
  use pretty_assertions::assert_eq;

  fn setup(text: &str) -> (Grammar, Table) {
    let g: Grammar = text.parse().unwrap();
    let first = FirstSets::compute(&g);
    let follow = FollowSets::compute(&g, &first);
    let table = Table::build(&g, &first, &follow).unwrap();
    (g, table)
  }

  fn parens() -> (Grammar, Table) {
    setup(r#"
      S
      ( )
      S -> ( S ) S
      S -> &
    "#)
  }

  fn terms(g: &Grammar, input: &str) -> Vec<TermId> {
    input.chars()
      .map(|c| g.term_id(&c.to_string()).unwrap())
      .collect()
  }

  fn actions(g: &Grammar, d: &Derivation) -> Vec<String> {
    d.steps.iter()
      .map(|step| match step.action {
        Action::Expand(prod) => g.display(prod).to_string(),
        Action::Match(term) => format!("match {}", g.term_name(term)),
        Action::Accept => "accept".to_owned(),
        Action::Error => "error".to_owned(),
      })
      .collect()
  }

  #[test]
  fn accepts_balanced() {
    let (g, table) = parens();
    let d = derive(&g, &table, &terms(&g, "()#"), 100);
    assert!(d.is_accepted());
    assert_eq!(actions(&g, &d), vec![
      "S -> ( S ) S",
      "match (",
      "S -> ε",
      "match )",
      "S -> ε",
      "accept",
    ]);
  }

  #[test]
  fn steps_record_state_before_transition() {
    let (g, table) = parens();
    let d = derive(&g, &table, &terms(&g, "()#"), 100);
    let s = Symbol::Nonterm(g.start());
    let open = Symbol::Term(g.term_id("(").unwrap());
    let close = Symbol::Term(g.term_id(")").unwrap());
    let end = Symbol::Term(g.end());

    assert_eq!(d.steps[0].stack, vec![end, s]);
    assert_eq!(d.steps[0].input, terms(&g, "()#"));
    assert_eq!(d.steps[1].stack, vec![end, s, close, s, open]);
    assert_eq!(d.steps[1].input, terms(&g, "()#"));
    assert_eq!(d.steps[2].input, terms(&g, ")#"));
    assert_eq!(d.steps[5].stack, vec![end]);
    assert_eq!(d.steps[5].input, terms(&g, "#"));
  }

  #[test]
  fn rejects_on_mismatch() {
    let (g, table) = parens();
    let d = derive(&g, &table, &terms(&g, "(#"), 100);
    assert_eq!(d.error(), Some(&SyntaxError::Mismatch {
      expected: ")".to_owned(),
      found: "#".to_owned(),
      position: 1,
    }));
    assert_eq!(actions(&g, &d).last().map(|s| s.as_str()), Some("error"));
  }

  #[test]
  fn rejects_on_empty_cell() {
    let (g, table) = setup(r#"
      S
      a
      S -> a
    "#);
    let d = derive(&g, &table, &terms(&g, "#"), 100);
    assert_eq!(d.error(), Some(&SyntaxError::NoEntry {
      nonterm: "S".to_owned(),
      term: "#".to_owned(),
      position: 0,
    }));
    assert_eq!(d.steps.len(), 1);
    assert_eq!(d.steps[0].action, Action::Error);
  }

  #[test]
  fn trailing_input_is_a_mismatch_on_end() {
    let (g, table) = setup(r#"
      S
      a
      S -> a
    "#);
    let d = derive(&g, &table, &terms(&g, "aa#"), 100);
    assert_eq!(d.error(), Some(&SyntaxError::Mismatch {
      expected: "#".to_owned(),
      found: "a".to_owned(),
      position: 1,
    }));
  }

  #[test]
  fn empty_sentence() {
    let (g, table) = parens();
    let d = derive(&g, &table, &terms(&g, "#"), 100);
    assert!(d.is_accepted());
    assert_eq!(actions(&g, &d), vec!["S -> ε", "accept"]);
  }

  #[test]
  fn step_limit() {
    let (g, table) = parens();
    let d = derive(&g, &table, &terms(&g, "(())#"), 3);
    assert_eq!(d.error(), Some(&SyntaxError::StepLimit(3)));
    assert_eq!(d.steps.len(), 3);
  }
}
