use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser as ClapParser, Subcommand};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use yuce::{bnf, report, Parser, ParserOptions};

#[derive(Debug, ClapParser)]
#[command(name = "yuce", version, about = "LL(1) predictive parser workbench.")]
struct Args {
  #[command(subcommand)]
  command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
  /// Load a grammar, describe it and build its predictive table.
  Check {
    grammar: PathBuf,
  },
  /// Print the First and Follow sets.
  Sets {
    grammar: PathBuf,
  },
  /// Print the predictive table.
  Table {
    grammar: PathBuf,
    /// Print every cell as a grid, `err` where the cell is empty.
    #[arg(long)]
    grid: bool,
  },
  /// Parse a sentence and print the derivation.
  Parse {
    grammar: PathBuf,
    /// Terminals, with or without separating whitespace, e.g. `i+i*i#`.
    sentence: String,
    /// Give up after this many automaton steps.
    #[arg(long)]
    max_steps: Option<usize>,
  },
}

fn main() {
  let args = Args::parse();

  match args.command {
    Command::Check { grammar } => {
      let parser = load_or_exit(&grammar, ParserOptions::default());
      print!("{}", report::grammar(parser.grammar()));
      println!();
      print_status(Color::Green, "ok", &format!(
        "{} nonterminals, {} terminals, {} productions",
        parser.grammar().num_nonterms(),
        parser.grammar().num_terms(),
        parser.grammar().num_prods()));
    }
    Command::Sets { grammar } => {
      let parser = load_or_exit(&grammar, ParserOptions::default());
      print!("{}", report::first_sets(parser.grammar(), parser.first_sets()));
      println!();
      print!("{}", report::follow_sets(parser.grammar(), parser.follow_sets()));
    }
    Command::Table { grammar, grid } => {
      let parser = load_or_exit(&grammar, ParserOptions::default());
      if grid {
        print!("{}", report::grid(parser.grammar(), parser.table()));
      } else {
        print!("{}", report::table(parser.grammar(), parser.table()));
      }
    }
    Command::Parse { grammar, sentence, max_steps } => {
      let mut options = ParserOptions::default();
      if let Some(max_steps) = max_steps {
        options = options.max_steps(max_steps);
      }
      let parser = load_or_exit(&grammar, options);
      let derivation = parser.parse_str(&sentence);
      print!("{}", report::steps(parser.grammar(), &derivation));
      match derivation.error() {
        None => print_status(Color::Green, "accepted", &sentence),
        Some(error) => {
          print_status(Color::Red, "rejected", &error.to_string());
          process::exit(1);
        }
      }
    }
  }
}

fn load_or_exit(path: &Path, options: ParserOptions) -> Parser {
  let text = fs::read_to_string(path).unwrap_or_else(|e| {
    print_error(&format!("cannot read {}: {}", path.display(), e));
    process::exit(2);
  });
  let grammar = bnf::parse(&text).unwrap_or_else(|e| {
    print_error(&format!("{}: {}", path.display(), e));
    process::exit(2);
  });
  Parser::with_options(grammar, options).unwrap_or_else(|e| {
    print_error(&format!("{}: grammar is not LL(1)", path.display()));
    for conflict in &e.conflicts {
      eprintln!("  {}", conflict);
    }
    process::exit(2);
  })
}

fn print_error(message: &str) {
  let mut stderr = StandardStream::stderr(ColorChoice::Auto);
  let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
  let _ = write!(stderr, "error");
  let _ = stderr.reset();
  let _ = writeln!(stderr, ": {}", message);
}

fn print_status(color: Color, status: &str, message: &str) {
  let mut stdout = StandardStream::stdout(ColorChoice::Auto);
  let _ = stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
  let _ = write!(stdout, "{}", status);
  let _ = stdout.reset();
  let _ = writeln!(stdout, ": {}", message);
}
