use anyhow::Result;
use clap::Parser;
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use util::repl;

use reducer::{
    catalog,
    eval::{self, EvalError, Strategy, UnknownStrategy},
    TermRef,
};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Normal-order reducer for the untyped lambda calculus",
    long_about = None
)]
struct Cli {
    /// Catalog term to reduce step by step. Starts the REPL when omitted.
    name: Option<String>,
    /// `normal` reduces under binders, `weak` never does.
    #[arg(short, long, default_value_t = Strategy::Normal)]
    strategy: Strategy,
    /// Give up after this many reduction steps.
    #[arg(short, long, default_value_t = 1000)]
    max_steps: usize,
}

#[derive(Clone, Copy, Debug)]
struct Config {
    strategy: Strategy,
    max_steps: usize,
}

#[derive(Debug, Error)]
enum CommandError {
    #[error("Unknown term `{0}`, `list` shows the available ones")]
    UnknownTerm(String),
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),
    #[error("Invalid step limit `{0}`")]
    InvalidLimit(String),
    #[error(transparent)]
    Strategy(#[from] UnknownStrategy),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

fn lookup(name: &str) -> Result<TermRef, CommandError> {
    catalog::lookup(name)
        .map(catalog::Entry::term)
        .ok_or_else(|| CommandError::UnknownTerm(name.to_string()))
}

/// Prints every term of the reduction sequence and returns the number of
/// steps taken.
fn print_trace(term: TermRef, config: Config) -> Result<usize, EvalError> {
    let mut steps = 0;
    let mut last = term.clone();
    for (step, term) in eval::trace(term, config.strategy).enumerate() {
        if step > config.max_steps {
            tracing::warn!(steps = config.max_steps, "step limit exceeded");
            return Err(EvalError::DivergenceDetected {
                steps: config.max_steps,
                last: last.to_string(),
            });
        }
        println!("{step:>4}: {term}");
        steps = step;
        last = term;
    }
    Ok(steps)
}

struct Repl {
    config: Config,
    current: Option<TermRef>,
}

impl Repl {
    fn list() {
        for entry in catalog::entries() {
            println!("{:<14} {}", entry.name, entry.description);
        }
    }

    fn show(name: &str) -> Result<(), CommandError> {
        println!("{}", lookup(name)?);
        Ok(())
    }

    /// Steps the named term, or the term left by the previous step when no
    /// name is given.
    fn step(&mut self, name: &str) -> Result<(), CommandError> {
        let term = if name.is_empty() {
            self.current
                .clone()
                .ok_or(CommandError::MissingArgument("term name"))?
        } else {
            lookup(name)?
        };
        let strategy = self.config.strategy;
        if eval::is_normal_form(&term, strategy) {
            println!("{term} is in normal form");
            self.current = Some(term);
        } else {
            let next = eval::reduce_once(&term, strategy);
            println!("{next}");
            self.current = Some(next);
        }
        Ok(())
    }

    fn evaluate(&self, name: &str) -> Result<(), CommandError> {
        let term = lookup(name)?;
        print_trace(term, self.config)?;
        Ok(())
    }

    fn strategy(&mut self, arg: &str) -> Result<(), CommandError> {
        if !arg.is_empty() {
            self.config.strategy = arg.parse()?;
        }
        println!("strategy: {}", self.config.strategy);
        Ok(())
    }

    fn limit(&mut self, arg: &str) -> Result<(), CommandError> {
        if !arg.is_empty() {
            self.config.max_steps = arg
                .parse()
                .map_err(|_| CommandError::InvalidLimit(arg.to_string()))?;
        }
        println!("max steps: {}", self.config.max_steps);
        Ok(())
    }

    fn show_help() {
        println!(
            "{}",
            r#"
list                    -- list the catalog of terms
show        NAME        -- print a term
reduce      [NAME]      -- perform a single reduction step on NAME, or continue
                           from the term left by the previous step
eval        NAME        -- reduce step by step until a normal form is reached
strategy    [normal|weak]
                        -- show or change the reduction strategy
limit       [N]         -- show or change the step limit
help                    -- show this message
        "#
            .trim()
        );
    }

    fn handle_command(&mut self, input: &str) -> Result<(), CommandError> {
        let (cmd, arg) = input.split_once(char::is_whitespace).unwrap_or((input, ""));
        let arg = arg.trim();
        let required = |what| {
            if arg.is_empty() {
                Err(CommandError::MissingArgument(what))
            } else {
                Ok(arg)
            }
        };
        match cmd {
            "l" | "ls" | "list" => Self::list(),
            "s" | "show" => Self::show(required("term name")?)?,
            "r" | "reduce" | "step" => self.step(arg)?,
            "e" | "eval" | "evaluate" => self.evaluate(required("term name")?)?,
            "strategy" => self.strategy(arg)?,
            "limit" => self.limit(arg)?,
            "h" | "help" => Self::show_help(),
            _ => {
                eprintln!("Unknown command {cmd}");
                Self::show_help();
            }
        }
        Ok(())
    }
}

impl repl::Repl for Repl {
    type Error = anyhow::Error;
    const HISTORY: Option<&'static str> = Some("/tmp/reducer.history");
    fn handle(&mut self, input: &str) -> Result<(), Self::Error> {
        if let Err(e) = self.handle_command(input) {
            eprintln!("Error: {e}");
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config {
        strategy: cli.strategy,
        max_steps: cli.max_steps,
    };
    if let Some(name) = cli.name {
        let term = lookup(&name)?;
        let steps = print_trace(term, config)?;
        println!("normal form reached after {steps} steps");
        return Ok(());
    }
    println!("Hi, this is an untyped lambda calculus reducer. `help` to show help");
    println!();
    repl::start_repl(Repl {
        config,
        current: None,
    })?;
    Ok(())
}
