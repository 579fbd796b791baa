use rustyline::{error::ReadlineError, Editor};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error<E> {
    #[error(transparent)]
    Readline(ReadlineError),
    #[error("Command failed: {0:?}")]
    Command(E),
}

/// One interactive session. A line ending with `\` continues on the next one.
pub trait Repl {
    type Error: std::fmt::Debug;
    const PROMPT: &'static str = ">> ";
    const HISTORY: Option<&'static str> = None;
    /// Handles one complete (possibly multi-line) input. Returning `Err`
    /// terminates the session.
    fn handle(&mut self, input: &str) -> Result<(), Self::Error>;
}

fn join_continuation(pending: &mut Option<String>, mut line: String) -> Option<String> {
    if line.ends_with('\\') {
        line.pop();
        line.push('\n');
        pending.get_or_insert_with(String::new).push_str(&line);
        return None;
    }
    Some(match pending.take() {
        Some(mut input) => {
            input.push_str(&line);
            input
        }
        None => line,
    })
}

pub fn start_repl<R: Repl>(mut repl: R) -> Result<(), Error<R::Error>> {
    let mut editor = Editor::<()>::new();
    if let Some(history) = R::HISTORY {
        editor.load_history(history).ok();
    }
    let mut pending: Option<String> = None;
    loop {
        match editor.readline(R::PROMPT) {
            Ok(line) => {
                let Some(input) = join_continuation(&mut pending, line) else {
                    continue;
                };
                if input.trim().is_empty() {
                    continue;
                }
                editor.add_history_entry(input.as_str());
                repl.handle(input.trim()).map_err(Error::Command)?;
                if let Some(history) = R::HISTORY {
                    editor.save_history(history).map_err(Error::Readline)?;
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                println!("Bye!");
                break Ok(());
            }
            Err(e) => break Err(Error::Readline(e)),
        }
    }
}
