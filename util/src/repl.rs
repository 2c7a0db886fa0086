use rustyline::{error::ReadlineError, Editor};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error<E> {
    #[error(transparent)]
    Readline(ReadlineError),
    #[error("Eval failed: {0:?}")]
    EvalError(E),
}

pub trait Repl {
    type Error: std::fmt::Debug;
    const PROMPT: &'static str = ">> ";
    const CONTINUATION: &'static str = ".. ";
    const HISTORY: Option<&'static str> = None;
    fn evaluate(&mut self, input: String) -> Result<(), Self::Error>;
}

/// Reads one logical input. Lines ending with `\` continue on the next line.
/// Returns `None` on Ctrl-C / Ctrl-D.
fn read_input<R: Repl>(editor: &mut Editor<()>) -> Result<Option<String>, ReadlineError> {
    let mut input = String::new();
    let mut prompt = R::PROMPT;
    loop {
        match editor.readline(prompt) {
            Ok(line) => match line.strip_suffix('\\') {
                Some(line) => {
                    input.push_str(line);
                    input.push('\n');
                    prompt = R::CONTINUATION;
                }
                None => {
                    input.push_str(&line);
                    break Ok(Some(input));
                }
            },
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break Ok(None),
            Err(e) => break Err(e),
        }
    }
}

pub fn start_repl<R: Repl>(mut repl: R) -> Result<(), Error<R::Error>> {
    let mut editor = Editor::<()>::new();
    if let Some(history) = R::HISTORY {
        editor.load_history(history).ok();
    }
    while let Some(input) = read_input::<R>(&mut editor).map_err(Error::Readline)? {
        editor.add_history_entry(input.as_str());
        repl.evaluate(input).map_err(Error::EvalError)?;
    }
    if let Some(history) = R::HISTORY {
        editor.save_history(history).map_err(Error::Readline)?;
    }
    println!("Bye!");
    Ok(())
}
