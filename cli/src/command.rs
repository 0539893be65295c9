//! Parsing of the REPL's input lines.

use std::str::FromStr;

use todo_core::Filter;

pub const HELP: &str = "\
commands:
  ls                      show the list
  add <text>              add a todo
  toggle <n>              mark todo n done / not done
  edit <n> [text]         edit todo n; with text, save right away
  text <text>             replace the text being edited
  save | cancel           finish or abandon the edit
  rm <n>                  delete todo n
  clear                   delete every completed todo
  filter all|active|completed
  refresh                 reload from the service
  help | quit";

/// One REPL command. Positions are 1-based into the visible list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Add(String),
    Toggle(usize),
    Edit { position: usize, text: Option<String> },
    Text(String),
    Save,
    Cancel,
    Remove(usize),
    ClearCompleted,
    Filter(Filter),
    Refresh,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command {0:?}, try `help`")]
    Unknown(String),

    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    #[error("{0:?} is not a todo number")]
    BadPosition(String),

    #[error(transparent)]
    Filter(#[from] todo_core::UnknownFilter),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word {
            "" | "ls" | "list" => Command::List,
            "add" => Command::Add(required("add", rest)?.to_string()),
            "toggle" | "t" => Command::Toggle(position(required("toggle", rest)?)?),
            "edit" | "e" => {
                let rest = required("edit", rest)?;
                let (n, text) = match rest.split_once(char::is_whitespace) {
                    Some((n, text)) => (n, Some(text.trim().to_string())),
                    None => (rest, None),
                };
                Command::Edit {
                    position: position(n)?,
                    text,
                }
            }
            "text" => Command::Text(required("text", rest)?.to_string()),
            "save" => Command::Save,
            "cancel" => Command::Cancel,
            "rm" | "delete" => Command::Remove(position(required("rm", rest)?)?),
            "clear" => Command::ClearCompleted,
            "filter" | "f" => Command::Filter(required("filter", rest)?.parse()?),
            "refresh" => Command::Refresh,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

fn required<'a>(command: &'static str, rest: &'a str) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument(command))
    } else {
        Ok(rest)
    }
}

fn position(raw: &str) -> Result<usize, CommandError> {
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CommandError::BadPosition(raw.to_string())),
    }
}
