//! Line commands accepted by the terminal front end.

use crate::drag::DragEnd;
use crate::types::{Filter, ParseChoiceError, TodoAction, TodoId};
use std::str::FromStr;
use thiserror::Error;

/// Usage text printed by `help`
pub const USAGE: &str = "\
commands:
  add <text>          add an item (alias: a)
  toggle <id>         complete or reopen an item (alias: t)
  delete <id>         remove an item (alias: rm)
  clear               remove completed items
  move <id> [<id>]    drag an item onto another (alias: mv)
  filter <name>       show all, active or completed items
  all | active | completed
  theme               switch between light and dark
  list                show the list again (alias: ls)
  help                show this text
  quit                leave (alias: exit)";

/// Errors raised while parsing a command line
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCommandError {
    /// Blank line
    #[error("empty command")]
    Empty,

    /// First word is not a known command
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),

    /// Command is missing an argument
    #[error("`{command}` needs {what}")]
    MissingArgument {
        /// Command name
        command: &'static str,
        /// Description of the missing argument
        what: &'static str,
    },

    /// Command got more arguments than it takes
    #[error("`{0}` takes no further arguments")]
    UnexpectedArgument(&'static str),

    /// Argument is not a valid todo id
    #[error("`{0}` is not a todo id")]
    InvalidId(String),

    /// Argument is not a valid filter
    #[error(transparent)]
    InvalidFilter(#[from] ParseChoiceError),
}

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Send an action to the store
    Dispatch(TodoAction),
    /// Drag gesture, translated against the visible ids before dispatch
    Drag(DragEnd),
    /// Print the list again
    List,
    /// Print usage
    Help,
    /// Shut down and exit
    Quit,
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(word, rest)| (word, rest.trim()));

        let command = match word.to_ascii_lowercase().as_str() {
            "" => return Err(ParseCommandError::Empty),
            "add" | "a" => {
                if rest.is_empty() {
                    return Err(ParseCommandError::MissingArgument {
                        command: "add",
                        what: "some text",
                    });
                }
                Self::Dispatch(TodoAction::AddTodo {
                    text: rest.to_string(),
                })
            }
            "toggle" | "t" => Self::Dispatch(TodoAction::ToggleTodo {
                id: single_id("toggle", rest)?,
            }),
            "delete" | "rm" => Self::Dispatch(TodoAction::DeleteTodo {
                id: single_id("delete", rest)?,
            }),
            "move" | "mv" => {
                let mut args = rest.split_whitespace();
                let active = args.next().ok_or(ParseCommandError::MissingArgument {
                    command: "move",
                    what: "the id of the item to drag",
                })?;
                let over = args.next().map(parse_id).transpose()?;
                if args.next().is_some() {
                    return Err(ParseCommandError::UnexpectedArgument("move"));
                }
                Self::Drag(DragEnd::new(parse_id(active)?, over))
            }
            "filter" => {
                if rest.is_empty() {
                    return Err(ParseCommandError::MissingArgument {
                        command: "filter",
                        what: "one of all, active, completed",
                    });
                }
                Self::Dispatch(TodoAction::SetFilter {
                    filter: rest.parse()?,
                })
            }
            "all" => no_args("all", rest, set_filter(Filter::All))?,
            "active" => no_args("active", rest, set_filter(Filter::Active))?,
            "completed" => no_args("completed", rest, set_filter(Filter::Completed))?,
            "clear" => no_args("clear", rest, Self::Dispatch(TodoAction::ClearCompleted))?,
            "theme" => no_args("theme", rest, Self::Dispatch(TodoAction::ToggleTheme))?,
            "list" | "ls" => no_args("list", rest, Self::List)?,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            _ => return Err(ParseCommandError::Unknown(word.to_string())),
        };

        Ok(command)
    }
}

const fn set_filter(filter: Filter) -> Command {
    Command::Dispatch(TodoAction::SetFilter { filter })
}

fn no_args(command: &'static str, rest: &str, parsed: Command) -> Result<Command, ParseCommandError> {
    if rest.is_empty() {
        Ok(parsed)
    } else {
        Err(ParseCommandError::UnexpectedArgument(command))
    }
}

fn parse_id(raw: &str) -> Result<TodoId, ParseCommandError> {
    raw.parse()
        .map_err(|_| ParseCommandError::InvalidId(raw.to_string()))
}

fn single_id(command: &'static str, rest: &str) -> Result<TodoId, ParseCommandError> {
    let mut args = rest.split_whitespace();
    let id = args.next().ok_or(ParseCommandError::MissingArgument {
        command,
        what: "a todo id",
    })?;
    if args.next().is_some() {
        return Err(ParseCommandError::UnexpectedArgument(command));
    }
    parse_id(id)
}
