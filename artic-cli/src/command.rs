//! Line commands typed at the table prompt.

use std::str::FromStr;

use artic_lib::BulkSelectRequest;
use artic_lib::error::ValidationError;
use artic_lib::model::RecordId;

/// A parsed prompt command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    Goto(u32),
    /// Check or uncheck a row. `state` of `None` flips it.
    Toggle {
        id: RecordId,
        state: Option<bool>,
    },
    Select(BulkSelectRequest),
    Cancel,
    List,
    Clear,
    Refresh,
    Help,
    Quit,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}', type 'h' for help")]
    Unknown(String),

    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),

    #[error("invalid argument for '{command}': {value}")]
    InvalidArgument { command: &'static str, value: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub const HELP: &str = "\
commands:
  n, next            next page
  p, prev            previous page
  g, goto N          go to page N
  t, toggle ID [on|off]
                     check or uncheck a row
  s, select N        select N rows from the first row of this page
  c, cancel          stop a running select
  l, list            print the selected ids
  clear              deselect everything
  r, refresh         refetch this page
  h, help            show this help
  q, quit            exit";

impl Command {
    /// Parses one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };
        let arg = words.next();

        let command = match name.to_ascii_lowercase().as_str() {
            "n" | "next" => Command::Next,
            "p" | "prev" | "previous" => Command::Previous,
            "g" | "goto" => Command::Goto(number("goto", arg)?),
            "t" | "toggle" => {
                let id = number("toggle", arg)?;
                let state = match words.next() {
                    None => None,
                    Some("on") => Some(true),
                    Some("off") => Some(false),
                    Some(other) => {
                        return Err(CommandError::InvalidArgument {
                            command: "toggle",
                            value: other.to_string(),
                        });
                    }
                };
                Command::Toggle { id, state }
            }
            "s" | "select" => {
                let count = arg.ok_or(CommandError::MissingArgument("select"))?;
                Command::Select(count.parse()?)
            }
            "c" | "cancel" => Command::Cancel,
            "l" | "list" => Command::List,
            "clear" => Command::Clear,
            "r" | "refresh" => Command::Refresh,
            "h" | "help" | "?" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        Ok(Some(command))
    }
}

fn number<T: FromStr>(command: &'static str, arg: Option<&str>) -> Result<T, CommandError> {
    let value = arg.ok_or(CommandError::MissingArgument(command))?;
    value.parse().map_err(|_| CommandError::InvalidArgument {
        command,
        value: value.to_string(),
    })
}
