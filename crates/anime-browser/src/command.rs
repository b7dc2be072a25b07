//! Terminal input parsing.
//!
//! Lines starting with `:` are commands; anything else is search box text.
//! Blank lines do nothing, so a stray Enter never clears the results.

use thiserror::Error;

/// Shown once at startup
pub const HELP_HINT: &str = "Type a title to search, :help for commands";

/// Help text listing every command
pub const HELP: &str = "\
Type to search. Commands:
  :page N    jump to page N of the current results
  :next      next page
  :prev      previous page
  :open ID   show details for an anime
  :back      return to the search results
  :fav ID    toggle an anime as favorite
  :favs      list favorites
  :clear     clear the search
  :help      show this help
  :quit      exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Raw search box contents
    Search(String),
    Page(u32),
    NextPage,
    PrevPage,
    Open(u32),
    Back,
    Favorite(u32),
    Favorites,
    Clear,
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: :{0} (try :help)")]
    UnknownCommand(String),

    #[error(":{command} expects a number, got '{value}'")]
    InvalidNumber { command: String, value: String },

    #[error(":{0} needs an argument")]
    MissingArgument(String),
}

impl Command {
    /// Parse one input line; `None` for a blank line
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return Ok(None);
        }
        let Some(rest) = line.trim_start().strip_prefix(':') else {
            return Ok(Some(Command::Search(line.to_string())));
        };

        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or_default().to_lowercase();
        let arg = parts.next();

        let command = match name.as_str() {
            "page" | "p" => number(&name, arg).map(Command::Page),
            "next" | "n" => Ok(Command::NextPage),
            "prev" => Ok(Command::PrevPage),
            "open" | "o" => number(&name, arg).map(Command::Open),
            "back" | "b" => Ok(Command::Back),
            "fav" | "f" => number(&name, arg).map(Command::Favorite),
            "favs" => Ok(Command::Favorites),
            "clear" => Ok(Command::Clear),
            "help" | "h" | "?" => Ok(Command::Help),
            "quit" | "q" | "exit" => Ok(Command::Quit),
            _ => Err(CommandError::UnknownCommand(name)),
        };
        command.map(Some)
    }
}

fn number(command: &str, arg: Option<&str>) -> Result<u32, CommandError> {
    let value = arg.ok_or_else(|| CommandError::MissingArgument(command.to_string()))?;
    value.parse().map_err(|_| CommandError::InvalidNumber {
        command: command.to_string(),
        value: value.to_string(),
    })
}
