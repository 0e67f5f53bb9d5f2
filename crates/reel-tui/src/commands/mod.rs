//! `:` commands.
//!
//! | Command | Action |
//! |---------|--------|
//! | `q`, `quit` | Quit |
//! | `help` | Toggle the help popup |
//! | `theme <name>` | Switch theme (`default`, `gruvbox`) |
//! | `search <text>` | Put `text` in the query bar and run a search |
//! | `hint <text>` | Put `text` in the query bar and fetch hints |
//! | `clear` | Empty the query bar and the results |

use crate::app::{Action, AppState};
use crate::theme::Theme;
use reel_core::Endpoint;

/// A parsed, validated command ready to be executed by the app shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Help,
    Theme(String),
    Search(String),
    Hint(String),
    Clear,
}

impl Command {
    /// Parse a raw command string (the text after the `:` prefix).
    ///
    /// An empty string returns `Err("")` as a sentinel meaning "close
    /// without acting".
    pub fn parse(input: &str) -> Result<Command, String> {
        let input = input.trim();
        if input.is_empty() {
            return Err(String::new());
        }

        let (word, rest) = input
            .split_once(char::is_whitespace)
            .map(|(w, r)| (w, r.trim()))
            .unwrap_or((input, ""));

        match word {
            "q" | "quit" => Ok(Command::Quit),
            "help" => Ok(Command::Help),
            "clear" => Ok(Command::Clear),
            "theme" if rest.is_empty() => Err("usage: theme <default|gruvbox>".to_string()),
            "theme" => Ok(Command::Theme(rest.to_string())),
            // The query text is passed through untouched, empty included.
            "search" | "s" => Ok(Command::Search(rest.to_string())),
            "hint" => Ok(Command::Hint(rest.to_string())),
            other => Err(format!("unknown command: {other}")),
        }
    }
}

/// Execute a parsed [`Command`] against the application state.
pub fn execute_command(s: &mut AppState, cmd: Command) -> Option<Action> {
    match cmd {
        Command::Quit => {
            s.quit = true;
            None
        }
        Command::Help => {
            s.show_help = !s.show_help;
            None
        }
        Command::Theme(name) => {
            s.theme = Theme::by_name(&name);
            None
        }
        Command::Search(text) => {
            s.query.set(&text);
            Some(Action::Dispatch {
                endpoint: Endpoint::Search,
                text,
            })
        }
        Command::Hint(text) => {
            s.query.set(&text);
            Some(Action::Dispatch {
                endpoint: Endpoint::Hint,
                text,
            })
        }
        Command::Clear => {
            s.query.clear();
            s.results.clear();
            s.status.clear();
            None
        }
    }
}
