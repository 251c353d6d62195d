//! Commands typed at the prompt.

use client_core::{FormField, PageKind};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    Navigate(PageKind),
    Set { field: FormField, value: String },
    Submit,
    Refresh,
    Logout,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}'; type `help` for the list")]
    Unknown(String),
    #[error("usage: set <login|password|text|title> <value>")]
    SetUsage,
    #[error("unknown field '{0}'; expected login, password, text or title")]
    UnknownField(String),
}

impl UiCommand {
    /// Parses one input line. Returns `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim_start()),
            None => (line, ""),
        };

        let cmd = match word {
            "" => return Ok(None),
            "articles" => Self::Navigate(PageKind::Articles),
            "login" => Self::Navigate(PageKind::Login),
            "register" => Self::Navigate(PageKind::Register),
            "new" => Self::Navigate(PageKind::CreateArticle),
            "set" => {
                let (name, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                if name.is_empty() {
                    return Err(CommandError::SetUsage);
                }
                let field = name
                    .parse::<FormField>()
                    .map_err(|_| CommandError::UnknownField(name.to_string()))?;
                Self::Set {
                    field,
                    value: value.trim_start().to_string(),
                }
            }
            "submit" => Self::Submit,
            "refresh" => Self::Refresh,
            "logout" => Self::Logout,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(cmd))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Navigate(_) => "navigate",
            Self::Set { .. } => "set",
            Self::Submit => "submit",
            Self::Refresh => "refresh",
            Self::Logout => "logout",
            Self::Help => "help",
            Self::Quit => "quit",
        }
    }
}

pub const HELP: &str = "\
commands:
  articles | login | register | new   switch page (new needs a login)
  set <field> <value>                 fill a form field (login, password, text, title)
  submit                              send the current form
  refresh                             reload the article list
  logout                              sign out
  help                                this text
  quit                                leave";
