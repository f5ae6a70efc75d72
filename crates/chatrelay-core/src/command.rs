//! Parsing of built-in and admin commands embedded in chat text.

use thiserror::Error;

/// Reply sent for any admin command that fails to parse.
pub const ADMIN_FORMAT_ERROR: &str = "admin command format error";

/// Errors returned while parsing admin commands.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    /// A required argument is missing.
    #[error("missing argument for `{0}`")]
    MissingArgument(&'static str),
    /// The command or sub-command is not recognized.
    #[error("unknown admin command: {0}")]
    Unknown(String),
}

/// What an inbound text asks the bot to do.
#[derive(Debug, PartialEq, Eq)]
pub enum Command<'a> {
    /// `ping`
    Ping,
    /// `context`: show the sender's stored history.
    ShowContext,
    /// `reload`: re-read the config file.
    Reload,
    /// `admin ...`
    Admin(Result<AdminCommand, CommandError>),
    /// Anything else is forwarded to the completion API.
    Chat(&'a str),
}

impl<'a> Command<'a> {
    pub fn parse(text: &'a str) -> Self {
        match text {
            "ping" => Command::Ping,
            "context" => Command::ShowContext,
            "reload" => Command::Reload,
            _ if split_head(text).0 == "admin" => Command::Admin(AdminCommand::parse(text)),
            _ => Command::Chat(text),
        }
    }
}

/// Administrative command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCommand {
    GroupAdd(String),
    GroupRemove(String),
    GroupList,
    PromptSet(String),
    PromptGet,
    /// Clear one participant; `None` means the sender's own key.
    ContextClear(Option<String>),
    ContextClearAll,
}

impl AdminCommand {
    /// Parse `admin <command> <sub-command> [value...]`.
    ///
    /// The value is the remainder of the line, so it may contain spaces.
    pub fn parse(text: &str) -> Result<Self, CommandError> {
        let (head, rest) = split_head(text);
        if head != "admin" {
            return Err(CommandError::Unknown(head.to_string()));
        }
        let (command, rest) = split_head(rest);
        let (sub_command, value) = split_head(rest);
        let value = value.trim_end();

        match (command, sub_command) {
            ("group", "add") => Ok(AdminCommand::GroupAdd(required(value, "group add")?)),
            ("group", "remove") => Ok(AdminCommand::GroupRemove(required(
                value,
                "group remove",
            )?)),
            ("group", "list") => Ok(AdminCommand::GroupList),
            ("prompt", "set") => Ok(AdminCommand::PromptSet(required(value, "prompt set")?)),
            ("prompt", "get") => Ok(AdminCommand::PromptGet),
            ("context", "clear") => Ok(AdminCommand::ContextClear(
                (!value.is_empty()).then(|| value.to_string()),
            )),
            ("context", sub) if sub.eq_ignore_ascii_case("clearall") => {
                Ok(AdminCommand::ContextClearAll)
            }
            _ => Err(CommandError::Unknown(
                format!("{command} {sub_command}").trim().to_string(),
            )),
        }
    }
}

fn required(value: &str, name: &'static str) -> Result<String, CommandError> {
    if value.is_empty() {
        Err(CommandError::MissingArgument(name))
    } else {
        Ok(value.to_string())
    }
}

/// Split off the first whitespace-delimited token.
fn split_head(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.find(char::is_whitespace) {
        Some(idx) => (&text[..idx], text[idx..].trim_start()),
        None => (text, ""),
    }
}
