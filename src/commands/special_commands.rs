//! Slash commands for interactive chat
//!
//! Commands are prefixed with `/` and are case-insensitive. Anything
//! else is a chat message, except the bare words `exit` and `quit`.

use crate::chat::agent::AgentUpdate;
use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Commands that act on the chat session instead of being sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Clear the message history
    Reset,
    /// Show the remote settings panel
    Settings,
    /// List the available commands
    Help,
    /// Write the chat history to a JSON file
    Export,
    /// Start a new session
    NewSession,
    /// Post the session statistics
    Stats,
    /// Show the session details
    Session,
    /// Change fields of the active agent
    UpdateAgent(AgentUpdate),
    /// Send a user message again; `None` means the latest one
    Retry(Option<usize>),
    /// Take back a user message for editing; `None` means the latest one
    Edit(Option<usize>),
    /// Delete a message; `None` means the latest user message
    Delete(Option<usize>),
    /// Leave the interactive session
    Exit,
    /// Not a special command; send the input as a chat message
    None,
}

/// A command shown in help and offered for completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandInfo {
    pub name: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
}

/// Every slash command, in help order
pub const CHAT_COMMANDS: &[CommandInfo] = &[
    CommandInfo {
        name: "/reset",
        usage: "/reset",
        description: "Clear the chat history",
    },
    CommandInfo {
        name: "/settings",
        usage: "/settings",
        description: "Open the agent settings",
    },
    CommandInfo {
        name: "/help",
        usage: "/help",
        description: "Show this help",
    },
    CommandInfo {
        name: "/export",
        usage: "/export",
        description: "Export the chat history",
    },
    CommandInfo {
        name: "/newsession",
        usage: "/newsession",
        description: "Start a new session",
    },
    CommandInfo {
        name: "/stats",
        usage: "/stats",
        description: "Show statistics",
    },
    CommandInfo {
        name: "/session",
        usage: "/session",
        description: "Show session details",
    },
    CommandInfo {
        name: "/agent",
        usage: "/agent <name|role|status|id> <value>",
        description: "Update the active agent",
    },
    CommandInfo {
        name: "/retry",
        usage: "/retry [n]",
        description: "Send message #n (default: your last message) again",
    },
    CommandInfo {
        name: "/edit",
        usage: "/edit [n]",
        description: "Edit message #n, dropping everything after it",
    },
    CommandInfo {
        name: "/delete",
        usage: "/delete [n]",
        description: "Delete message #n together with its reply",
    },
];

const AGENT_USAGE: &str = "/agent <name|role|status|id> <value>";

/// Parse a line of user input
///
/// # Errors
///
/// Returns `CommandError::UnknownCommand` for an unrecognised `/command`,
/// `CommandError::MissingArgument` or `CommandError::UnsupportedArgument`
/// for a malformed `/agent`.
///
/// # Examples
///
/// ```
/// use swarmchat::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/STATS").unwrap(), SpecialCommand::Stats);
/// assert_eq!(parse_special_command("hello").unwrap(), SpecialCommand::None);
/// assert!(parse_special_command("/foo").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') {
        return Ok(match lower.as_str() {
            "exit" | "quit" => SpecialCommand::Exit,
            _ => SpecialCommand::None,
        });
    }

    let (head, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((head, rest)) => (head.to_lowercase(), rest.trim()),
        None => (lower.clone(), ""),
    };

    match head.as_str() {
        "/reset" => Ok(SpecialCommand::Reset),
        "/settings" => Ok(SpecialCommand::Settings),
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/export" => Ok(SpecialCommand::Export),
        "/newsession" => Ok(SpecialCommand::NewSession),
        "/stats" => Ok(SpecialCommand::Stats),
        "/session" => Ok(SpecialCommand::Session),
        "/exit" | "/quit" => Ok(SpecialCommand::Exit),
        "/agent" => parse_agent_update(rest).map(SpecialCommand::UpdateAgent),
        "/retry" => parse_message_number("/retry", rest).map(SpecialCommand::Retry),
        "/edit" => parse_message_number("/edit", rest).map(SpecialCommand::Edit),
        "/delete" => parse_message_number("/delete", rest).map(SpecialCommand::Delete),
        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

fn parse_agent_update(args: &str) -> Result<AgentUpdate, CommandError> {
    let missing = || CommandError::MissingArgument {
        command: "/agent".to_string(),
        usage: AGENT_USAGE.to_string(),
    };

    let (field, value) = args.split_once(char::is_whitespace).ok_or_else(missing)?;
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(missing());
    }

    let mut update = AgentUpdate::default();
    match field.to_lowercase().as_str() {
        "name" => update.name = Some(value),
        "role" => update.role = Some(value),
        "status" => update.status = Some(value),
        "id" => update.id = Some(value),
        other => {
            return Err(CommandError::UnsupportedArgument {
                command: "/agent".to_string(),
                arg: other.to_string(),
            })
        }
    }
    Ok(update)
}

/// Optional 1-based message number
fn parse_message_number(command: &str, args: &str) -> Result<Option<usize>, CommandError> {
    if args.is_empty() {
        return Ok(None);
    }
    args.trim_start_matches('#')
        .parse::<usize>()
        .ok()
        .filter(|n| *n > 0)
        .map(Some)
        .ok_or_else(|| CommandError::UnsupportedArgument {
            command: command.to_string(),
            arg: args.to_string(),
        })
}

/// Commands whose name starts with `prefix`, case-insensitively
pub fn complete_command(prefix: &str) -> Vec<&'static CommandInfo> {
    let prefix = prefix.to_lowercase();
    CHAT_COMMANDS
        .iter()
        .filter(|cmd| cmd.name.starts_with(&prefix))
        .collect()
}

/// Help text listing every command
pub fn help_text() -> String {
    let mut text = String::from("Available commands:");
    for cmd in CHAT_COMMANDS {
        text.push_str(&format!("\n{} - {}", cmd.usage, cmd.description));
    }
    text.push_str("\nexit, quit - Leave the chat");
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_each_command() {
        let cases = [
            ("/reset", SpecialCommand::Reset),
            ("/settings", SpecialCommand::Settings),
            ("/help", SpecialCommand::Help),
            ("/?", SpecialCommand::Help),
            ("/export", SpecialCommand::Export),
            ("/newsession", SpecialCommand::NewSession),
            ("/stats", SpecialCommand::Stats),
            ("/session", SpecialCommand::Session),
            ("/quit", SpecialCommand::Exit),
        ];
        for (input, expected) in cases {
            assert_eq!(parse_special_command(input).unwrap(), expected, "{}", input);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive_and_trims() {
        assert_eq!(
            parse_special_command("  /NewSession  ").unwrap(),
            SpecialCommand::NewSession
        );
    }

    #[test]
    fn test_plain_text_and_exit_words() {
        assert_eq!(
            parse_special_command("what is rust?").unwrap(),
            SpecialCommand::None
        );
        assert_eq!(parse_special_command("EXIT").unwrap(), SpecialCommand::Exit);
        assert_eq!(parse_special_command("quit").unwrap(), SpecialCommand::Exit);
        assert_eq!(
            parse_special_command("quit smoking").unwrap(),
            SpecialCommand::None
        );
    }

    #[test]
    fn test_unknown_command_error() {
        let err = parse_special_command("/frobnicate").unwrap_err();
        assert_eq!(err, CommandError::UnknownCommand("/frobnicate".to_string()));
        assert!(err.to_string().contains("/help"));
    }

    #[test]
    fn test_agent_update_keeps_value_case() {
        let cmd = parse_special_command("/agent Name Research Bot").unwrap();
        assert_eq!(
            cmd,
            SpecialCommand::UpdateAgent(AgentUpdate {
                name: Some("Research Bot".to_string()),
                ..Default::default()
            })
        );

        let cmd = parse_special_command("/agent id  agent-7 ").unwrap();
        if let SpecialCommand::UpdateAgent(update) = cmd {
            assert_eq!(update.id.as_deref(), Some("agent-7"));
        } else {
            panic!("Expected UpdateAgent");
        }
    }

    #[test]
    fn test_agent_update_errors() {
        assert!(matches!(
            parse_special_command("/agent"),
            Err(CommandError::MissingArgument { .. })
        ));
        assert!(matches!(
            parse_special_command("/agent name"),
            Err(CommandError::MissingArgument { .. })
        ));
        assert_eq!(
            parse_special_command("/agent colour blue").unwrap_err(),
            CommandError::UnsupportedArgument {
                command: "/agent".to_string(),
                arg: "colour".to_string(),
            }
        );
    }

    #[test]
    fn test_message_action_commands() {
        assert_eq!(
            parse_special_command("/retry").unwrap(),
            SpecialCommand::Retry(None)
        );
        assert_eq!(
            parse_special_command("/EDIT 3").unwrap(),
            SpecialCommand::Edit(Some(3))
        );
        assert_eq!(
            parse_special_command("/delete #2").unwrap(),
            SpecialCommand::Delete(Some(2))
        );
    }

    #[test]
    fn test_message_action_rejects_bad_numbers() {
        for input in ["/retry 0", "/edit two", "/delete -1"] {
            assert!(
                matches!(
                    parse_special_command(input),
                    Err(CommandError::UnsupportedArgument { .. })
                ),
                "{}",
                input
            );
        }
    }

    #[test]
    fn test_complete_command_prefixes() {
        let names: Vec<&str> = complete_command("/s").iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["/settings", "/stats", "/session"]);

        let unique = complete_command("/NEW");
        assert_eq!(unique.len(), 1);
        assert_eq!(unique[0].name, "/newsession");

        assert!(complete_command("/zzz").is_empty());
    }

    #[test]
    fn test_help_text_lists_all_commands() {
        let help = help_text();
        for cmd in CHAT_COMMANDS {
            assert!(help.contains(cmd.description), "{}", cmd.name);
        }
    }
}
