//! Command-line interface definition for swarmchat
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for interactive chat, one-shot sends, and remote
//! settings management.

use clap::{Parser, Subcommand};

/// swarmchat - terminal client for an AI agent chat server
///
/// Chat with an agent, keep an eye on session statistics, and manage
/// the server-side agent settings.
#[derive(Parser, Debug, Clone)]
#[command(name = "swarmchat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the chat server base URL
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for swarmchat
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session
    Chat {
        /// Display name of the agent
        #[arg(short = 'n', long)]
        agent_name: Option<String>,

        /// Server-side agent identifier
        #[arg(short, long)]
        agent_id: Option<String>,
    },

    /// Send a single message and print the reply
    Send {
        /// Message text
        message: String,

        /// Server-side agent identifier
        #[arg(short, long)]
        agent_id: Option<String>,

        /// Print the reply and statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage the agent settings stored on the server
    Settings {
        /// Settings subcommand
        #[command(subcommand)]
        command: SettingsCommand,
    },
}

/// Settings management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SettingsCommand {
    /// List every setting
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single setting
    Get {
        /// Setting key
        key: String,
    },

    /// Change a setting
    ///
    /// The value is parsed as JSON when possible, otherwise stored as a
    /// string.
    Set {
        /// Setting key
        key: String,

        /// New value
        value: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            server: None,
            command: Commands::Chat {
                agent_name: None,
                agent_id: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default() {
        let cli = Cli::default();
        assert_eq!(cli.config, Some("config/config.yaml".to_string()));
        assert!(!cli.verbose);
        assert!(cli.server.is_none());
        assert!(matches!(cli.command, Commands::Chat { .. }));
    }

    #[test]
    fn test_cli_parse_chat_command() {
        let cli = Cli::try_parse_from(["swarmchat", "chat"]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        assert_eq!(cli.config.as_deref(), Some("config/config.yaml"));
        assert!(matches!(cli.command, Commands::Chat { .. }));
    }

    #[test]
    fn test_cli_parse_chat_with_agent() {
        let cli = Cli::try_parse_from([
            "swarmchat",
            "chat",
            "--agent-name",
            "Research Bot",
            "-a",
            "agent-7",
        ])
        .unwrap();
        if let Commands::Chat {
            agent_name,
            agent_id,
        } = cli.command
        {
            assert_eq!(agent_name.as_deref(), Some("Research Bot"));
            assert_eq!(agent_id.as_deref(), Some("agent-7"));
        } else {
            panic!("Expected Chat command");
        }
    }

    #[test]
    fn test_cli_server_is_global() {
        let before = Cli::try_parse_from(["swarmchat", "--server", "http://a:1", "chat"]).unwrap();
        assert_eq!(before.server.as_deref(), Some("http://a:1"));

        let after = Cli::try_parse_from(["swarmchat", "chat", "--server", "http://b:2"]).unwrap();
        assert_eq!(after.server.as_deref(), Some("http://b:2"));
    }

    #[test]
    fn test_cli_parse_send() {
        let cli = Cli::try_parse_from(["swarmchat", "send", "hello there", "--json"]).unwrap();
        if let Commands::Send {
            message,
            agent_id,
            json,
        } = cli.command
        {
            assert_eq!(message, "hello there");
            assert!(agent_id.is_none());
            assert!(json);
        } else {
            panic!("Expected Send command");
        }
    }

    #[test]
    fn test_cli_parse_send_requires_message() {
        assert!(Cli::try_parse_from(["swarmchat", "send"]).is_err());
    }

    #[test]
    fn test_cli_parse_settings_subcommands() {
        let cli = Cli::try_parse_from(["swarmchat", "settings", "list", "--json"]).unwrap();
        if let Commands::Settings { command } = cli.command {
            assert!(matches!(command, SettingsCommand::List { json: true }));
        } else {
            panic!("Expected Settings command");
        }

        let cli = Cli::try_parse_from(["swarmchat", "settings", "set", "temperature", "0.7"])
            .unwrap();
        if let Commands::Settings {
            command: SettingsCommand::Set { key, value },
        } = cli.command
        {
            assert_eq!(key, "temperature");
            assert_eq!(value, "0.7");
        } else {
            panic!("Expected Settings set command");
        }
    }

    #[test]
    fn test_cli_parse_with_verbose() {
        let cli = Cli::try_parse_from(["swarmchat", "-v", "settings", "get", "model"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_parse_missing_command() {
        assert!(Cli::try_parse_from(["swarmchat"]).is_err());
    }

    #[test]
    fn test_cli_parse_invalid_command() {
        assert!(Cli::try_parse_from(["swarmchat", "invalid"]).is_err());
    }
}
