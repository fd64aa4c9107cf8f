//! Configuration management for swarmchat
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::chat::agent::Agent;
use crate::error::{Result, SwarmChatError};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for swarmchat
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Chat server connection settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Interactive chat behavior
    #[serde(default)]
    pub chat: ChatConfig,
    /// The agent a new chat talks to
    #[serde(default)]
    pub agent: AgentConfig,
}

/// Chat server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL the `/api/...` paths are resolved against
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout for a single HTTP request (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

/// Interactive chat configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Period of the statistics refresh (seconds)
    #[serde(default = "default_stats_interval")]
    pub stats_interval_seconds: u64,

    /// Where `/export` writes chat histories
    ///
    /// Defaults to the platform data directory.
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
}

fn default_stats_interval() -> u64 {
    60
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            stats_interval_seconds: default_stats_interval(),
            export_dir: None,
        }
    }
}

/// Initial agent configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_agent_name")]
    pub name: String,

    #[serde(default = "default_agent_role")]
    pub role: String,

    #[serde(default = "default_agent_status")]
    pub status: String,

    /// Server-side agent identifier sent with every chat request
    #[serde(default)]
    pub id: Option<String>,
}

fn default_agent_name() -> String {
    "GPT Assistant".to_string()
}

fn default_agent_role() -> String {
    "General Purpose AI".to_string()
}

fn default_agent_status() -> String {
    "active".to_string()
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            role: default_agent_role(),
            status: default_agent_status(),
            id: None,
        }
    }
}

impl From<&AgentConfig> for Agent {
    fn from(config: &AgentConfig) -> Self {
        Self {
            name: config.name.clone(),
            role: config.role.clone(),
            status: config.status.clone(),
            id: config.id.clone(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SwarmChatError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| SwarmChatError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(url) = std::env::var("SWARMCHAT_SERVER_URL") {
            tracing::debug!(url = %url, "Env override: SWARMCHAT_SERVER_URL");
            self.server.base_url = url;
        }

        if let Ok(timeout) = std::env::var("SWARMCHAT_REQUEST_TIMEOUT") {
            match timeout.parse() {
                Ok(value) => self.server.request_timeout_seconds = value,
                Err(_) => tracing::warn!("Invalid SWARMCHAT_REQUEST_TIMEOUT: {}", timeout),
            }
        }

        if let Ok(interval) = std::env::var("SWARMCHAT_STATS_INTERVAL") {
            match interval.parse() {
                Ok(value) => self.chat.stats_interval_seconds = value,
                Err(_) => tracing::warn!("Invalid SWARMCHAT_STATS_INTERVAL: {}", interval),
            }
        }

        if let Ok(dir) = std::env::var("SWARMCHAT_EXPORT_DIR") {
            self.chat.export_dir = Some(PathBuf::from(dir));
        }

        if let Ok(name) = std::env::var("SWARMCHAT_AGENT_NAME") {
            self.agent.name = name;
        }

        if let Ok(id) = std::env::var("SWARMCHAT_AGENT_ID") {
            self.agent.id = Some(id);
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        use crate::cli::Commands;

        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let Some(server) = &cli.server {
            self.server.base_url = server.clone();
        }

        let agent_id = match &cli.command {
            Commands::Chat {
                agent_name,
                agent_id,
            } => {
                if let Some(name) = agent_name {
                    self.agent.name = name.clone();
                }
                agent_id.as_ref()
            }
            Commands::Send { agent_id, .. } => agent_id.as_ref(),
            Commands::Settings { .. } => None,
        };
        if let Some(id) = agent_id {
            self.agent.id = Some(id.clone());
        }
    }

    /// Directory `/export` writes into
    pub fn export_dir(&self) -> PathBuf {
        if let Some(dir) = &self.chat.export_dir {
            return dir.clone();
        }
        ProjectDirs::from("", "", "swarmchat")
            .map(|dirs| dirs.data_dir().join("exports"))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.server.base_url.trim().is_empty() {
            return Err(SwarmChatError::Config("server.base_url cannot be empty".to_string()).into());
        }

        if let Err(e) = url::Url::parse(&self.server.base_url) {
            return Err(SwarmChatError::Config(format!(
                "Invalid server.base_url {}: {}",
                self.server.base_url, e
            ))
            .into());
        }

        if self.server.request_timeout_seconds == 0 {
            return Err(SwarmChatError::Config(
                "server.request_timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.chat.stats_interval_seconds == 0 {
            return Err(SwarmChatError::Config(
                "chat.stats_interval_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.agent.name.trim().is_empty() {
            return Err(SwarmChatError::Config("agent.name cannot be empty".to_string()).into());
        }

        Ok(())
    }
}
