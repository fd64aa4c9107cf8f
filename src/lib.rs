//! swarmchat - terminal client for an AI agent chat server
//!
//! This library provides the chat state machine, the HTTP client for the
//! agent server, and the command handlers behind the `swarmchat` binary.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `chat`: Messages, session accounting, statistics and the controller
//! - `api`: HTTP client and wire types for the chat and settings endpoints
//! - `settings`: Remote agent settings panel
//! - `commands`: CLI command handlers and slash commands
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use swarmchat::api::ApiClient;
//! use swarmchat::chat::{Agent, ChatController, ControllerOptions};
//! use swarmchat::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     let client = ApiClient::new(&config.server)?;
//!     let mut controller = ChatController::new(
//!         Agent::from(&config.agent),
//!         Arc::new(client),
//!         ControllerOptions::from_config(&config),
//!     );
//!     controller.send_message("Hello!").await;
//!     println!("{} tokens used", controller.stats().tokens_used);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod chat;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod settings;

// Re-export commonly used types
pub use chat::{Agent, ChatController, SendOutcome, Stats};
pub use config::Config;
pub use error::{Result, SwarmChatError};

#[cfg(test)]
pub mod test_utils;
