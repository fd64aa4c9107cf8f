//! Chat controller
//!
//! The single owner of the chat state: messages, session, statistics,
//! active agent and the dispatcher. Every mutation goes through its
//! methods and is followed by a statistics recompute, so the snapshot
//! returned by [`ChatController::stats`] always reflects the latest
//! change. Timer-driven refreshes call [`ChatController::refresh_stats`].
//!
//! In-flight requests are tied to the controller's lifetime token, which
//! is cancelled on [`ChatController::shutdown`] and on drop.

use crate::api::ChatBackend;
use crate::chat::agent::{Agent, AgentState, AgentUpdate};
use crate::chat::dispatcher::{MessageDispatcher, SendOutcome};
use crate::chat::export::ExportData;
use crate::chat::format::{format_duration, format_number};
use crate::chat::message::{system_text, Message, MessageKind, MessageStore, Sender};
use crate::chat::session::{Session, SessionTracker};
use crate::chat::stats::{Stats, StatsAggregator, DEFAULT_STATS_INTERVAL};
use crate::commands::special_commands::{help_text, SpecialCommand};
use crate::config::Config;
use crate::error::Result;

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Tunables for a controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerOptions {
    pub stats_interval: Duration,
    pub export_dir: PathBuf,
}

impl ControllerOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            stats_interval: Duration::from_secs(config.chat.stats_interval_seconds),
            export_dir: config.export_dir(),
        }
    }
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            stats_interval: DEFAULT_STATS_INTERVAL,
            export_dir: PathBuf::from("."),
        }
    }
}

/// What the caller should do after a command ran
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Fully handled; any output was posted as system messages
    Handled,
    /// The caller should show the remote settings panel
    ShowSettings,
    /// The caller should show the session details
    ShowSession,
    /// The caller should send this text as a new message
    Resend(String),
    /// The caller should offer this text back to the user for editing
    Prefill(String),
    /// The caller should end the chat
    Exit,
    /// The input was a chat message, not a command
    NotACommand,
}

/// Owner of all chat state
pub struct ChatController {
    messages: MessageStore,
    session: SessionTracker,
    stats: StatsAggregator,
    agent: AgentState,
    dispatcher: MessageDispatcher,
    lifetime: CancellationToken,
    export_dir: PathBuf,
}

impl ChatController {
    /// Create a controller, seed the welcome message and compute the first
    /// statistics snapshot
    pub fn new(agent: Agent, backend: Arc<dyn ChatBackend>, options: ControllerOptions) -> Self {
        let mut controller = Self {
            messages: MessageStore::new(),
            session: SessionTracker::new(),
            stats: StatsAggregator::new(options.stats_interval),
            agent: AgentState::new(agent),
            dispatcher: MessageDispatcher::new(backend),
            lifetime: CancellationToken::new(),
            export_dir: options.export_dir,
        };
        let name = controller.agent.agent().name.clone();
        controller.messages.seed_welcome(&name);
        controller.refresh_stats();
        tracing::info!(
            "Chat controller ready: agent={}, session={}",
            name,
            controller.session.session().id
        );
        controller
    }

    pub fn messages(&self) -> &MessageStore {
        &self.messages
    }

    pub fn session(&self) -> &Session {
        self.session.session()
    }

    pub fn stats(&self) -> &Stats {
        self.stats.stats()
    }

    pub fn agent(&self) -> &Agent {
        self.agent.agent()
    }

    pub fn is_loading(&self) -> bool {
        self.dispatcher.is_loading()
    }

    pub fn stats_interval(&self) -> Duration {
        self.stats.interval()
    }

    /// A child of the lifetime token, cancelled when the controller shuts down
    pub fn lifetime_token(&self) -> CancellationToken {
        self.lifetime.child_token()
    }

    /// Send a chat message and fold the outcome into the state
    pub async fn send_message(&mut self, text: &str) -> SendOutcome {
        let outcome = self
            .dispatcher
            .send_message(
                text,
                self.agent.agent(),
                &mut self.messages,
                &mut self.session,
                &self.lifetime,
            )
            .await;
        self.refresh_stats();
        outcome
    }

    /// Recompute statistics as of now
    pub fn refresh_stats(&mut self) -> &Stats {
        self.refresh_stats_at(Utc::now())
    }

    pub fn refresh_stats_at(&mut self, now: DateTime<Utc>) -> &Stats {
        self.stats
            .recompute(&self.messages, self.session.session(), now)
    }

    pub fn add_system_message(&mut self, text: impl Into<String>, kind: MessageKind) {
        self.messages.add_system_message(text, kind);
        self.refresh_stats();
    }

    /// Merge `update` into the active agent and confirm it in the chat
    pub fn update_agent(&mut self, update: AgentUpdate) -> &Agent {
        self.agent.update_agent(update);
        tracing::info!("Agent updated: {:?}", self.agent.agent());
        self.add_system_message(system_text::SETTINGS_UPDATED, MessageKind::Success);
        self.agent.agent()
    }

    /// Start a fresh session, keeping the message history
    pub fn reset_session(&mut self) {
        self.session.reset_session();
        self.add_system_message(system_text::NEW_SESSION, MessageKind::Info);
    }

    /// Drop the message history
    pub fn clear_history(&mut self) {
        self.messages.clear();
        self.add_system_message(system_text::HISTORY_CLEARED, MessageKind::Info);
    }

    /// Write the chat history to the export directory
    ///
    /// # Errors
    ///
    /// Returns error if the export file cannot be written
    pub fn export_history(&mut self) -> Result<PathBuf> {
        let data = ExportData::capture(
            self.session.session(),
            self.stats.stats(),
            &self.messages,
            Utc::now(),
        );
        let path = data.write_to(&self.export_dir)?;
        self.add_system_message(system_text::HISTORY_EXPORTED, MessageKind::Success);
        Ok(path)
    }

    /// Human-readable statistics summary
    pub fn stats_summary(&self) -> String {
        let stats = self.stats.stats();
        format!(
            "Session statistics:\nMessages: {}\nTokens: {}\nAverage response time: {}s\nDuration: {}",
            format_number(stats.messages_count),
            format_number(stats.tokens_used),
            stats.average_response_time,
            format_duration(stats.session_duration)
        )
    }

    /// Run a parsed slash command
    pub fn run_command(&mut self, command: SpecialCommand) -> CommandOutcome {
        tracing::debug!("Running command {:?}", command);
        match command {
            SpecialCommand::Reset => {
                self.clear_history();
                CommandOutcome::Handled
            }
            SpecialCommand::Settings => CommandOutcome::ShowSettings,
            SpecialCommand::Help => {
                self.add_system_message(help_text(), MessageKind::Info);
                CommandOutcome::Handled
            }
            SpecialCommand::Export => {
                if let Err(e) = self.export_history() {
                    tracing::error!("Failed to export chat history: {:#}", e);
                    self.add_system_message(
                        format!("Failed to export chat history: {}", e),
                        MessageKind::Error,
                    );
                }
                CommandOutcome::Handled
            }
            SpecialCommand::NewSession => {
                self.reset_session();
                CommandOutcome::Handled
            }
            SpecialCommand::Stats => {
                self.refresh_stats();
                let summary = self.stats_summary();
                self.add_system_message(summary, MessageKind::Info);
                CommandOutcome::Handled
            }
            SpecialCommand::Session => CommandOutcome::ShowSession,
            SpecialCommand::UpdateAgent(update) => {
                self.update_agent(update);
                CommandOutcome::Handled
            }
            SpecialCommand::Retry(number) => {
                match self.target_index(number).and_then(|i| self.retry_message(i)) {
                    Some(text) => CommandOutcome::Resend(text),
                    None => self.no_user_message(number),
                }
            }
            SpecialCommand::Edit(number) => {
                match self.target_index(number).and_then(|i| self.edit_message(i)) {
                    Some(text) => CommandOutcome::Prefill(text),
                    None => self.no_user_message(number),
                }
            }
            SpecialCommand::Delete(number) => {
                let Some(index) = self.target_index(number) else {
                    return self.no_user_message(number);
                };
                match self.delete_message(index) {
                    Some(_) => self.add_system_message(
                        format!("Deleted message #{}", index + 1),
                        MessageKind::Info,
                    ),
                    None => self.add_system_message(
                        format!("No message #{}", index + 1),
                        MessageKind::Error,
                    ),
                }
                CommandOutcome::Handled
            }
            SpecialCommand::Exit => CommandOutcome::Exit,
            SpecialCommand::None => CommandOutcome::NotACommand,
        }
    }

    /// Store index for a 1-based message number, or the latest user message
    fn target_index(&self, number: Option<usize>) -> Option<usize> {
        match number {
            Some(n) => n.checked_sub(1),
            None => self
                .messages
                .messages()
                .iter()
                .rposition(|m| m.sender == Sender::User),
        }
    }

    fn no_user_message(&mut self, number: Option<usize>) -> CommandOutcome {
        let text = match number {
            Some(n) => format!("Message #{} is not one of your messages", n),
            None => "You have not sent any messages yet".to_string(),
        };
        self.add_system_message(text, MessageKind::Error);
        CommandOutcome::Handled
    }

    /// Text of the user message at `index`, for sending again
    pub fn retry_message(&self, index: usize) -> Option<String> {
        self.messages
            .get(index)
            .filter(|m| m.sender == Sender::User)
            .map(|m| m.text.clone())
    }

    /// Take back the user message at `index`
    ///
    /// Drops it and everything after it, returning its text for editing.
    pub fn edit_message(&mut self, index: usize) -> Option<String> {
        let text = self.retry_message(index)?;
        self.messages.truncate(index);
        self.refresh_stats();
        Some(text)
    }

    /// Delete the message at `index`
    ///
    /// Deleting a user message that is not the last one also deletes the
    /// reply that follows it.
    pub fn delete_message(&mut self, index: usize) -> Option<Message> {
        let removed = self.messages.remove(index)?;
        if removed.sender == Sender::User && index < self.messages.len() {
            self.messages.remove(index);
        }
        self.refresh_stats();
        Some(removed)
    }

    /// Cancel any in-flight request
    pub fn shutdown(&self) {
        if !self.lifetime.is_cancelled() {
            tracing::info!("Shutting down chat session {}", self.session.session().id);
            self.lifetime.cancel();
        }
    }
}

impl Drop for ChatController {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}
