//! Chat session bookkeeping
//!
//! A session carries an identifier, its start time, cumulative token
//! usage, the ordered list of response latencies and per-sender message
//! counters. It lives until the user starts a new session.

use crate::chat::message::Sender;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-sender message counters
///
/// `total` always equals `user + ai`; system messages are not counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MessageStats {
    pub total: u64,
    pub user: u64,
    pub ai: u64,
}

impl MessageStats {
    /// Counters after one more message from `sender`
    ///
    /// # Examples
    ///
    /// ```
    /// use swarmchat::chat::message::Sender;
    /// use swarmchat::chat::session::MessageStats;
    ///
    /// let stats = MessageStats::default()
    ///     .record(Sender::User)
    ///     .record(Sender::Ai)
    ///     .record(Sender::System);
    /// assert_eq!((stats.total, stats.user, stats.ai), (2, 1, 1));
    /// ```
    #[must_use]
    pub fn record(self, sender: Sender) -> Self {
        match sender {
            Sender::User => Self {
                total: self.total + 1,
                user: self.user + 1,
                ..self
            },
            Sender::Ai => Self {
                total: self.total + 1,
                ai: self.ai + 1,
                ..self
            },
            Sender::System => self,
        }
    }
}

/// State of one chat session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub start_time: DateTime<Utc>,
    pub tokens_used: u64,
    /// Response latencies in whole seconds, oldest first
    pub response_times: Vec<u64>,
    pub message_stats: MessageStats,
}

impl Session {
    /// A fresh session starting now with a new random id
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    pub fn starting_at(start_time: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            start_time,
            tokens_used: 0,
            response_times: Vec::new(),
            message_stats: MessageStats::default(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Partial session update
///
/// Fields left as `None` keep their current value. `response_times`
/// replaces the whole list, so callers pass it already extended.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionUpdate {
    pub tokens_used: Option<u64>,
    pub response_times: Option<Vec<u64>>,
    pub message_stats: Option<MessageStats>,
}

/// Owner of the current session
#[derive(Debug, Clone, Default)]
pub struct SessionTracker {
    session: Session,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Merge `update` into the current session, last write wins per field
    pub fn update_session(&mut self, update: SessionUpdate) {
        if let Some(tokens_used) = update.tokens_used {
            self.session.tokens_used = tokens_used;
        }
        if let Some(response_times) = update.response_times {
            self.session.response_times = response_times;
        }
        if let Some(message_stats) = update.message_stats {
            self.session.message_stats = message_stats;
        }
    }

    /// Count one more message from `sender`
    pub fn record_message(&mut self, sender: Sender) {
        let message_stats = self.session.message_stats.record(sender);
        self.update_session(SessionUpdate {
            message_stats: Some(message_stats),
            ..Default::default()
        });
    }

    /// Replace the session with a fresh one and return it
    pub fn reset_session(&mut self) -> &Session {
        let previous = std::mem::take(&mut self.session);
        tracing::info!(
            "Session {} reset, new session {}",
            previous.id,
            self.session.id
        );
        &self.session
    }
}
