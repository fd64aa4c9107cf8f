//! Chat messages and the append-only message store
//!
//! Messages are immutable once appended. The store keeps insertion order
//! and only shrinks on an explicit clear or a user-driven edit/delete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who a message came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Typed by the person at the terminal
    User,
    /// Reply from the remote agent
    Ai,
    /// Generated locally (welcome, errors, command output)
    System,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Ai => write!(f, "ai"),
            Self::System => write!(f, "system"),
        }
    }
}

/// Severity tag carried by system messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Info,
    Success,
    Error,
    Warning,
}

/// Fixed texts for system messages
pub mod system_text {
    /// Greeting seeded into an empty conversation
    pub fn welcome(agent_name: &str) -> String {
        format!(
            "Welcome! I'm {}, your AI assistant. How can I help you?",
            agent_name
        )
    }

    pub const NEW_SESSION: &str = "Started a new chat session";
    pub const HISTORY_CLEARED: &str = "Chat history cleared";
    pub const HISTORY_EXPORTED: &str = "Chat history exported";
    pub const SETTINGS_UPDATED: &str = "Agent settings updated";
    pub const NETWORK_ERROR: &str =
        "An error occurred while sending the message. Please try again.";
}

/// A message as stored in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_type: Option<MessageKind>,
}

impl Message {
    /// True for user and AI messages, the ones counted in statistics
    pub fn is_conversational(&self) -> bool {
        self.sender != Sender::System
    }
}

/// A message before it is stamped and appended
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub text: String,
    pub sender: Sender,
    pub message_type: Option<MessageKind>,
}

impl NewMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
            message_type: None,
        }
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Ai,
            message_type: None,
        }
    }

    pub fn system(text: impl Into<String>, kind: MessageKind) -> Self {
        Self {
            text: text.into(),
            sender: Sender::System,
            message_type: Some(kind),
        }
    }
}

/// Ordered, append-only list of chat messages
///
/// # Examples
///
/// ```
/// use swarmchat::chat::message::{MessageStore, NewMessage};
///
/// let mut store = MessageStore::new();
/// assert!(store.seed_welcome("GPT Assistant"));
/// store.add_message(NewMessage::user("hi"));
/// assert_eq!(store.len(), 2);
/// assert_eq!(store.conversational_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MessageStore {
    messages: Vec<Message>,
    welcomed: bool,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message stamped with the current time
    pub fn add_message(&mut self, message: NewMessage) -> &Message {
        self.add_message_at(message, Utc::now())
    }

    /// Append a message with an explicit timestamp
    pub fn add_message_at(&mut self, message: NewMessage, timestamp: DateTime<Utc>) -> &Message {
        self.messages.push(Message {
            text: message.text,
            sender: message.sender,
            timestamp,
            message_type: message.message_type,
        });
        &self.messages[self.messages.len() - 1]
    }

    /// Append a system message of the given kind
    pub fn add_system_message(&mut self, text: impl Into<String>, kind: MessageKind) -> &Message {
        self.add_message(NewMessage::system(text, kind))
    }

    /// Seed the greeting for `agent_name`
    ///
    /// Only the first call on an empty store with a non-blank name adds
    /// anything; returns whether the welcome message was added.
    pub fn seed_welcome(&mut self, agent_name: &str) -> bool {
        if self.welcomed || !self.messages.is_empty() || agent_name.trim().is_empty() {
            return false;
        }
        self.messages.push(Message {
            text: system_text::welcome(agent_name),
            sender: Sender::System,
            timestamp: Utc::now(),
            message_type: None,
        });
        self.welcomed = true;
        true
    }

    /// Drop every message
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Keep only the messages before `index`
    pub fn truncate(&mut self, index: usize) {
        self.messages.truncate(index);
    }

    /// Remove and return the message at `index`
    pub fn remove(&mut self, index: usize) -> Option<Message> {
        (index < self.messages.len()).then(|| self.messages.remove(index))
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn get(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of user and AI messages
    pub fn conversational_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_conversational()).count()
    }

    /// Whether a date separator belongs before the message at `index`
    ///
    /// The first message always gets one; later messages only when their
    /// calendar day differs from the previous message.
    pub fn should_show_timestamp(&self, index: usize) -> bool {
        if index == 0 {
            return true;
        }
        match (self.messages.get(index), self.messages.get(index - 1)) {
            (Some(current), Some(previous)) => {
                current.timestamp.date_naive() != previous.timestamp.date_naive()
            }
            _ => false,
        }
    }
}
