//! Chat-history export
//!
//! Serializes the session, the latest stats and every message into a
//! pretty-printed JSON document named `chat-history-<session id>.json`.

use crate::chat::message::{Message, MessageStore};
use crate::chat::session::Session;
use crate::chat::stats::Stats;
use crate::error::{Result, SwarmChatError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Exported chat history document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportData {
    pub session_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub tokens_used: u64,
    pub stats: Stats,
    pub messages: Vec<Message>,
}

impl ExportData {
    /// Capture the conversation as of `end_time`
    pub fn capture(
        session: &Session,
        stats: &Stats,
        messages: &MessageStore,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id: session.id.clone(),
            start_time: session.start_time,
            end_time,
            tokens_used: session.tokens_used,
            stats: *stats,
            messages: messages.messages().to_vec(),
        }
    }

    pub fn file_name(&self) -> String {
        format!("chat-history-{}.json", self.session_id)
    }

    /// Write the document into `dir`, creating it if needed
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created or the file
    /// cannot be written
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir).map_err(|e| {
            SwarmChatError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create export directory {}: {}", dir.display(), e),
            ))
        })?;

        let path = dir.join(self.file_name());
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;

        tracing::info!(
            "Exported {} messages of session {} to {}",
            self.messages.len(),
            self.session_id,
            path.display()
        );
        Ok(path)
    }
}
