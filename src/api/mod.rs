//! Remote agent server API
//!
//! [`ChatBackend`] is the seam the message dispatcher talks through;
//! [`ApiClient`] is its HTTP implementation and also serves the settings
//! endpoints.

pub mod client;
pub mod types;

pub use client::ApiClient;
pub use types::{ChatRequest, ChatResponse, SettingUpdate};

use crate::error::Result;
use async_trait::async_trait;

/// Delivers one chat message and returns the agent's reply
///
/// Implementations perform exactly one attempt; failures are returned,
/// never retried.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatResponse>;
}
