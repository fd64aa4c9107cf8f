//! Wire types for the chat and settings endpoints

use serde::{Deserialize, Serialize};

/// Body of `POST /api/chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    /// Empty when the active agent has no id
    pub agent_id: String,
    pub session_id: String,
}

/// Reply of `POST /api/chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub response: String,
    #[serde(default)]
    pub tokens_used: Option<u64>,
}

/// Body of `PUT /api/settings/:key`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingUpdate {
    pub value: serde_json::Value,
}

/// Reply of `PUT /api/settings/:key`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub(crate) struct SettingUpdateResponse {
    #[serde(default)]
    pub success: bool,
}
