//! Test utilities for swarmchat
//!
//! In-process chat backends that stand in for the HTTP client in unit
//! tests.

use crate::api::{ChatBackend, ChatRequest, ChatResponse};
use crate::error::{Result, SwarmChatError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Backend that plays back a fixed script of replies
///
/// Each call pops the next scripted result; once the script is exhausted
/// the last reply keeps being returned. Every request is recorded.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    script: Mutex<VecDeque<std::result::Result<ChatResponse, String>>>,
    last: Mutex<Option<std::result::Result<ChatResponse, String>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedBackend {
    pub fn new(script: Vec<std::result::Result<ChatResponse, String>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            ..Default::default()
        }
    }

    /// Always answers with `text` and `tokens`
    pub fn replying(text: &str, tokens: Option<u64>) -> Self {
        Self::new(vec![Ok(ChatResponse {
            response: text.to_string(),
            tokens_used: tokens,
        })])
    }

    /// Always fails with a network error carrying `reason`
    pub fn failing(reason: &str) -> Self {
        Self::new(vec![Err(reason.to_string())])
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.clone());

        let next = self.script.lock().expect("script lock").pop_front();
        let mut last = self.last.lock().expect("last lock");
        let result = match next {
            Some(result) => {
                *last = Some(result.clone());
                result
            }
            None => last
                .clone()
                .unwrap_or_else(|| Err("script exhausted".to_string())),
        };

        result.map_err(|reason| SwarmChatError::Network(reason).into())
    }
}

/// Backend whose requests never complete
#[derive(Debug, Default)]
pub struct PendingBackend;

#[async_trait]
impl ChatBackend for PendingBackend {
    async fn send_chat(&self, _request: &ChatRequest) -> Result<ChatResponse> {
        std::future::pending().await
    }
}
