//! HTTP client for the agent server
//!
//! Talks to `POST /api/chat`, `GET /api/settings` and
//! `PUT /api/settings/:key`. A non-success status is reported as
//! [`SwarmChatError::Api`]; transport failures as
//! [`SwarmChatError::Network`]. Nothing is retried.

use crate::api::types::{
    ChatRequest, ChatResponse, SettingUpdate, SettingUpdateResponse,
};
use crate::api::ChatBackend;
use crate::config::ServerConfig;
use crate::error::{Result, SwarmChatError};

use async_trait::async_trait;
use reqwest::{Client, Response};
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

/// Client for the agent server API
///
/// # Examples
///
/// ```
/// use swarmchat::api::ApiClient;
/// use swarmchat::config::ServerConfig;
///
/// let client = ApiClient::new(&ServerConfig::default()).unwrap();
/// assert_eq!(client.base_url(), "http://localhost:5000");
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the configured server
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is not a valid URL or the HTTP client
    /// cannot be built
    pub fn new(config: &ServerConfig) -> Result<Self> {
        Url::parse(&config.base_url).map_err(|e| {
            SwarmChatError::Config(format!("Invalid server URL {}: {}", config.base_url, e))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .user_agent(concat!("swarmchat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SwarmChatError::Network(format!("Failed to create HTTP client: {}", e)))?;

        tracing::debug!("Initialized API client for {}", config.base_url);

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn setting_url(&self, key: &str) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/api/settings", self.base_url))
            .map_err(|e| SwarmChatError::Config(format!("Invalid server URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| SwarmChatError::Config("Server URL cannot be a base".to_string()))?
            .push(key);
        Ok(url)
    }

    /// Send one chat message and return the agent's reply
    pub async fn post_chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let url = format!("{}/api/chat", self.base_url);
        tracing::debug!(
            "Sending chat message: session={}, agent={:?}, {} chars",
            request.session_id,
            request.agent_id,
            request.message.len()
        );

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Chat request failed: {}", e);
                SwarmChatError::Network(format!("Chat request failed: {}", e))
            })?;

        let response = check_status(response).await?;
        let reply: ChatResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse chat response: {}", e);
            SwarmChatError::Network(format!("Failed to parse chat response: {}", e))
        })?;

        tracing::debug!(
            "Chat response: {} chars, tokens={:?}",
            reply.response.len(),
            reply.tokens_used
        );
        Ok(reply)
    }

    /// Fetch every setting as key/value pairs
    pub async fn get_settings(&self) -> Result<BTreeMap<String, serde_json::Value>> {
        let url = format!("{}/api/settings", self.base_url);
        tracing::debug!("Fetching settings from {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::error!("Settings request failed: {}", e);
            SwarmChatError::Network(format!("Settings request failed: {}", e))
        })?;

        let response = check_status(response).await?;
        let settings: BTreeMap<String, serde_json::Value> = response.json().await.map_err(|e| {
            SwarmChatError::Settings(format!("Failed to parse settings: {}", e))
        })?;
        Ok(settings)
    }

    /// Store a new value for `key`
    pub async fn put_setting(&self, key: &str, value: serde_json::Value) -> Result<()> {
        let url = self.setting_url(key)?;
        tracing::debug!("Updating setting {} at {}", key, url);

        let response = self
            .client
            .put(url)
            .json(&SettingUpdate { value })
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Setting update failed: {}", e);
                SwarmChatError::Network(format!("Setting update failed: {}", e))
            })?;

        let response = check_status(response).await?;
        let body: SettingUpdateResponse = response.json().await.unwrap_or_default();
        if !body.success {
            tracing::warn!("Server did not confirm update of setting {}", key);
        }
        Ok(())
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::error!("Server returned error {}: {}", status, body);
    Err(SwarmChatError::Api {
        status: status.as_u16(),
        body,
    }
    .into())
}

#[async_trait]
impl ChatBackend for ApiClient {
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        self.post_chat(request).await
    }
}
