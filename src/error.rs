//! Error types for swarmchat
//!
//! This module defines the error types used throughout the client,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for swarmchat operations
///
/// Covers configuration loading, remote API calls, settings updates,
/// cancelled requests and the local chat-history export.
#[derive(Error, Debug)]
pub enum SwarmChatError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The chat request could not be delivered or its reply could not be read
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-success status
    #[error("API returned status {status}: {body}")]
    Api {
        /// HTTP status code returned by the server
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// Settings panel errors (unknown key, rejected update)
    #[error("Settings error: {0}")]
    Settings(String),

    /// The request was abandoned before a reply arrived
    #[error("Request cancelled")]
    Cancelled,

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for swarmchat operations
///
/// Uses `anyhow::Error` so callers can attach context while the
/// underlying `SwarmChatError` stays downcastable.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = SwarmChatError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_network_error_display() {
        let error = SwarmChatError::Network("connection refused".to_string());
        assert_eq!(error.to_string(), "Network error: connection refused");
    }

    #[test]
    fn test_api_error_display() {
        let error = SwarmChatError::Api {
            status: 503,
            body: "overloaded".to_string(),
        };
        assert_eq!(error.to_string(), "API returned status 503: overloaded");
    }

    #[test]
    fn test_settings_error_display() {
        let error = SwarmChatError::Settings("unknown key: theme".to_string());
        assert_eq!(error.to_string(), "Settings error: unknown key: theme");
    }

    #[test]
    fn test_cancelled_display() {
        assert_eq!(SwarmChatError::Cancelled.to_string(), "Request cancelled");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: SwarmChatError = io_error.into();
        assert!(matches!(error, SwarmChatError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let error: SwarmChatError = json_error.into();
        assert!(matches!(error, SwarmChatError::Serialization(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: : yaml").unwrap_err();
        let error: SwarmChatError = yaml_error.into();
        assert!(matches!(error, SwarmChatError::Yaml(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SwarmChatError>();
    }
}
