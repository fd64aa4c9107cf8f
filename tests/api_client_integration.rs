//! HTTP client tests against a mock agent server

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use swarmchat::api::{ApiClient, ChatRequest};
use swarmchat::settings::SettingsPanel;
use swarmchat::SwarmChatError;

mod common;

fn chat_request() -> ChatRequest {
    ChatRequest {
        message: "Hello".to_string(),
        agent_id: "agent-1".to_string(),
        session_id: "session-1".to_string(),
    }
}

#[tokio::test]
async fn test_post_chat_sends_camel_case_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_json(json!({
            "message": "Hello",
            "agentId": "agent-1",
            "sessionId": "session-1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "Hi! How can I help?",
            "tokensUsed": 12
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(&common::server_config(&server.uri())).unwrap();
    let reply = client.post_chat(&chat_request()).await.unwrap();

    assert_eq!(reply.response, "Hi! How can I help?");
    assert_eq!(reply.tokens_used, Some(12));
}

#[tokio::test]
async fn test_post_chat_without_token_count() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "ok"
        })))
        .mount(&server)
        .await;

    let client = ApiClient::new(&common::server_config(&server.uri())).unwrap();
    let reply = client.post_chat(&chat_request()).await.unwrap();
    assert_eq!(reply.tokens_used, None);
}

#[tokio::test]
async fn test_post_chat_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(&common::server_config(&server.uri())).unwrap();
    let err = client.post_chat(&chat_request()).await.unwrap_err();

    match err.downcast_ref::<SwarmChatError>() {
        Some(SwarmChatError::Api { status, body }) => {
            assert_eq!(*status, 503);
            assert_eq!(body, "overloaded");
        }
        other => panic!("Expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_post_chat_unparsable_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = ApiClient::new(&common::server_config(&server.uri())).unwrap();
    let err = client.post_chat(&chat_request()).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SwarmChatError>(),
        Some(SwarmChatError::Network(_))
    ));
}

#[tokio::test]
async fn test_settings_list_and_set_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "gpt-4",
            "temperature": 0.7
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/settings/temperature"))
        .and(body_json(json!({ "value": 0.2 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(&common::server_config(&server.uri())).unwrap();
    let mut panel = SettingsPanel::load(&client).await.unwrap();
    assert_eq!(panel.len(), 2);
    assert_eq!(panel.get("model"), Some(&json!("gpt-4")));

    panel
        .update(&client, "temperature", json!(0.2))
        .await
        .unwrap();
    assert_eq!(panel.get("temperature"), Some(&json!(0.2)));
}

#[tokio::test]
async fn test_rejected_setting_update_keeps_local_value() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/settings/model"))
        .respond_with(ResponseTemplate::new(400).set_body_string("unknown model"))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(&common::server_config(&server.uri())).unwrap();
    let mut settings = std::collections::BTreeMap::new();
    settings.insert("model".to_string(), json!("gpt-4"));
    let mut panel = SettingsPanel::from_settings(settings);

    let result = panel.update(&client, "model", json!("nonsense")).await;
    assert!(result.is_err());
    assert_eq!(panel.get("model"), Some(&json!("gpt-4")));
}

#[tokio::test]
async fn test_blank_setting_key_is_rejected_locally() {
    let server = MockServer::start().await;
    let client = ApiClient::new(&common::server_config(&server.uri())).unwrap();

    let mut panel = SettingsPanel::default();
    let err = panel.update(&client, "  ", json!(1)).await.unwrap_err();
    assert!(err.to_string().contains("cannot be empty"));

    let received = server.received_requests().await.unwrap_or_default();
    assert!(received.is_empty());
}
