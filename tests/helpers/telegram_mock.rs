//! Mock Telegram API Server for testing
//!
//! This module provides a mock HTTP server that simulates the Telegram Bot API
//! for testing purposes. It uses wiremock to create configurable mock responses
//! and records which methods the bot called, in order.

use serde_json::{json, Value};
use teloxide::Bot;
use wiremock::{
    matchers::{method, path_regex},
    Mock, MockServer, ResponseTemplate,
};

pub const TEST_BOT_TOKEN: &str = "12345:test_token";
pub const TEST_CHAT_ID: i64 = 42;

/// Mock Telegram API server for testing
pub struct TelegramMockServer {
    pub server: MockServer,
}

fn sent_message() -> Value {
    json!({
        "ok": true,
        "result": {
            "message_id": 123,
            "from": {
                "id": 12345,
                "is_bot": true,
                "first_name": "TestBot",
                "username": "test_bot"
            },
            "chat": {
                "id": TEST_CHAT_ID,
                "first_name": "Tester",
                "type": "private"
            },
            "date": 1640995200,
            "text": "Test message"
        }
    })
}

fn bad_request() -> Value {
    json!({
        "ok": false,
        "error_code": 400,
        "description": "Bad Request: wrong file identifier/HTTP URL specified"
    })
}

impl TelegramMockServer {
    /// Create a new mock Telegram API server
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Bot whose API calls go to this server
    pub fn bot(&self) -> Bot {
        let api_url = url::Url::parse(&self.server.uri()).expect("mock server url");
        Bot::new(TEST_BOT_TOKEN).set_api_url(api_url)
    }

    /// Accept every sendMessage call
    pub async fn mock_send_message(&self) {
        Mock::given(method("POST"))
            .and(path_regex(r"(?i)^/bot[^/]+/sendmessage$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sent_message()))
            .mount(&self.server)
            .await;
    }

    /// Accept or reject every sendPhoto call
    pub async fn mock_send_photo(&self, success: bool) {
        let response = if success {
            ResponseTemplate::new(200).set_body_json(sent_message())
        } else {
            ResponseTemplate::new(400).set_body_json(bad_request())
        };

        Mock::given(method("POST"))
            .and(path_regex(r"(?i)^/bot[^/]+/sendphoto$"))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }

    /// Lowercased Bot API method names in the order they were called
    pub async fn called_methods(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|request| request.url.path_segments()?.last().map(str::to_lowercase))
            .collect()
    }

    /// Request bodies of the sendMessage calls, lossily decoded
    pub async fn sent_texts(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path().to_lowercase().ends_with("/sendmessage"))
            .map(|request| String::from_utf8_lossy(&request.body).into_owned())
            .collect()
    }
}
