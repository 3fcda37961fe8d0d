//! Mock Gemini API server for testing
//!
//! This module provides a mock HTTP server that simulates the Gemini
//! `generateContent` endpoint. It uses wiremock to create configurable
//! mock responses.

use serde_json::{json, Value};
use wiremock::{
    matchers::{body_string_contains, header, method, path},
    Mock, MockServer, ResponseTemplate,
};
use banner_buddy::config::ModelConfig;

pub const TEST_MODEL: &str = "test-model";
pub const TEST_API_KEY: &str = "test-key";

/// Configuration for mock responses
#[derive(Debug, Clone)]
pub struct MockResponseConfig {
    pub status: u16,
    pub delay_ms: Option<u64>,
}

impl Default for MockResponseConfig {
    fn default() -> Self {
        Self {
            status: 200,
            delay_ms: None,
        }
    }
}

/// Mock Gemini API server
pub struct GeminiMockServer {
    pub server: MockServer,
}

/// Wrap a JSON document the way Gemini returns generated text
pub fn generate_content_body(document: &Value) -> Value {
    json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{"text": document.to_string()}]
            },
            "finishReason": "STOP"
        }]
    })
}

impl GeminiMockServer {
    /// Create a new mock Gemini server
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Model configuration pointing at this server
    pub fn model_config(&self, timeout_seconds: u64) -> ModelConfig {
        ModelConfig {
            api_url: self.server.uri(),
            api_key: TEST_API_KEY.to_string(),
            model: TEST_MODEL.to_string(),
            timeout_seconds,
        }
    }

    fn endpoint() -> String {
        format!("/models/{}:generateContent", TEST_MODEL)
    }

    fn response(body: Value, config: &MockResponseConfig) -> ResponseTemplate {
        let mut response = ResponseTemplate::new(config.status).set_body_json(body);
        if let Some(delay) = config.delay_ms {
            response = response.set_delay(std::time::Duration::from_millis(delay));
        }
        response
    }

    /// Answer any request whose prompt contains `prompt_fragment` with `document`
    pub async fn mock_json_for(&self, prompt_fragment: &str, document: Value, config: MockResponseConfig) {
        Mock::given(method("POST"))
            .and(path(Self::endpoint()))
            .and(header("x-goog-api-key", TEST_API_KEY))
            .and(body_string_contains(prompt_fragment))
            .respond_with(Self::response(generate_content_body(&document), &config))
            .mount(&self.server)
            .await;
    }

    /// Answer every request with a raw response body
    pub async fn mock_raw(&self, body: Value, config: MockResponseConfig) {
        Mock::given(method("POST"))
            .and(path(Self::endpoint()))
            .respond_with(Self::response(body, &config))
            .mount(&self.server)
            .await;
    }

    /// Layout prompt fragment
    pub fn layout_prompt() -> &'static str {
        "graphic design assistant"
    }

    /// Critique prompt fragment
    pub fn critique_prompt() -> &'static str {
        "Critique this banner"
    }

    /// Number of requests the server has received
    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }
}
