//! Structured-generation model client
//!
//! This service wraps the Gemini `generateContent` endpoint, sending a prompt
//! with an optional inline image and parsing the JSON the model returns.
//! The analyzer and critic only see the [`StructuredModel`] trait.

use std::time::Duration;
use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use crate::config::ModelConfig;
use crate::utils::errors::{BannerBuddyError, ModelError, ModelResult, Result};
use crate::utils::helpers::{strip_code_fences, truncate_text};

/// An image attached to a model request
#[derive(Debug, Clone)]
pub struct ImagePart {
    pub mime_type: String,
    /// Base64-encoded image bytes
    pub data: String,
}

impl ImagePart {
    /// Attach raw image bytes
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    /// Attach an image that is already base64-encoded
    pub fn from_base64(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }
}

/// A remote model that answers a prompt with structured JSON
#[async_trait]
pub trait StructuredModel: Send + Sync {
    async fn generate_json(&self, prompt: &str, image: Option<ImagePart>) -> ModelResult<serde_json::Value>;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart {
    Text {
        text: String,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Gemini REST client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    config: ModelConfig,
}

impl GeminiClient {
    /// Create a new client; every request is bounded by `timeout_seconds`
    pub fn new(config: ModelConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("BannerBuddy-Bot/1.0")
            .build()
            .map_err(BannerBuddyError::Http)?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn build_request(prompt: &str, image: Option<ImagePart>) -> GenerateContentRequest {
        let mut parts = vec![RequestPart::Text { text: prompt.to_string() }];
        if let Some(image) = image {
            parts.push(RequestPart::Inline {
                inline_data: InlineData {
                    mime_type: image.mime_type,
                    data: image.data,
                },
            });
        }

        GenerateContentRequest {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
            },
        }
    }
}

#[async_trait]
impl StructuredModel for GeminiClient {
    async fn generate_json(&self, prompt: &str, image: Option<ImagePart>) -> ModelResult<serde_json::Value> {
        let url = self.endpoint();
        let has_image = image.is_some();
        let request = Self::build_request(prompt, image);

        debug!(model = %self.config.model, has_image = has_image, "Sending generateContent request");

        let response = self.client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ModelError::Timeout
                } else if e.is_connect() {
                    ModelError::ServiceUnavailable
                } else {
                    ModelError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ModelError::Timeout
            } else {
                ModelError::RequestFailed(e.to_string())
            }
        })?;

        if !status.is_success() {
            warn!(status = status.as_u16(), body = %truncate_text(&body, 500), "Model returned non-success status");
            return Err(ModelError::Status {
                status: status.as_u16(),
                body: truncate_text(&body, 2000),
            });
        }

        parse_generate_content(&body)
    }
}

/// Extract the JSON document from a `generateContent` response body
fn parse_generate_content(body: &str) -> ModelResult<serde_json::Value> {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| ModelError::InvalidJson(e.to_string()))?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ModelError::EmptyResponse);
    }

    serde_json::from_str(strip_code_fences(&text)).map_err(|e| {
        warn!(text = %truncate_text(&text, 500), "Model text is not JSON");
        ModelError::InvalidJson(e.to_string())
    })
}
