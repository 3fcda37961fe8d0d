//! Conversation session
//!
//! This module holds the per-chat record of how far the user has come in
//! the banner conversation: product name, candidate images, the chosen
//! image, and the headline/description pair.

use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc, Duration};

/// Position in the banner conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowState {
    /// Waiting for a product name
    Start,
    /// Candidates listed, waiting for a 1-based selection
    AskImage,
    /// Image chosen, collecting headline then description
    CollectText,
}

impl FlowState {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowState::Start => "START",
            FlowState::AskImage => "ASK_IMAGE",
            FlowState::CollectText => "COLLECT_TEXT",
        }
    }
}

impl std::fmt::Display for FlowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conversation session for one chat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub state: FlowState,
    pub product_name: Option<String>,
    /// Filenames offered in the latest image listing, in listing order
    pub candidate_images: Vec<String>,
    pub selected_image_path: Option<PathBuf>,
    pub headline: Option<String>,
    pub description: Option<String>,
    /// When this session last handled a turn
    pub updated_at: DateTime<Utc>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create a session at the start of the conversation
    pub fn new() -> Self {
        Self {
            state: FlowState::Start,
            product_name: None,
            candidate_images: Vec::new(),
            selected_image_path: None,
            headline: None,
            description: None,
            updated_at: Utc::now(),
        }
    }

    /// Return to START with every optional field cleared
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Whether the session is indistinguishable from a fresh one
    pub fn is_initial(&self) -> bool {
        self.state == FlowState::Start
            && self.product_name.is_none()
            && self.candidate_images.is_empty()
            && self.selected_image_path.is_none()
            && self.headline.is_none()
            && self.description.is_none()
    }

    /// Mark the session as used now
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Check if the session has been idle longer than `ttl`
    pub fn is_expired(&self, ttl: Duration) -> bool {
        Utc::now() - self.updated_at > ttl
    }
}
