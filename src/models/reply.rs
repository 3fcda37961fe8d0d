//! Reply model
//!
//! The structured reply returned for every conversation turn.

use serde::{Deserialize, Serialize};

/// One selectable candidate image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    /// 1-based index the user types to select this image
    pub id: usize,
    /// Locator the client uses to display the image
    pub reference: String,
}

/// A generated banner ready to send back
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerPayload {
    /// Base64-encoded JPEG
    pub base64: String,
    pub saved_path: String,
}

/// Reply to a single conversation turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImageRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<BannerPayload>,
}

impl Reply {
    /// Plain text reply
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            images: Vec::new(),
            banner: None,
        }
    }

    /// Reply enumerating candidate images
    pub fn with_images(message: impl Into<String>, images: Vec<ImageRef>) -> Self {
        Self {
            message: message.into(),
            images,
            banner: None,
        }
    }

    /// Reply carrying a finished banner
    pub fn with_banner(message: impl Into<String>, banner: BannerPayload) -> Self {
        Self {
            message: message.into(),
            images: Vec::new(),
            banner: Some(banner),
        }
    }
}
