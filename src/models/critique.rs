//! Critique model

use serde::{Deserialize, Serialize};
use crate::utils::errors::CritiqueError;

/// Legibility verdict for a composited banner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Critique {
    pub is_legible: bool,
    #[serde(default)]
    pub critique: String,
}

impl Critique {
    /// Verdict used when the critic cannot be reached: the banner passes
    pub fn default_pass() -> Self {
        Self {
            is_legible: true,
            critique: String::new(),
        }
    }

    /// Build a critique from the model's parsed JSON response
    pub fn from_value(value: serde_json::Value) -> Result<Self, CritiqueError> {
        serde_json::from_value(value).map_err(|e| CritiqueError::InvalidCritique(e.to_string()))
    }
}
