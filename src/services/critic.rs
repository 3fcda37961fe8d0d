//! Legibility critic service

use std::sync::Arc;
use tracing::{debug, warn};
use crate::models::Critique;
use crate::services::gemini::{ImagePart, StructuredModel};
use crate::utils::errors::CritiqueError;

const CRITIQUE_PROMPT: &str = r#"Critique this banner. Is the headline text clearly legible and easy to read?
Answer with a simple JSON:

{
    "is_legible": true/false,
    "critique": "explain in one sentence"
}"#;

/// Legibility critic backed by a structured model
#[derive(Clone)]
pub struct LegibilityCritic {
    model: Arc<dyn StructuredModel>,
}

impl LegibilityCritic {
    pub fn new(model: Arc<dyn StructuredModel>) -> Self {
        Self { model }
    }

    /// Judge whether the text on a base64-encoded JPEG banner is legible
    pub async fn critique(&self, banner_base64: &str) -> Result<Critique, CritiqueError> {
        let image = ImagePart::from_base64("image/jpeg", banner_base64);
        let value = self.model.generate_json(CRITIQUE_PROMPT, Some(image)).await?;
        let critique = Critique::from_value(value)?;

        debug!(is_legible = critique.is_legible, critique = %critique.critique, "Banner critiqued");
        Ok(critique)
    }

    /// Critique with the default-pass policy: failures yield [`Critique::default_pass`]
    pub async fn critique_or_default(&self, banner_base64: &str) -> Critique {
        match self.critique(banner_base64).await {
            Ok(critique) => critique,
            Err(e) => {
                warn!(error = %e, "Banner critique failed, assuming legible");
                Critique::default_pass()
            }
        }
    }
}
