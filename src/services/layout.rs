//! Layout analyzer service
//!
//! Asks the structured-generation model where the headline, description and
//! logo should go on a product photo.

use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};
use crate::models::Layout;
use crate::services::gemini::{ImagePart, StructuredModel};
use crate::utils::errors::AnalysisError;
use crate::utils::helpers::image_mime_type;

const LAYOUT_PROMPT: &str = r##"You are a graphic design assistant. Analyze this image and find the best location to place a headline and description without covering the main product. The text must be legible.

Always place:
- The headline in the top-left corner of the image.
- The description directly below the headline.

Choose a text colour that stays legible against the image, and a spot for a small logo.
Coordinates are integer pixels on a 900x450 canvas.

Return a JSON object with:
{
    "text_placement": {"x": <int>, "y": <int>},
    "text_color": "#RRGGBB",
    "logo_placement": {"x": <int>, "y": <int>}
}"##;

/// Layout analyzer backed by a structured model
#[derive(Clone)]
pub struct LayoutAnalyzer {
    model: Arc<dyn StructuredModel>,
}

impl LayoutAnalyzer {
    pub fn new(model: Arc<dyn StructuredModel>) -> Self {
        Self { model }
    }

    /// Recommend a layout for the image at `image_path`
    ///
    /// A single attempt is made; any failure is returned to the caller.
    pub async fn analyze(&self, image_path: &Path) -> Result<Layout, AnalysisError> {
        info!(image = %image_path.display(), "Analyzing image layout");

        let bytes = tokio::fs::read(image_path)
            .await
            .map_err(|source| AnalysisError::ReadImage {
                path: image_path.display().to_string(),
                source,
            })?;
        debug!(bytes = bytes.len(), "Image bytes loaded");

        let image = ImagePart::from_bytes(image_mime_type(image_path), &bytes);
        let value = self.model.generate_json(LAYOUT_PROMPT, Some(image)).await?;
        let layout = Layout::from_value(value)?;

        debug!(layout = ?layout, "Parsed layout");
        Ok(layout)
    }
}
