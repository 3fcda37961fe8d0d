//! Services module
//!
//! This module contains the catalog lookup and the three banner pipeline
//! stages: layout analysis, compositing and legibility critique.

pub mod catalog;
pub mod compositor;
pub mod critic;
pub mod gemini;
pub mod layout;

// Re-export commonly used services
pub use catalog::CatalogService;
pub use compositor::{BannerCompositor, BannerFont};
pub use critic::LegibilityCritic;
pub use gemini::{GeminiClient, ImagePart, StructuredModel};
pub use layout::LayoutAnalyzer;

use std::sync::Arc;
use crate::config::settings::Settings;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub catalog: CatalogService,
    pub layout_analyzer: LayoutAnalyzer,
    pub compositor: BannerCompositor,
    pub critic: LegibilityCritic,
}

impl ServiceFactory {
    /// Create a ServiceFactory talking to the configured Gemini model
    pub fn new(settings: &Settings) -> Result<Self> {
        let model: Arc<dyn StructuredModel> = Arc::new(GeminiClient::new(settings.model.clone())?);
        Ok(Self::with_model(settings, model))
    }

    /// Create a ServiceFactory around any structured model
    pub fn with_model(settings: &Settings, model: Arc<dyn StructuredModel>) -> Self {
        Self {
            catalog: CatalogService::new(&settings.catalog),
            layout_analyzer: LayoutAnalyzer::new(model.clone()),
            compositor: BannerCompositor::new(settings.banner.clone(), &settings.catalog.logo_path),
            critic: LegibilityCritic::new(model),
        }
    }
}
