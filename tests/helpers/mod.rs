//! Test helpers module
//!
//! This module provides utilities and helpers for testing the BannerBuddy
//! application: temporary asset directories, a scripted model, and mock
//! Gemini and Telegram servers.

#![allow(dead_code)]

pub mod fake_model;
pub mod gemini_mock;
pub mod simple_test;
pub mod telegram_mock;

pub use fake_model::*;
pub use gemini_mock::*;
pub use simple_test::*;
pub use telegram_mock::*;

use std::sync::Arc;
use banner_buddy::services::{
    BannerCompositor, BannerFont, CatalogService, LayoutAnalyzer, LegibilityCritic, ServiceFactory, StructuredModel,
};
use banner_buddy::state::BannerFlow;

/// Services over `assets` with the built-in bitmap font and the given model
pub fn build_services(assets: &TestAssets, model: Arc<dyn StructuredModel>) -> ServiceFactory {
    let settings = assets.settings();
    ServiceFactory {
        catalog: CatalogService::new(&settings.catalog),
        layout_analyzer: LayoutAnalyzer::new(model.clone()),
        compositor: BannerCompositor::with_font(settings.banner.clone(), assets.logo_path(), BannerFont::Bitmap),
        critic: LegibilityCritic::new(model),
    }
}

/// Banner flow over `assets` with the given model
pub fn build_flow(assets: &TestAssets, model: Arc<dyn StructuredModel>) -> BannerFlow {
    BannerFlow::new(build_services(assets, model))
}
