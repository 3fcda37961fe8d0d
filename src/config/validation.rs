//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{BannerBuddyError, Result};
use crate::utils::helpers::parse_hex_color;
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot)?;
    validate_catalog_config(&settings.catalog)?;
    validate_model_config(&settings.model)?;
    validate_banner_config(&settings.banner)?;
    validate_session_config(&settings.session)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.token.is_empty() {
        return Err(BannerBuddyError::Config(
            "Bot token is required".to_string()
        ));
    }

    Ok(())
}

/// Validate catalog configuration
fn validate_catalog_config(config: &super::CatalogConfig) -> Result<()> {
    if config.assets_dir.is_empty() {
        return Err(BannerBuddyError::Config(
            "Assets directory is required".to_string()
        ));
    }

    if config.logo_path.is_empty() {
        return Err(BannerBuddyError::Config(
            "Logo path is required".to_string()
        ));
    }

    Ok(())
}

/// Validate model configuration
fn validate_model_config(config: &super::ModelConfig) -> Result<()> {
    if config.api_key.is_empty() {
        return Err(BannerBuddyError::Config(
            "Model API key is required".to_string()
        ));
    }

    url::Url::parse(&config.api_url)?;

    if config.model.is_empty() {
        return Err(BannerBuddyError::Config(
            "Model name is required".to_string()
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(BannerBuddyError::Config(
            "Model timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate banner configuration
fn validate_banner_config(config: &super::BannerConfig) -> Result<()> {
    if config.width == 0 || config.height == 0 {
        return Err(BannerBuddyError::Config(
            "Banner width and height must be greater than 0".to_string()
        ));
    }

    if config.logo_size == 0 {
        return Err(BannerBuddyError::Config(
            "Logo size must be greater than 0".to_string()
        ));
    }

    if config.headline_size <= 0.0 || config.description_size <= 0.0 {
        return Err(BannerBuddyError::Config(
            "Font sizes must be greater than 0".to_string()
        ));
    }

    if parse_hex_color(&config.fallback_text_color).is_none() {
        return Err(BannerBuddyError::Config(
            format!("Invalid fallback text color: {}", config.fallback_text_color)
        ));
    }

    if parse_hex_color(&config.stroke_color).is_none() {
        return Err(BannerBuddyError::Config(
            format!("Invalid stroke color: {}", config.stroke_color)
        ));
    }

    if config.output_path.is_empty() {
        return Err(BannerBuddyError::Config(
            "Banner output path is required".to_string()
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(BannerBuddyError::Config(
            "Banner timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate session configuration
fn validate_session_config(config: &super::SessionConfig) -> Result<()> {
    if config.ttl_seconds == 0 {
        return Err(BannerBuddyError::Config(
            "Session TTL must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(BannerBuddyError::Config(
            "Log level is required".to_string()
        ));
    }

    // Same parser init_logging uses, so per-target directives are accepted
    if let Err(e) = tracing_subscriber::EnvFilter::try_new(&config.level) {
        return Err(BannerBuddyError::Config(
            format!("Invalid log level '{}': {}", config.level, e)
        ));
    }

    Ok(())
}
