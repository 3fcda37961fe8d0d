//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub bot: BotConfig,
    pub catalog: CatalogConfig,
    pub model: ModelConfig,
    pub banner: BannerConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    pub token: String,
}

/// Candidate image catalog configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Directory holding the candidate product images
    pub assets_dir: String,
    /// Logo asset pasted onto every banner
    pub logo_path: String,
}

/// Structured-generation model configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_seconds: u64,
}

/// Which colour the compositor uses for overlaid text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextColorPolicy {
    /// Always draw with `fallback_text_color`
    Fixed,
    /// Use the analyzer's suggestion when it parses
    Suggested,
}

/// Banner rendering configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BannerConfig {
    pub width: u32,
    pub height: u32,
    pub logo_size: u32,
    pub headline_size: f32,
    pub description_size: f32,
    pub description_offset: i32,
    pub stroke_width: u32,
    pub stroke_color: String,
    pub text_color_policy: TextColorPolicy,
    pub fallback_text_color: String,
    pub font_path: Option<String>,
    pub output_path: String,
    pub timeout_seconds: u64,
}

/// Conversation session configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Idle time after which a session starts over
    pub ttl_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for daily-rolling log files; stdout only when unset
    pub file_path: Option<String>,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Settings::default())?)
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("BANNER_BUDDY")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let mut settings: Settings = settings.try_deserialize()?;
        settings.apply_plain_env_fallbacks();
        Ok(settings)
    }

    /// Fill secrets from the conventional unprefixed variables when not configured
    fn apply_plain_env_fallbacks(&mut self) {
        if self.bot.token.is_empty() {
            if let Some(token) = ["TELOXIDE_TOKEN", "BOT_TOKEN"]
                .iter()
                .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
            {
                self.bot.token = token;
            }
        }

        if self.model.api_key.is_empty() {
            if let Ok(key) = std::env::var("GEMINI_API_KEY") {
                self.model.api_key = key;
            }
        }
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::BannerBuddyError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                token: String::new(),
            },
            catalog: CatalogConfig {
                assets_dir: "assets".to_string(),
                logo_path: "assets/logo.jpg".to_string(),
            },
            model: ModelConfig {
                api_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
                api_key: String::new(),
                model: "gemini-2.5-flash-preview-09-2025".to_string(),
                timeout_seconds: 60,
            },
            banner: BannerConfig {
                width: 900,
                height: 450,
                logo_size: 100,
                headline_size: 70.0,
                description_size: 50.0,
                description_offset: 40,
                stroke_width: 2,
                stroke_color: "#000000".to_string(),
                text_color_policy: TextColorPolicy::Fixed,
                fallback_text_color: "#FFFFFF".to_string(),
                font_path: Some("arial.ttf".to_string()),
                output_path: "final_banner.jpg".to_string(),
                timeout_seconds: 30,
            },
            session: SessionConfig { ttl_seconds: 3600 },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_banner() {
        let settings = Settings::default();
        assert_eq!((settings.banner.width, settings.banner.height), (900, 450));
        assert_eq!(settings.banner.logo_size, 100);
        assert_eq!(settings.banner.description_offset, 40);
        assert_eq!(settings.banner.text_color_policy, TextColorPolicy::Fixed);
        assert_eq!(settings.banner.fallback_text_color, "#FFFFFF");
    }

    #[test]
    fn test_color_policy_deserializes_lowercase() {
        let policy: TextColorPolicy = serde_json::from_str("\"suggested\"").unwrap();
        assert_eq!(policy, TextColorPolicy::Suggested);
    }
}
