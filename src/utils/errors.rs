//! Error handling for BannerBuddy
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy. Every pipeline stage has
//! its own error enum so failures stay explicit at each call site.

use thiserror::Error;

/// Main error type for BannerBuddy application
#[derive(Error, Debug)]
pub enum BannerBuddyError {
    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Image analysis failed: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Banner compositing failed: {0}")]
    Composite(#[from] CompositeError),

    #[error("Banner critique failed: {0}")]
    Critique(#[from] CritiqueError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<config::ConfigError> for BannerBuddyError {
    fn from(err: config::ConfigError) -> Self {
        BannerBuddyError::Config(err.to_string())
    }
}

/// Image catalog errors
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog directory {path}: {source}")]
    ReadDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while talking to the structured-generation service
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model request failed: {0}")]
    RequestFailed(String),

    #[error("Model request timed out")]
    Timeout,

    #[error("Model service unavailable")]
    ServiceUnavailable,

    #[error("Model returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Model returned no candidates")]
    EmptyResponse,

    #[error("Model response is not valid JSON: {0}")]
    InvalidJson(String),
}

/// Layout analysis errors
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Failed to read image {path}: {source}")]
    ReadImage {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Layout model call failed: {0}")]
    Model(#[from] ModelError),

    #[error("Layout response has unexpected shape: {0}")]
    InvalidLayout(String),
}

/// Banner compositing errors
#[derive(Error, Debug)]
pub enum CompositeError {
    #[error("Failed to open base image {path}: {source}")]
    BaseImage {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to open logo {path}: {source}")]
    Logo {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to encode banner: {0}")]
    Encode(#[source] image::ImageError),

    #[error("Failed to save banner to {path}: {source}")]
    Save {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Banner compositing timed out")]
    Timeout,

    #[error("Compositing task failed: {0}")]
    Task(String),
}

/// Legibility critique errors
#[derive(Error, Debug)]
pub enum CritiqueError {
    #[error("Critique model call failed: {0}")]
    Model(#[from] ModelError),

    #[error("Critique response has unexpected shape: {0}")]
    InvalidCritique(String),
}

/// Result type alias for BannerBuddy operations
pub type Result<T> = std::result::Result<T, BannerBuddyError>;

/// Result type alias for model calls
pub type ModelResult<T> = std::result::Result<T, ModelError>;

impl BannerBuddyError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            BannerBuddyError::Telegram(_) => true,
            BannerBuddyError::Catalog(_) => true,
            BannerBuddyError::Model(_) => true,
            BannerBuddyError::Analysis(_) => true,
            BannerBuddyError::Composite(_) => true,
            BannerBuddyError::Critique(_) => true,
            BannerBuddyError::Config(_) => false,
            BannerBuddyError::Http(_) => true,
            BannerBuddyError::Serialization(_) => false,
            BannerBuddyError::Io(_) => true,
            BannerBuddyError::UrlParse(_) => false,
            BannerBuddyError::InvalidInput(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            BannerBuddyError::Config(_) => ErrorSeverity::Critical,
            BannerBuddyError::UrlParse(_) => ErrorSeverity::Critical,
            BannerBuddyError::Critique(_) => ErrorSeverity::Warning,
            BannerBuddyError::Catalog(_) => ErrorSeverity::Warning,
            BannerBuddyError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
