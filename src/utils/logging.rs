//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the BannerBuddy application.

use std::time::Duration;
use tracing::{info, warn, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::LoggingConfig;
use crate::utils::errors::{BannerBuddyError, Result};

/// Initialize logging based on configuration
///
/// The returned guard flushes the file appender and must live as long as the process.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_new(&config.level)
        .map_err(|e| BannerBuddyError::Config(format!("Invalid log filter: {}", e)))?;

    let (file_layer, guard) = match &config.file_path {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "banner_buddy.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(file_layer)
        .try_init()
        .map_err(|e| BannerBuddyError::Config(format!("Logging already initialized: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log one conversation turn
pub fn log_turn(session: &str, from_state: &str, to_state: &str, reply: &str) {
    info!(
        session = session,
        from_state = from_state,
        to_state = to_state,
        reply = reply,
        "Conversation turn handled"
    );
}

/// Log the outcome of a banner pipeline stage
pub fn log_pipeline_stage(stage: &str, elapsed: Duration, success: bool) {
    if success {
        debug!(
            stage = stage,
            duration_ms = elapsed.as_millis() as u64,
            "Pipeline stage completed"
        );
    } else {
        warn!(
            stage = stage,
            duration_ms = elapsed.as_millis() as u64,
            "Pipeline stage failed"
        );
    }
}
