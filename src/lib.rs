//! BannerBuddy Telegram Bot
//!
//! A conversational Telegram bot that guides a user from a product name to a
//! finished promotional banner: pick a product photo, write a headline and a
//! description, and get back a composited banner whose layout was suggested
//! and whose legibility was checked by a vision model.

pub mod config;
pub mod handlers;
pub mod services;
pub mod models;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{BannerBuddyError, Result};

// Re-export main components for easy access
pub use services::ServiceFactory;
pub use state::{BannerFlow, Session, SessionStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
