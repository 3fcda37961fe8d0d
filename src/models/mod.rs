//! Data models module
//!
//! This module contains the data exchanged between the conversation
//! state machine and the banner pipeline.

pub mod critique;
pub mod layout;
pub mod reply;

pub use critique::Critique;
pub use layout::{Layout, Placement};
pub use reply::{BannerPayload, ImageRef, Reply};
