//! Bot handlers module
//!
//! This module contains all the handlers for Telegram bot interactions

pub mod commands;
pub mod messages;

pub use commands::{handle_cancel, handle_help, handle_start};
pub use messages::{handle_message, send_reply};
