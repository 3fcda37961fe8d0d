//! State management module
//!
//! This module handles conversation sessions and the banner state machine

pub mod machine;
pub mod replies;
pub mod session;
pub mod storage;

// Re-export commonly used state components
pub use machine::BannerFlow;
pub use session::{FlowState, Session};
pub use storage::{SessionKey, SessionStore};
