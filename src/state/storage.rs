//! Session storage implementation
//!
//! This module keeps one conversation session per chat in memory. Each
//! session has its own lock, and a turn holds that lock from reading the
//! state until the reply is built, so two messages from the same chat can
//! never interleave their writes.

use std::collections::HashMap;
use std::sync::Arc;
use chrono::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;
use crate::config::SessionConfig;
use super::session::Session;

/// Opaque session identifier supplied by the transport (the Telegram chat id)
pub type SessionKey = i64;

/// In-memory session storage
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<SessionKey, Arc<Mutex<Session>>>>>,
    ttl: Duration,
}

impl SessionStore {
    /// Create a new session store
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            ttl: Duration::seconds(config.ttl_seconds.min(i64::MAX as u64) as i64),
        }
    }

    /// Lock the session for `key`, creating it when absent
    ///
    /// An expired session is reset before it is handed out.
    pub async fn lock(&self, key: SessionKey) -> OwnedMutexGuard<Session> {
        let handle = {
            let mut sessions = self.sessions.lock().await;
            sessions
                .entry(key)
                .or_insert_with(|| {
                    debug!(session = key, "Creating new session");
                    Arc::new(Mutex::new(Session::new()))
                })
                .clone()
        };

        let mut session = handle.lock_owned().await;
        if session.is_expired(self.ttl) {
            debug!(session = key, updated_at = %session.updated_at, "Session expired, starting over");
            session.reset();
        }
        session
    }

    /// Reset the session for `key` to its initial state
    pub async fn reset(&self, key: SessionKey) {
        let mut session = self.lock(key).await;
        session.reset();
    }

    /// Drop idle sessions that are not in use, returning how many were removed
    pub async fn purge_expired(&self) -> usize {
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        let ttl = self.ttl;

        sessions.retain(|_, handle| match handle.try_lock() {
            Ok(session) => !session.is_expired(ttl),
            Err(_) => true,
        });

        let removed = before - sessions.len();
        if removed > 0 {
            debug!(removed = removed, "Purged expired sessions");
        }
        removed
    }

    /// Number of tracked sessions
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
