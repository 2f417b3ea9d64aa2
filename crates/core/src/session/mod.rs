//! Session storage - an opaque key-value store scoped per user session.
//!
//! The cart keeps its state here. Values are JSON so any backend the host
//! provides (memory, cookie, redis) can carry them.

mod memory;

pub use memory::{MemorySessionStore, DEFAULT_SESSION_TTL_SECS, MAX_SESSION_TTL_SECS};

use serde_json::Value;
use thiserror::Error;

/// Errors for session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session serialization error: {0}")]
    Serialization(String),

    #[error("Session backend error: {0}")]
    Backend(String),
}

/// Trait for session storage backends.
pub trait SessionStore: Send + Sync {
    /// Read a value from a session. Returns `None` when the key is unset.
    fn get(&self, session_id: &str, key: &str) -> Result<Option<Value>, SessionError>;

    /// Write a value, replacing any previous one.
    fn put(&self, session_id: &str, key: &str, value: Value) -> Result<(), SessionError>;

    /// Remove a value. Removing an unset key is not an error.
    fn forget(&self, session_id: &str, key: &str) -> Result<(), SessionError>;
}
