//! In-process session store.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use tracing::debug;

use super::{SessionError, SessionStore};

/// Idle time after which a session is dropped unless configured otherwise.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 24 * 60 * 60;

/// Upper bound accepted for the idle timeout.
pub const MAX_SESSION_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// Minimum time between two sweeps triggered by writes.
const SWEEP_INTERVAL_SECS: i64 = 60;

#[derive(Debug)]
struct SessionEntry {
    values: HashMap<String, Value>,
    last_access: DateTime<Utc>,
}

#[derive(Debug)]
struct Sessions {
    entries: HashMap<String, SessionEntry>,
    last_sweep: DateTime<Utc>,
}

/// Ephemeral session store backed by a map of session id to key/value pairs.
///
/// A session idle for longer than the TTL is treated as absent and removed.
/// Writes sweep idle sessions at most once a minute; hosts can also call
/// [`MemorySessionStore::purge_expired`] on a timer.
#[derive(Debug)]
pub struct MemorySessionStore {
    sessions: RwLock<Sessions>,
    ttl: Duration,
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::with_ttl_secs(DEFAULT_SESSION_TTL_SECS)
    }
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store dropping sessions idle for more than `ttl_secs`.
    pub fn with_ttl_secs(ttl_secs: u64) -> Self {
        let secs = ttl_secs.min(MAX_SESSION_TTL_SECS) as i64;
        Self {
            sessions: RwLock::new(Sessions {
                entries: HashMap::new(),
                last_sweep: Utc::now(),
            }),
            ttl: Duration::seconds(secs),
        }
    }

    /// Number of live sessions holding at least one value.
    pub fn session_count(&self) -> usize {
        let now = Utc::now();
        self.sessions
            .read()
            .map(|sessions| {
                sessions
                    .entries
                    .values()
                    .filter(|entry| !self.is_expired(entry, now))
                    .count()
            })
            .unwrap_or(0)
    }

    /// Drop every idle session. Returns how many were removed.
    pub fn purge_expired(&self) -> Result<usize, SessionError> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        Ok(self.sweep(&mut sessions, Utc::now()))
    }

    fn is_expired(&self, entry: &SessionEntry, now: DateTime<Utc>) -> bool {
        now - entry.last_access > self.ttl
    }

    fn sweep(&self, sessions: &mut Sessions, now: DateTime<Utc>) -> usize {
        let before = sessions.entries.len();
        sessions
            .entries
            .retain(|_, entry| now - entry.last_access <= self.ttl);
        sessions.last_sweep = now;

        let removed = before - sessions.entries.len();
        if removed > 0 {
            debug!("Dropped {} idle sessions", removed);
        }
        removed
    }
}

fn poisoned<T>(_: T) -> SessionError {
    SessionError::Backend("session lock poisoned".to_string())
}

impl SessionStore for MemorySessionStore {
    fn get(&self, session_id: &str, key: &str) -> Result<Option<Value>, SessionError> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        let now = Utc::now();

        if let Some(entry) = sessions.entries.get_mut(session_id) {
            if !self.is_expired(entry, now) {
                entry.last_access = now;
                return Ok(entry.values.get(key).cloned());
            }
        }

        sessions.entries.remove(session_id);
        Ok(None)
    }

    fn put(&self, session_id: &str, key: &str, value: Value) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        let now = Utc::now();

        if now - sessions.last_sweep >= Duration::seconds(SWEEP_INTERVAL_SECS) {
            self.sweep(&mut sessions, now);
        }

        let entry = sessions
            .entries
            .entry(session_id.to_string())
            .or_insert_with(|| SessionEntry {
                values: HashMap::new(),
                last_access: now,
            });
        if self.is_expired(entry, now) {
            entry.values.clear();
        }
        entry.last_access = now;
        entry.values.insert(key.to_string(), value);
        Ok(())
    }

    fn forget(&self, session_id: &str, key: &str) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        if let Some(entry) = sessions.entries.get_mut(session_id) {
            entry.values.remove(key);
            if entry.values.is_empty() {
                sessions.entries.remove(session_id);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Push a session's last access into the past.
    fn age_session(store: &MemorySessionStore, session_id: &str, secs: i64) {
        let mut sessions = store.sessions.write().unwrap();
        let entry = sessions.entries.get_mut(session_id).unwrap();
        entry.last_access = entry.last_access - Duration::seconds(secs);
    }

    /// Push the last write-triggered sweep into the past.
    fn age_sweep(store: &MemorySessionStore, secs: i64) {
        let mut sessions = store.sessions.write().unwrap();
        sessions.last_sweep = sessions.last_sweep - Duration::seconds(secs);
    }

    #[test]
    fn test_get_unset_key() {
        let store = MemorySessionStore::new();
        assert!(store.get("abc", "cart").unwrap().is_none());
    }

    #[test]
    fn test_put_then_get() {
        let store = MemorySessionStore::new();
        store.put("abc", "cart", json!({"movies": [1]})).unwrap();
        assert_eq!(
            store.get("abc", "cart").unwrap(),
            Some(json!({"movies": [1]}))
        );
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = MemorySessionStore::new();
        store.put("first", "cart", json!(1)).unwrap();
        store.put("second", "cart", json!(2)).unwrap();

        assert_eq!(store.get("first", "cart").unwrap(), Some(json!(1)));
        assert_eq!(store.get("second", "cart").unwrap(), Some(json!(2)));
        assert_eq!(store.session_count(), 2);
    }

    #[test]
    fn test_forget_removes_value_and_empty_session() {
        let store = MemorySessionStore::new();
        store.put("abc", "cart", json!(1)).unwrap();
        store.forget("abc", "cart").unwrap();

        assert!(store.get("abc", "cart").unwrap().is_none());
        assert_eq!(store.session_count(), 0);

        // Forgetting again is a no-op
        store.forget("abc", "cart").unwrap();
    }

    #[test]
    fn test_expired_session_reads_as_empty_and_is_removed() {
        let store = MemorySessionStore::with_ttl_secs(60);
        store.put("abc", "cart", json!(1)).unwrap();
        age_session(&store, "abc", 61);

        assert_eq!(store.session_count(), 0);
        assert!(store.get("abc", "cart").unwrap().is_none());
        assert!(store.sessions.read().unwrap().entries.is_empty());
    }

    #[test]
    fn test_access_keeps_session_alive() {
        let store = MemorySessionStore::with_ttl_secs(60);
        store.put("abc", "cart", json!(1)).unwrap();
        age_session(&store, "abc", 50);

        assert_eq!(store.get("abc", "cart").unwrap(), Some(json!(1)));
        age_session(&store, "abc", 50);
        assert_eq!(store.get("abc", "cart").unwrap(), Some(json!(1)));
    }

    #[test]
    fn test_put_on_expired_session_starts_fresh() {
        let store = MemorySessionStore::with_ttl_secs(60);
        store.put("abc", "cart", json!(1)).unwrap();
        store.put("abc", "other", json!(2)).unwrap();
        age_session(&store, "abc", 120);

        store.put("abc", "cart", json!(3)).unwrap();
        assert_eq!(store.get("abc", "cart").unwrap(), Some(json!(3)));
        assert!(store.get("abc", "other").unwrap().is_none());
    }

    #[test]
    fn test_purge_expired_drops_only_idle_sessions() {
        let store = MemorySessionStore::with_ttl_secs(60);
        for i in 0..100 {
            store.put(&format!("idle-{}", i), "cart", json!(i)).unwrap();
        }
        store.put("active", "cart", json!("keep")).unwrap();
        for i in 0..100 {
            age_session(&store, &format!("idle-{}", i), 120);
        }

        assert_eq!(store.purge_expired().unwrap(), 100);
        assert_eq!(store.sessions.read().unwrap().entries.len(), 1);
        assert_eq!(store.get("active", "cart").unwrap(), Some(json!("keep")));
    }

    #[test]
    fn test_writes_sweep_idle_sessions() {
        let store = MemorySessionStore::with_ttl_secs(60);
        for i in 0..1000 {
            store.put(&format!("client-{}", i), "cart", json!(i)).unwrap();
        }
        for i in 0..1000 {
            age_session(&store, &format!("client-{}", i), 120);
        }
        age_sweep(&store, SWEEP_INTERVAL_SECS);

        store.put("newcomer", "cart", json!(1)).unwrap();
        assert_eq!(store.sessions.read().unwrap().entries.len(), 1);
    }

    #[test]
    fn test_ttl_is_capped() {
        let store = MemorySessionStore::with_ttl_secs(u64::MAX);
        assert_eq!(store.ttl, Duration::seconds(MAX_SESSION_TTL_SECS as i64));
    }
}
