//! Search result cache.
//!
//! Results are cached per `(network, normalized query)` with a TTL chosen by
//! the caller. Entries are serialized to JSON and kept in a
//! [`KeyValueStore`]; reads treat missing, expired or corrupt entries as
//! absent and never fail. Expiry is lazy: nothing is evicted until it is
//! read.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::domain::{Network, SearchResult};

// ============================================================================
// Clock
// ============================================================================

/// Wall-clock source, in milliseconds since the Unix epoch.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

fn ttl_ms(ttl: Duration) -> i64 {
    i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX)
}

// ============================================================================
// Key/Value Stores
// ============================================================================

/// String key/value medium with per-entry expiry.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String, ttl: Duration);
    fn remove(&self, key: &str);
}

/// In-memory store that lives as long as the client session.
pub struct SessionStore {
    entries: Mutex<HashMap<String, (String, i64)>>,
    clock: Arc<dyn Clock>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Number of entries held, expired ones included.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for SessionStore {
    fn get(&self, key: &str) -> Option<String> {
        let now = self.clock.now_ms();
        let mut entries = self.entries.lock();

        match entries.get(key) {
            Some((_, expires_at)) if now > *expires_at => {
                entries.remove(key);
                None
            }
            Some((value, _)) => Some(value.clone()),
            None => None,
        }
    }

    fn set(&self, key: &str, value: String, ttl: Duration) {
        let expires_at = self.clock.now_ms().saturating_add(ttl_ms(ttl));
        self.entries
            .lock()
            .insert(key.to_string(), (value, expires_at));
    }

    fn remove(&self, key: &str) {
        self.entries.lock().remove(key);
    }
}

/// Store used when caching is unavailable; every read misses.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledStore;

impl KeyValueStore for DisabledStore {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&self, _key: &str, _value: String, _ttl: Duration) {}

    fn remove(&self, _key: &str) {}
}

// ============================================================================
// Result Cache
// ============================================================================

/// Serialized form of a cached result list.
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    value: Vec<SearchResult>,
    stored_at: i64,
    ttl_ms: i64,
}

/// TTL cache of aggregated search results.
#[derive(Clone)]
pub struct ResultCache {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl ResultCache {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// A session-scoped cache.
    #[must_use]
    pub fn session() -> Self {
        Self::new(Arc::new(SessionStore::new()))
    }

    /// A cache that never hits.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(Arc::new(DisabledStore))
    }

    fn key(network: Network, query: &str) -> String {
        format!("search:{network}:{query}")
    }

    /// Returns the cached results, or `None` if absent, expired or unreadable.
    #[must_use]
    pub fn get(&self, network: Network, query: &str) -> Option<Vec<SearchResult>> {
        let key = Self::key(network, query);
        let raw = self.store.get(&key)?;

        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Dropping unreadable cache entry '{key}': {e}");
                self.store.remove(&key);
                return None;
            }
        };

        if self.clock.now_ms() > entry.stored_at.saturating_add(entry.ttl_ms) {
            tracing::debug!("Cache entry '{key}' expired");
            return None;
        }

        Some(entry.value)
    }

    /// Stores results under the key, replacing any previous entry.
    pub fn set(&self, network: Network, query: &str, results: &[SearchResult], ttl: Duration) {
        let key = Self::key(network, query);
        let entry = CacheEntry {
            value: results.to_vec(),
            stored_at: self.clock.now_ms(),
            ttl_ms: ttl_ms(ttl),
        };

        match serde_json::to_string(&entry) {
            Ok(serialized) => self.store.set(&key, serialized, ttl),
            Err(e) => tracing::warn!("Failed to serialize cache entry '{key}': {e}"),
        }
    }
}

impl std::fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache").finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
