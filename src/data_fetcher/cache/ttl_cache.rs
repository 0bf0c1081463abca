use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, trace};

use super::types::{CacheEntry, CacheStats};

/// Key/value store with per-entry expiry.
///
/// There is no capacity bound and no background sweep: an expired entry is
/// removed the next time it is read. The key space is one key per logical
/// query, so the map stays small.
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: HashMap<String, CacheEntry<V>>,
    default_ttl: Duration,
    hits: u64,
    misses: u64,
    expired: u64,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            default_ttl,
            hits: 0,
            misses: 0,
            expired: 0,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Stores `value` under `key`, replacing any previous entry.
    /// `None` uses the cache's default TTL.
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let key = key.into();
        let ttl = ttl.unwrap_or(self.default_ttl);
        trace!("Caching entry: key={}, ttl={:?}", key, ttl);
        self.entries.insert(key, CacheEntry::new(value, ttl));
    }

    /// Returns the value for `key` if present and unexpired.
    /// Expired entries are evicted on the way out.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = Instant::now();

        match self.entries.get(key) {
            Some(entry) if !entry.is_expired_at(now) => {
                self.hits += 1;
                trace!(
                    "Cache hit: key={}, age={:?}",
                    key,
                    now.saturating_duration_since(entry.cached_at)
                );
                Some(entry.data.clone())
            }
            Some(entry) => {
                debug!(
                    "Evicting expired cache entry: key={}, age={:?}",
                    key,
                    now.saturating_duration_since(entry.cached_at)
                );
                self.entries.remove(key);
                self.expired += 1;
                self.misses += 1;
                None
            }
            None => {
                trace!("Cache miss: key={}", key);
                self.misses += 1;
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.entries.remove(key).map(|entry| entry.data)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of stored entries, including expired ones not yet read
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
            expired: self.expired,
        }
    }
}
