//! Cache data structures with TTL support

use std::time::Duration;
use tokio::time::Instant;

/// A cached value together with the instant it stops being valid.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub data: T,
    pub cached_at: Instant,
    pub expiry: Instant,
}

impl<T> CacheEntry<T> {
    /// Creates a new entry that expires `ttl` from now
    pub fn new(data: T, ttl: Duration) -> Self {
        let cached_at = Instant::now();
        Self {
            data,
            cached_at,
            expiry: cached_at + ttl,
        }
    }

    /// An entry is valid up to and including its expiry instant
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now > self.expiry
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Gets the remaining time until expiration
    pub fn time_until_expiry(&self) -> Duration {
        self.expiry.saturating_duration_since(Instant::now())
    }
}

/// Counters describing how the cache has been used
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub expired: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_entry_valid_until_expiry_inclusive() {
        let entry = CacheEntry::new("data", Duration::from_secs(10));
        assert!(!entry.is_expired());

        tokio::time::advance(Duration::from_secs(10)).await;
        assert!(!entry.is_expired());
        assert_eq!(entry.time_until_expiry(), Duration::ZERO);

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(entry.is_expired());
    }
}
