//! Application-wide constants and configuration defaults
//!
//! This module centralizes the magic numbers used across the crate so that
//! config defaults, tests and runtime code agree on a single value.

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 10;

/// Maximum number of idle connections per host in the HTTP client pool
pub const HTTP_POOL_MAX_IDLE_PER_HOST: usize = 8;

/// Default upstream API base URL (football-data.org v4)
pub const DEFAULT_API_DOMAIN: &str = "https://api.football-data.org/v4";

/// Header carrying the upstream API key
pub const AUTH_HEADER: &str = "X-Auth-Token";

/// Cache key used for the default "today's matches" query
pub const MATCHES_TODAY_KEY: &str = "matches_today";

/// Name of the local backup file inside the config directory
pub const BACKUP_FILE_NAME: &str = "backup-matches.json";

/// Cache TTL values in seconds
pub mod cache_ttl {
    /// Default TTL for match listings (5 minutes)
    pub const MATCHES_SECONDS: u64 = 300;
}

/// Outbound rate limiting defaults
pub mod rate_limit {
    /// Minimum spacing between two upstream calls (seconds)
    pub const MIN_CALL_SPACING_SECONDS: u64 = 6;

    /// Maximum number of calls inside one rolling window.
    /// Free upstream tier allows 10/min, one call is kept as headroom.
    pub const MAX_CALLS_PER_WINDOW: u32 = 9;

    /// Length of the rolling window (seconds)
    pub const WINDOW_SECONDS: u64 = 60;
}

/// Live channel reconnection defaults
pub mod reconnect {
    /// Base delay for exponential backoff (milliseconds)
    pub const BASE_DELAY_MS: u64 = 1000;

    /// Upper bound for a single backoff delay (milliseconds)
    pub const MAX_DELAY_MS: u64 = 30_000;

    /// Reconnect attempts before the channel gives up
    pub const MAX_ATTEMPTS: u32 = 5;

    /// Capacity of the broadcast channel carrying data updates
    pub const EVENT_BUFFER: usize = 256;
}

/// Periodic refresh interval for watch mode (seconds)
pub const DEFAULT_REFRESH_INTERVAL_SECONDS: u64 = 60;

/// Environment variable names
pub mod env_vars {
    /// Override for the upstream API base URL
    pub const API_DOMAIN: &str = "MATCHDAY_API_DOMAIN";

    /// Override for the upstream API key
    pub const API_KEY: &str = "MATCHDAY_API_KEY";

    /// Override for the log file path
    pub const LOG_FILE: &str = "MATCHDAY_LOG_FILE";

    /// Override for the HTTP timeout in seconds
    pub const HTTP_TIMEOUT: &str = "MATCHDAY_HTTP_TIMEOUT";

    /// Override for the live push channel URL
    pub const LIVE_URL: &str = "MATCHDAY_LIVE_URL";

    /// Override for the local backup file path
    pub const BACKUP_FILE: &str = "MATCHDAY_BACKUP_FILE";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_constants_are_reasonable() {
        let spacing = rate_limit::MIN_CALL_SPACING_SECONDS;
        let cap = rate_limit::MAX_CALLS_PER_WINDOW;
        let window = rate_limit::WINDOW_SECONDS;

        assert!(cap > 0);
        // Spacing alone must not make the cap unreachable
        assert!(spacing * u64::from(cap) <= window);
    }

    #[test]
    fn test_reconnect_constants_are_reasonable() {
        assert!(reconnect::BASE_DELAY_MS > 0);
        assert!(reconnect::BASE_DELAY_MS <= reconnect::MAX_DELAY_MS);
        assert!(reconnect::MAX_ATTEMPTS > 0);
    }

    #[test]
    fn test_timeout_shorter_than_cache_ttl() {
        assert!(DEFAULT_HTTP_TIMEOUT_SECONDS < cache_ttl::MATCHES_SECONDS);
    }
}
