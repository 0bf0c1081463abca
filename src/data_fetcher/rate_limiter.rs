//! Advisory limiter for outbound upstream calls.
//!
//! The limiter never blocks or queues. Callers ask [`RateLimiter::can_call`]
//! and, when refused, serve cached or local data instead.
//!
//! Every recorded call schedules its own decrement one window later. The
//! decrements are kept as deadlines and applied when the limiter is next
//! consulted, which behaves exactly like a timer that fires on schedule.
//! As with timers, this approximates a sliding window: a burst right after
//! old decrements fire can momentarily exceed the nominal per-window rate.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::config::Config;
use crate::constants::rate_limit;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub min_spacing: Duration,
    pub max_calls: u32,
    pub window: Duration,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            min_spacing: Duration::from_secs(rate_limit::MIN_CALL_SPACING_SECONDS),
            max_calls: rate_limit::MAX_CALLS_PER_WINDOW,
            window: Duration::from_secs(rate_limit::WINDOW_SECONDS),
        }
    }
}

impl From<&Config> for RateLimitPolicy {
    fn from(config: &Config) -> Self {
        Self {
            min_spacing: Duration::from_secs(config.min_call_spacing_seconds),
            max_calls: config.max_calls_per_window,
            window: Duration::from_secs(config.rate_window_seconds),
        }
    }
}

#[derive(Debug)]
pub struct RateLimiter {
    policy: RateLimitPolicy,
    last_call: Option<Instant>,
    pending_decrements: VecDeque<Instant>,
}

impl RateLimiter {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            policy,
            last_call: None,
            pending_decrements: VecDeque::new(),
        }
    }

    pub fn policy(&self) -> RateLimitPolicy {
        self.policy
    }

    /// Calls counted against the current window
    pub fn call_count(&self) -> usize {
        let now = Instant::now();
        self.pending_decrements
            .iter()
            .filter(|deadline| **deadline > now)
            .count()
    }

    pub fn last_call(&self) -> Option<Instant> {
        self.last_call
    }

    /// True when the minimum spacing since the last call has passed and the
    /// window still has room. A limiter that never recorded a call only
    /// checks the cap.
    pub fn can_call(&self) -> bool {
        let spaced = self
            .last_call
            .is_none_or(|last| last.elapsed() > self.policy.min_spacing);
        let count = self.call_count();
        let under_cap = count < self.policy.max_calls as usize;

        if !spaced || !under_cap {
            debug!(
                "Rate limiter refusing call: spaced={}, count={}/{}",
                spaced, count, self.policy.max_calls
            );
        }

        spaced && under_cap
    }

    /// Records an outbound call attempt and schedules its decrement.
    pub fn record_call(&mut self) {
        let now = Instant::now();
        // Drop decrements that have already fired
        while self
            .pending_decrements
            .front()
            .is_some_and(|deadline| *deadline <= now)
        {
            self.pending_decrements.pop_front();
        }

        self.last_call = Some(now);
        self.pending_decrements.push_back(now + self.policy.window);

        debug!(
            "Recorded upstream call: count={}/{}",
            self.pending_decrements.len(),
            self.policy.max_calls
        );
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(spacing_secs: u64, max_calls: u32, window_secs: u64) -> RateLimitPolicy {
        RateLimitPolicy {
            min_spacing: Duration::from_secs(spacing_secs),
            max_calls,
            window: Duration::from_secs(window_secs),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_limiter_allows_call() {
        let limiter = RateLimiter::default();
        assert!(limiter.can_call());
        assert_eq!(limiter.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_calls_closer_than_spacing_are_refused() {
        let mut limiter = RateLimiter::default();
        limiter.record_call();
        tokio::time::advance(Duration::from_secs(2)).await;
        limiter.record_call();

        assert!(!limiter.can_call());

        // Spacing must be strictly exceeded
        tokio::time::advance(Duration::from_secs(6)).await;
        assert!(!limiter.can_call());
        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(limiter.can_call());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cap_reached_until_window_decrement_fires() {
        let mut limiter = RateLimiter::new(policy(1, 9, 60));

        for _ in 0..9 {
            assert!(limiter.can_call());
            limiter.record_call();
            tokio::time::advance(Duration::from_secs(2)).await;
        }

        // First call was 18s ago; its decrement fires at t=60
        assert_eq!(limiter.call_count(), 9);
        assert!(!limiter.can_call());

        tokio::time::advance(Duration::from_secs(41)).await;
        assert!(!limiter.can_call(), "still inside the first call's window");

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(limiter.call_count(), 8);
        assert!(limiter.can_call());
    }

    #[tokio::test(start_paused = true)]
    async fn test_count_decays_to_zero_after_window() {
        let mut limiter = RateLimiter::new(policy(0, 3, 60));
        limiter.record_call();
        limiter.record_call();
        assert_eq!(limiter.call_count(), 2);

        tokio::time::advance(Duration::from_secs(60)).await;
        assert_eq!(limiter.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_policy_from_config() {
        let config = Config {
            min_call_spacing_seconds: 2,
            max_calls_per_window: 4,
            rate_window_seconds: 30,
            ..Config::default()
        };
        assert_eq!(RateLimitPolicy::from(&config), policy(2, 4, 30));
    }
}
