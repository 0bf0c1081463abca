//! Connection state machine and exponential backoff for the live channel

use std::fmt;
use std::time::Duration;

use crate::config::Config;
use crate::constants::reconnect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub base: Duration,
    pub cap: Duration,
    pub max_attempts: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(reconnect::BASE_DELAY_MS),
            cap: Duration::from_millis(reconnect::MAX_DELAY_MS),
            max_attempts: reconnect::MAX_ATTEMPTS,
        }
    }
}

impl From<&Config> for ReconnectPolicy {
    fn from(config: &Config) -> Self {
        Self {
            base: Duration::from_millis(config.reconnect_base_ms),
            cap: Duration::from_millis(config.reconnect_cap_ms),
            max_attempts: config.reconnect_max_attempts,
        }
    }
}

impl ReconnectPolicy {
    /// `min(base * 2^attempt, cap)`, saturating instead of overflowing
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base.saturating_mul(factor).min(self.cap)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    /// Retry budget exhausted, the channel will not reconnect
    Stopped,
}

impl ConnectionState {
    pub fn is_offline(&self) -> bool {
        matches!(self, ConnectionState::Stopped)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Stopped => "offline",
        })
    }
}

/// What to do after a disconnect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    Retry(Duration),
    GiveUp,
}

#[derive(Debug, Clone)]
pub struct ReconnectState {
    policy: ReconnectPolicy,
    attempt: u32,
    state: ConnectionState,
}

impl ReconnectState {
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self {
            policy,
            attempt: 0,
            state: ConnectionState::Disconnected,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn begin_connect(&mut self) {
        self.state = ConnectionState::Connecting;
    }

    pub fn on_connected(&mut self) {
        self.attempt = 0;
        self.state = ConnectionState::Connected;
    }

    /// Called when a connection drops or a connect attempt fails.
    pub fn on_disconnected(&mut self) -> NextStep {
        if self.attempt >= self.policy.max_attempts {
            self.state = ConnectionState::Stopped;
            return NextStep::GiveUp;
        }

        let delay = self.policy.delay_for(self.attempt);
        self.attempt += 1;
        self.state = ConnectionState::Disconnected;
        NextStep::Retry(delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delays_double_up_to_cap() {
        let policy = ReconnectPolicy::default();
        let delays: Vec<u64> = (0..7).map(|a| policy.delay_for(a).as_millis() as u64).collect();
        assert_eq!(delays, vec![1000, 2000, 4000, 8000, 16000, 30000, 30000]);
        assert_eq!(policy.delay_for(200), Duration::from_secs(30));
    }

    #[test]
    fn test_three_disconnects_are_non_decreasing_and_bounded() {
        let mut state = ReconnectState::new(ReconnectPolicy::default());
        let mut previous = Duration::ZERO;

        for _ in 0..3 {
            let NextStep::Retry(delay) = state.on_disconnected() else {
                panic!("should retry");
            };
            assert!(delay >= previous);
            assert!(delay <= Duration::from_secs(30));
            previous = delay;
        }
    }

    #[test]
    fn test_connect_resets_attempt_counter() {
        let mut state = ReconnectState::new(ReconnectPolicy::default());
        state.on_disconnected();
        state.on_disconnected();
        assert_eq!(state.attempt(), 2);

        state.begin_connect();
        assert_eq!(state.state(), ConnectionState::Connecting);
        state.on_connected();
        assert_eq!(state.attempt(), 0);
        assert_eq!(state.state(), ConnectionState::Connected);

        assert_eq!(
            state.on_disconnected(),
            NextStep::Retry(Duration::from_secs(1))
        );
    }

    #[test]
    fn test_gives_up_after_budget() {
        let mut state = ReconnectState::new(ReconnectPolicy::default());
        for _ in 0..5 {
            assert!(matches!(state.on_disconnected(), NextStep::Retry(_)));
        }
        assert_eq!(state.on_disconnected(), NextStep::GiveUp);
        assert!(state.state().is_offline());
    }
}
