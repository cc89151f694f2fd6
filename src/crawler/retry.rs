//! Bounded retry policy shared by every fetch call site

use crate::config::FetchConfig;
use std::time::Duration;

/// Attempt ceiling plus exponential backoff
///
/// After failed attempt `i` (0-indexed) the caller waits
/// `backoff_base * 2^i` before the next attempt. No wait follows the last
/// attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff_base: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff_base: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_base,
        }
    }

    pub fn from_config(config: &FetchConfig) -> Self {
        Self::new(config.retries, Duration::from_millis(config.backoff_base_ms))
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Wait after failed attempt `attempt`, or None if it was the last one
    pub fn delay_after(&self, attempt: u32) -> Option<Duration> {
        if attempt.saturating_add(1) >= self.max_attempts {
            return None;
        }
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        Some(self.backoff_base.saturating_mul(factor))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(8, Duration::from_secs(2))
    }
}
