//! Retry policy: how many attempts a job gets and how long to wait between.

use std::time::Duration;

/// Bounded retry with exponential backoff.
///
/// The default is a single attempt: a failed delivery is final unless a
/// bounded policy is configured explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first. Always >= 1.
    pub max_attempts: u32,

    /// Delay before the first retry.
    pub base_delay: Duration,

    pub multiplier: f64,
}

impl RetryPolicy {
    /// One attempt, no retry.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::from_secs(2),
            multiplier: 2.0,
        }
    }

    /// `max_attempts` tries with 2s, 4s, 8s, ... between them.
    pub fn bounded(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::none()
        }
    }

    pub fn with_backoff(mut self, base_delay: Duration, multiplier: f64) -> Self {
        self.base_delay = base_delay;
        self.multiplier = multiplier;
        self
    }

    /// Delay after the `attempts`-th failure (1-indexed):
    /// `base_delay * multiplier^(attempts - 1)`.
    pub fn next_delay(&self, attempts: u32) -> Duration {
        let base_secs = self.base_delay.as_secs_f64();
        let delay_secs = base_secs * self.multiplier.powi(attempts.saturating_sub(1) as i32);
        Duration::from_secs_f64(delay_secs)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}
