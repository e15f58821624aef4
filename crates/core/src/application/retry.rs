// Retry policy for holder fetches

use crate::application::constants::{DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_BASE_DELAY};
use std::time::Duration;
use tracing::warn;

/// Bounded retry with linear backoff
///
/// Attempt numbers are 1-based; the delay after failed attempt `n` is
/// `base_delay * n`, and no delay follows the final attempt.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Whether another attempt remains after failed attempt `attempt`
    pub fn should_retry(&self, attempt: u32) -> bool {
        if attempt >= self.max_attempts {
            warn!(
                attempt,
                max_attempts = self.max_attempts,
                "Max retry attempts reached"
            );
            return false;
        }
        true
    }

    /// Backoff to wait between attempt `attempt` and the next one
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_BASE_DELAY)
    }
}
