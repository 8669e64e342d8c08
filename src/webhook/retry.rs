use std::time::Duration;

use crate::config::WebhookConfig;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_secs(1);
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(10);

/// Bounded exponential backoff for webhook delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, first one included
    pub max_attempts: u32,
    /// Delay after the first failed attempt; doubles after each further failure
    pub initial_backoff: Duration,
    /// Per-attempt timeout on the outbound call
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
        }
    }
}

impl From<&WebhookConfig> for RetryPolicy {
    fn from(config: &WebhookConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
            attempt_timeout: Duration::from_millis(config.timeout_ms),
        }
    }
}

impl RetryPolicy {
    /// Sleep before the attempt following failed attempt number `attempt`
    /// (1-based). `None` once no attempt remains.
    pub fn backoff_after(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || attempt >= self.max_attempts {
            return None;
        }
        let factor = 2u32.checked_pow(attempt - 1).unwrap_or(u32::MAX);
        Some(self.initial_backoff.saturating_mul(factor))
    }

    /// Every backoff delay of a fully failing delivery, in order
    pub fn schedule(&self) -> Vec<Duration> {
        (1..self.max_attempts)
            .filter_map(|attempt| self.backoff_after(attempt))
            .collect()
    }

    /// Upper bound on a delivery task's lifetime
    pub fn worst_case_lifetime(&self) -> Duration {
        let sleeping: Duration = self.schedule().into_iter().sum();
        sleeping + self.attempt_timeout.saturating_mul(self.max_attempts)
    }
}
