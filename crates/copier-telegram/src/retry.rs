//! Retry policy for Telegram API calls.

use std::time::Duration;

use teloxide::RequestError;

/// Bounded exponential backoff for transient Telegram failures.
///
/// Flood control (`RetryAfter`) uses the server-provided delay; network and
/// I/O errors back off exponentially. API errors are final.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 500,
            max_delay_ms: 8_000,
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Exponential delay for the given (1-based) retry attempt.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let multiplier = self
            .backoff_multiplier
            .powi(attempt.saturating_sub(1) as i32);
        let delay = (self.initial_delay_ms as f64 * multiplier) as u64;
        Duration::from_millis(delay.min(self.max_delay_ms))
    }

    /// Delay before retry number `attempt`, or `None` to give up.
    pub fn delay_for(&self, attempt: u32, error: &RequestError) -> Option<Duration> {
        if attempt > self.max_retries {
            return None;
        }

        match error {
            RequestError::RetryAfter(seconds) => Some(seconds.duration()),
            RequestError::Network(_) | RequestError::Io(_) => Some(self.backoff(attempt)),
            _ => None,
        }
    }
}
