//! Rate-limit retry logic.
//!
//! # State Transitions
//! ```text
//! Sent → RetryPending(delay): status 429 with a usable retry-after
//! Sent → Done: any other response
//! RetryPending → Done: whatever the reissued request returned
//! ```

use std::time::Duration;

use crate::config::RetryConfig;

/// Header carrying the server's requested delay.
pub const RETRY_AFTER: &str = "retry-after";

/// Status code that triggers the retry.
pub const TOO_MANY_REQUESTS: u16 = 429;

/// Position of a single dispatch in the retry cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    /// First attempt issued.
    Sent,
    /// Rate-limited; reissue after the delay.
    RetryPending(Duration),
    /// Stored response is final.
    Done,
}

impl RetryState {
    /// Advance after a response with `status` and raw `retry_after` header.
    pub fn advance(self, status: u16, retry_after: Option<&str>, policy: &RetryPolicy) -> Self {
        match self {
            RetryState::Sent if status == TOO_MANY_REQUESTS => policy
                .delay_for(retry_after)
                .map(RetryState::RetryPending)
                .unwrap_or(RetryState::Done),
            _ => RetryState::Done,
        }
    }
}

/// Parse `retry-after` as a positive whole number of seconds.
///
/// Only the leading digits count, so `1.5` waits one second. HTTP-date
/// values, zero and negatives yield `None`.
pub fn parse_retry_after(value: Option<&str>) -> Option<Duration> {
    let trimmed = value?.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let secs: u64 = unsigned[..end].parse().ok()?;
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// When and how long to wait before the single reissue.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    enabled: bool,
    max_delay: Option<Duration>,
}

impl RetryPolicy {
    pub fn new(enabled: bool, max_delay: Option<Duration>) -> Self {
        Self { enabled, max_delay }
    }

    pub fn disabled() -> Self {
        Self::new(false, None)
    }

    /// Delay to honor for a 429 carrying `retry_after`, if any.
    ///
    /// Delays above the configured ceiling are refused rather than clamped.
    pub fn delay_for(&self, retry_after: Option<&str>) -> Option<Duration> {
        if !self.enabled {
            return None;
        }
        let delay = parse_retry_after(retry_after)?;
        match self.max_delay {
            Some(max) if delay > max => {
                tracing::warn!(
                    retry_after_secs = delay.as_secs(),
                    max_secs = max.as_secs(),
                    "Retry-After exceeds ceiling, not retrying"
                );
                None
            }
            _ => Some(delay),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        let max_delay = (config.max_retry_after_secs > 0)
            .then(|| Duration::from_secs(config.max_retry_after_secs));
        Self::new(config.enabled, max_delay)
    }
}
