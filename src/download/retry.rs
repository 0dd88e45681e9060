//! Bounded retry with jittered exponential backoff for file downloads.
//!
//! The orchestration layer never retries; this policy belongs to the
//! download collaborator alone. Transient transport errors and 5xx/429
//! responses are retried; other HTTP statuses fail immediately.

use std::time::Duration;

use rand::Rng;

use super::DownloadError;

/// Default maximum attempts per file, including the initial attempt.
pub const DEFAULT_MAX_RETRY: u32 = 5;

/// Base delay for the first retry.
const BASE_DELAY: Duration = Duration::from_secs(1);

/// Delay cap.
const MAX_DELAY: Duration = Duration::from_secs(32);

/// Maximum jitter added to each delay.
const MAX_JITTER_MS: u64 = 500;

/// Retry configuration for per-file download attempts.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_RETRY,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with the given attempt budget (minimum 1).
    #[must_use]
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    /// Maximum attempts including the initial one.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the backoff delay before the next attempt, or `None` when the
    /// error is permanent or the attempt budget is exhausted.
    ///
    /// `attempt` is 1-indexed and counts attempts already made.
    #[must_use]
    pub fn next_delay(&self, error: &DownloadError, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts || is_permanent(error) {
            return None;
        }
        Some(backoff_delay(attempt))
    }
}

/// Permanent failures are not worth repeating: client errors other than 429.
fn is_permanent(error: &DownloadError) -> bool {
    match error {
        DownloadError::Status { status, .. } => (400..500).contains(status) && *status != 429,
        DownloadError::Build(_) => true,
        DownloadError::Request { .. } | DownloadError::Io { .. } => false,
    }
}

/// `min(base * 2^(attempt-1), cap)` plus up to 500ms of jitter.
fn backoff_delay(attempt: u32) -> Duration {
    let exp = attempt.saturating_sub(1).min(10);
    let raw = BASE_DELAY.saturating_mul(1 << exp).min(MAX_DELAY);
    let jitter = Duration::from_millis(rand::thread_rng().gen_range(0..=MAX_JITTER_MS));
    raw + jitter
}
