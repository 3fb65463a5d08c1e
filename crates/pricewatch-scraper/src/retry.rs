//! Bounded retry with exponential backoff.
//!
//! [`retry_with_backoff`] is generic over the operation and its error type;
//! the caller decides which errors are transient through a classifier, so
//! this module knows nothing about HTTP or HTML.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// How many times to try and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first. Values below 1 are treated as 1.
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Wait after failed attempt `attempt_index` (0-based):
    /// `base_delay * 2^attempt_index`, saturating on overflow.
    #[must_use]
    pub fn delay_after(&self, attempt_index: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt_index).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    /// Every wait the policy can incur, in order: one per attempt except the last.
    pub fn schedule(&self) -> impl Iterator<Item = Duration> + '_ {
        (0..self.max_attempts.max(1) - 1).map(|i| self.delay_after(i))
    }
}

/// Runs `operation` until it succeeds, fails with a non-retriable error, or
/// `policy.max_attempts` attempts have been made.
///
/// # Backoff schedule (example with `base_delay = 1s`, `max_attempts = 3`)
///
/// | Attempt | Sleep after failure |
/// |---------|---------------------|
/// | 0       | 1 × 2^0 = 1 s       |
/// | 1       | 1 × 2^1 = 2 s       |
/// | 2       | none, last error returned |
///
/// Errors for which `is_retriable` returns `false` are returned immediately
/// without sleeping or consuming further attempts.
///
/// # Errors
///
/// Returns the last error produced by `operation`.
pub async fn retry_with_backoff<T, E, F, Fut, R>(
    policy: &RetryPolicy,
    is_retriable: R,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    R: Fn(&E) -> bool,
    E: Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt + 1 >= max_attempts {
                    return Err(err);
                }

                let delay = policy.delay_after(attempt);
                tracing::warn!(
                    attempt = attempt + 1,
                    max_attempts,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "transient error, retrying after backoff"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
