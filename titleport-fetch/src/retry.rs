//! Bounded retry for async operations.
//!
//! [`RetryPolicy::run`] wraps any fallible async operation. The policy has a
//! fixed attempt budget, a fixed delay between attempts and a set of HTTP
//! statuses that fail fast. The budget is a [`NonZeroU32`], so every run
//! invokes the operation at least once and always ends with either a value
//! or the last error.

use std::collections::BTreeSet;
use std::fmt;
use std::future::Future;
use std::num::NonZeroU32;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::FetchError;

/// Default attempt budget.
pub const DEFAULT_MAX_ATTEMPTS: NonZeroU32 = match NonZeroU32::new(6) {
    Some(n) => n,
    None => unreachable!(),
};

/// Default delay between attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(5000);

/// Statuses that are never retried by default.
pub const DEFAULT_NON_RETRYABLE: [u16; 2] = [404, 409];

// ============================================================================
// Retryable
// ============================================================================

/// Errors that can report the HTTP status that caused them.
pub trait Retryable {
    /// Returns the HTTP status, or `None` when no response was received.
    fn http_status(&self) -> Option<u16>;
}

impl Retryable for FetchError {
    fn http_status(&self) -> Option<u16> {
        self.status()
    }
}

// ============================================================================
// Retry Policy
// ============================================================================

/// Policy for retrying failed operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: NonZeroU32,
    delay: Duration,
    non_retryable: BTreeSet<u16>,
}

impl RetryPolicy {
    /// Creates a policy with the given budget and default delay and statuses.
    pub fn new(max_attempts: NonZeroU32) -> Self {
        Self {
            max_attempts,
            delay: DEFAULT_RETRY_DELAY,
            non_retryable: DEFAULT_NON_RETRYABLE.into_iter().collect(),
        }
    }

    /// Creates a policy that invokes the operation exactly once.
    pub fn no_retry() -> Self {
        Self::new(NonZeroU32::MIN)
    }

    /// Sets the delay between attempts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Replaces the set of statuses that are never retried.
    pub fn with_non_retryable(mut self, statuses: impl IntoIterator<Item = u16>) -> Self {
        self.non_retryable = statuses.into_iter().collect();
        self
    }

    /// Returns the attempt budget.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts.get()
    }

    /// Returns the delay between attempts.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Returns true if `status` fails fast.
    pub fn is_non_retryable(&self, status: u16) -> bool {
        self.non_retryable.contains(&status)
    }

    /// Determines whether an error may be retried (budget aside).
    pub fn should_retry<E: Retryable>(&self, error: &E) -> bool {
        error
            .http_status()
            .is_none_or(|status| !self.is_non_retryable(status))
    }

    /// Runs `operation` until it succeeds, fails fast, or the budget is spent.
    ///
    /// Returns the first success. On failure the error of the last attempt is
    /// returned: immediately for a non-retryable status, otherwise once the
    /// budget is exhausted.
    pub async fn run<T, E, F, Fut>(&self, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + fmt::Display,
    {
        let mut remaining = self.max_attempts.get();

        loop {
            remaining -= 1;
            let attempt = self.max_attempts.get() - remaining;

            match operation().await {
                Ok(value) => {
                    debug!(attempt, "Operation succeeded");
                    return Ok(value);
                }
                Err(error) => {
                    if remaining == 0 || !self.should_retry(&error) {
                        debug!(attempt, error = %error, "Giving up");
                        return Err(error);
                    }
                    warn!(
                        attempt,
                        remaining,
                        delay_ms = u64::try_from(self.delay.as_millis()).unwrap_or(u64::MAX),
                        error = %error,
                        "Operation failed, retrying"
                    );
                    tokio::time::sleep(self.delay).await;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

// ============================================================================
// Tests
// ============================================================================
