//! Retry policy for outbound requests.

use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use gleaner_core::{ApiError, ApiErrorKind};
use tracing::{debug, warn};

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default delay before the first retry.
pub const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_millis(1000);

/// Retry policy keyed by error kind.
///
/// A request is attempted up to `max_retries + 1` times. Before retry `n`
/// (1-indexed) the policy sleeps `initial_backoff * 2^(n-1)`. Only errors
/// whose kind is in `retryable_errors` are retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on every further retry.
    pub initial_backoff: Duration,
    /// Error kinds worth retrying.
    pub retryable_errors: HashSet<ApiErrorKind>,
}

impl RetryConfig {
    /// Creates a policy with the default backoff and retryable set.
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
            retryable_errors: Self::default_retryable(),
        }
    }

    /// Disables retries.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            initial_backoff: Duration::ZERO,
            retryable_errors: HashSet::new(),
        }
    }

    /// Sets the initial backoff.
    #[must_use]
    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    /// Replaces the retryable error kinds.
    #[must_use]
    pub fn with_retryable(mut self, kinds: impl IntoIterator<Item = ApiErrorKind>) -> Self {
        self.retryable_errors = kinds.into_iter().collect();
        self
    }

    fn default_retryable() -> HashSet<ApiErrorKind> {
        [ApiErrorKind::Network, ApiErrorKind::RateLimit]
            .into_iter()
            .collect()
    }

    /// Total number of attempts this policy allows.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Calculates the delay before the given attempt (0-indexed).
    ///
    /// The first attempt never waits.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let factor = 2u32.saturating_pow(attempt - 1);
        self.initial_backoff.saturating_mul(factor)
    }

    /// Determines if an error should be retried.
    pub fn is_retryable(&self, error: &ApiError) -> bool {
        self.retryable_errors.contains(&error.kind())
    }

    /// Runs `op` under this policy.
    ///
    /// `op` receives the 0-indexed attempt number and produces one attempt's
    /// future. Attempts run strictly one after another. The final outcome is
    /// either the first success, the first non-retryable error, or the last
    /// error once attempts are exhausted.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, ApiError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let mut last_error: Option<ApiError> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.delay_for_attempt(attempt);
                debug!(attempt, delay_ms = delay.as_millis(), "Backing off before retry");
                tokio::time::sleep(delay).await;
            }

            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if attempt < self.max_retries && self.is_retryable(&err) {
                        warn!(
                            attempt,
                            kind = %err.kind(),
                            error = %err,
                            "Request failed, retrying"
                        );
                        last_error = Some(err);
                        continue;
                    }
                    return Err(err);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ApiError::unknown("Maximum retry attempts exceeded")))
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES)
    }
}

// ============================================================================
// Tests
// ============================================================================
