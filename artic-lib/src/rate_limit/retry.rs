//! Retry configuration for the page cache.

use std::time::Duration;

use crate::error::Error;
use crate::error::TransportError;

/// Configuration for automatic retry of transient page fetch failures.
///
/// Used by [`CachedSource`](crate::cache::CachedSource); the plain client never
/// retries. The defaults (3 retries, 1s doubling up to 30s) match what a
/// browser-side query cache does for a failed listing request.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use artic_lib::rate_limit::RetryConfig;
///
/// let config = RetryConfig::default()
///     .max_retries(5)
///     .initial_delay(Duration::from_millis(500))
///     .max_delay(Duration::from_secs(60));
///
/// let no_retry = RetryConfig::no_retry();
/// assert_eq!(no_retry.max_retries, 0);
/// ```
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts.
    pub max_retries: u32,
    /// Initial delay between retries (doubles each attempt).
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Whether to retry on HTTP 429 (rate limited).
    pub retry_on_429: bool,
    /// Whether to retry on HTTP 5xx (server errors).
    pub retry_on_5xx: bool,
    /// Whether to retry on network errors and timeouts.
    pub retry_on_network: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            retry_on_429: true,
            retry_on_5xx: true,
            retry_on_network: true,
        }
    }
}

impl RetryConfig {
    /// Creates a config with all retries disabled.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            retry_on_429: false,
            retry_on_5xx: false,
            retry_on_network: false,
            ..Default::default()
        }
    }

    /// Sets the maximum number of retries.
    pub fn max_retries(mut self, n: u32) -> Self {
        self.max_retries = n;
        self
    }

    /// Sets the initial delay between retries.
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the maximum delay between retries.
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Enables or disables retry on HTTP 429.
    pub fn retry_on_429(mut self, enabled: bool) -> Self {
        self.retry_on_429 = enabled;
        self
    }

    /// Enables or disables retry on HTTP 5xx.
    pub fn retry_on_5xx(mut self, enabled: bool) -> Self {
        self.retry_on_5xx = enabled;
        self
    }

    /// Enables or disables retry on network errors.
    pub fn retry_on_network(mut self, enabled: bool) -> Self {
        self.retry_on_network = enabled;
        self
    }

    /// Decides whether `error` should be retried after `attempts` retries.
    pub(crate) fn should_retry(&self, error: &Error, attempts: u32) -> bool {
        if attempts >= self.max_retries {
            return false;
        }
        match error {
            Error::Transport(TransportError::TooManyRequests { .. }) => self.retry_on_429,
            Error::Transport(TransportError::Http { status, .. }) => {
                self.retry_on_5xx && *status >= 500 && error.is_retryable()
            }
            Error::Transport(TransportError::Network(_) | TransportError::Timeout(_)) => {
                self.retry_on_network
            }
            _ => false,
        }
    }

    /// Returns how long to wait before the next attempt.
    ///
    /// A server-provided `Retry-After` wins over the backoff delay.
    pub(crate) fn wait_for(&self, error: &Error, delay: Duration) -> Duration {
        match error {
            Error::Transport(TransportError::TooManyRequests {
                retry_after: Some(retry_after),
            }) => (*retry_after).min(self.max_delay),
            _ => delay,
        }
    }

    /// Returns the backoff delay that follows `delay`.
    pub(crate) fn next_delay(&self, delay: Duration) -> Duration {
        (delay * 2).min(self.max_delay)
    }
}
