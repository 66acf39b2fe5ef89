//! Sliding window rate limiter.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Sliding window rate limiter.
///
/// Tracks request timestamps and enforces a maximum number of requests
/// within a sliding time window. Default is 60 requests per minute, the
/// quota the public artworks API documents for anonymous callers.
///
/// Cheap to clone; clones share the same window.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use artic_lib::rate_limit::RateLimiter;
///
/// let limiter = RateLimiter::default();
/// assert_eq!(limiter.capacity(), 60);
///
/// let custom = RateLimiter::new(10, Duration::from_secs(1));
/// assert_eq!(custom.window(), Duration::from_secs(1));
/// ```
#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<RateLimiterInner>,
}

struct RateLimiterInner {
    timestamps: Mutex<VecDeque<Instant>>,
    capacity: u32,
    window: Duration,
}

impl RateLimiter {
    /// Creates a new rate limiter allowing `capacity` requests per `window`.
    pub fn new(capacity: u32, window: Duration) -> Self {
        Self {
            inner: Arc::new(RateLimiterInner {
                timestamps: Mutex::new(VecDeque::with_capacity(capacity as usize)),
                capacity,
                window,
            }),
        }
    }

    /// Acquires permission to make a request.
    ///
    /// If the window is full, waits until the oldest request leaves it.
    pub async fn acquire(&self) {
        loop {
            let wait_time = {
                let mut timestamps = self.inner.timestamps.lock().await;
                let now = Instant::now();
                self.evict_expired(&mut timestamps, now);

                if (timestamps.len() as u32) < self.inner.capacity {
                    timestamps.push_back(now);
                    return;
                }

                timestamps
                    .front()
                    .map(|&oldest| oldest + self.inner.window)
                    .filter(|&expires_at| expires_at > now)
                    .map(|expires_at| expires_at - now)
            };

            // Wait outside the lock
            if let Some(wait) = wait_time {
                log::debug!("rate limit window full, waiting {:?}", wait);
                tokio::time::sleep(wait).await;
            }
        }
    }

    /// Returns the number of requests that can be made immediately.
    pub async fn available(&self) -> u32 {
        let mut timestamps = self.inner.timestamps.lock().await;
        self.evict_expired(&mut timestamps, Instant::now());

        self.inner
            .capacity
            .saturating_sub(timestamps.len() as u32)
    }

    pub fn capacity(&self) -> u32 {
        self.inner.capacity
    }

    pub fn window(&self) -> Duration {
        self.inner.window
    }

    fn evict_expired(&self, timestamps: &mut VecDeque<Instant>, now: Instant) {
        let Some(cutoff) = now.checked_sub(self.inner.window) else {
            return;
        };
        while timestamps.front().is_some_and(|&ts| ts <= cutoff) {
            timestamps.pop_front();
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(60, Duration::from_secs(60))
    }
}
