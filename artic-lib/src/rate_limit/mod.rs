//! Rate limiting and retry configuration.

mod limiter;
mod retry;

pub use limiter::RateLimiter;
pub use retry::RetryConfig;
