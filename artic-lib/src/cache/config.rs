//! Cache configuration

use std::time::Duration;

/// Configuration for page cache TTL.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use artic_lib::cache::CacheConfig;
///
/// let config = CacheConfig::default().with_page_ttl(Duration::from_secs(60));
/// assert!(config.is_enabled());
/// assert!(!CacheConfig::no_cache().is_enabled());
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// How long a fetched page is served from cache.
    ///
    /// Default: 5 minutes
    pub page_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            page_ttl: Duration::from_secs(300),
        }
    }
}

impl CacheConfig {
    /// Creates a new cache config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page TTL.
    pub fn with_page_ttl(mut self, ttl: Duration) -> Self {
        self.page_ttl = ttl;
        self
    }

    /// Creates a config with no caching (zero TTL).
    pub fn no_cache() -> Self {
        Self {
            page_ttl: Duration::ZERO,
        }
    }

    /// Returns `false` when pages are never cached.
    pub fn is_enabled(&self) -> bool {
        !self.page_ttl.is_zero()
    }
}
