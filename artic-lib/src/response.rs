//! Fetched pages tagged with their cache status.

use chrono::DateTime;
use chrono::Utc;

/// A fetched value and whether the page cache served it.
///
/// Returned by [`CachedSource::fetch`](crate::cache::CachedSource::fetch);
/// [`TableController`](crate::TableController) keeps the one for the page on
/// screen so a view can mark cached pages.
#[derive(Debug, Clone)]
pub struct Response<T> {
    data: T,
    cache: CacheStatus,
}

impl<T> Response<T> {
    pub(crate) fn new(data: T, cache: CacheStatus) -> Self {
        Self { data, cache }
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn into_inner(self) -> T {
        self.data
    }

    pub fn cache_status(&self) -> CacheStatus {
        self.cache
    }

    /// Returns when the cached copy goes stale, if this came from the cache.
    pub fn cached_until(&self) -> Option<DateTime<Utc>> {
        match self.cache {
            CacheStatus::Hit { expires_at } => Some(expires_at),
            CacheStatus::Bypassed | CacheStatus::Stored => None,
        }
    }
}

/// Where a [`Response`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Caching is disabled; the page was fetched.
    Bypassed,
    /// The page was fetched and stored for later requests.
    Stored,
    /// The page was served from the cache.
    Hit { expires_at: DateTime<Utc> },
}
