//! Cached, retrying page source.

use std::time::Duration;

use async_trait::async_trait;

use super::CacheConfig;
use super::CachedValue;
use super::MemoryCache;
use crate::api::Page;
use crate::api::PageSource;
use crate::error::Error;
use crate::error::TransportError;
use crate::rate_limit::RetryConfig;
use crate::response::CacheStatus;
use crate::response::Response;

/// Puts a page cache and a retry policy in front of another [`PageSource`].
///
/// Pages are cached by page number and page size for `CacheConfig::page_ttl`.
/// Transient failures (429, 5xx, network) are retried with exponential
/// backoff according to [`RetryConfig`]; anything else is returned at once.
/// A 429 that outlasts the retries surfaces as [`Error::RateLimited`].
///
/// # Example
///
/// ```ignore
/// use artic_lib::ArticClient;
/// use artic_lib::cache::{CacheConfig, CachedSource};
///
/// let source = CachedSource::new(ArticClient::public()?)
///     .with_config(CacheConfig::default().with_page_ttl(Duration::from_secs(60)));
///
/// let response = source.fetch(1).await?;
/// if let Some(until) = response.cached_until() {
///     println!("page 1 served from cache until {}", until);
/// }
/// ```
pub struct CachedSource<S> {
    source: S,
    cache: MemoryCache,
    config: CacheConfig,
    retry: RetryConfig,
}

impl<S: PageSource> CachedSource<S> {
    /// Wraps `source` with an in-memory cache and default retry policy.
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: MemoryCache::new(),
            config: CacheConfig::default(),
            retry: RetryConfig::default(),
        }
    }

    pub fn with_config(mut self, config: CacheConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Returns the wrapped source.
    pub fn inner(&self) -> &S {
        &self.source
    }

    /// Fetches `page`, from cache when a fresh copy exists.
    pub async fn fetch(&self, page: u32) -> Result<Response<Page>, Error> {
        if !self.config.is_enabled() {
            let data = self.fetch_with_retry(page).await?;
            return Ok(Response::new(data, CacheStatus::Bypassed));
        }

        let key = self.cache_key(page);
        if let Some(cached) = self.cache.get(&key) {
            match bincode::deserialize::<Page>(&cached.data) {
                Ok(data) => {
                    log::debug!("page {} served from cache", page);
                    let status = CacheStatus::Hit {
                        expires_at: cached.expires_at,
                    };
                    return Ok(Response::new(data, status));
                }
                Err(e) => {
                    log::warn!("dropping undecodable cache entry {}: {}", key, e);
                    self.cache.remove(&key);
                }
            }
        }

        let data = self.fetch_with_retry(page).await?;

        match bincode::serialize(&data) {
            Ok(bytes) => {
                self.cache
                    .insert(key, CachedValue::with_ttl(bytes, self.config.page_ttl));
                Ok(Response::new(data, CacheStatus::Stored))
            }
            Err(e) => {
                log::warn!("could not cache page {}: {}", page, e);
                Ok(Response::new(data, CacheStatus::Bypassed))
            }
        }
    }

    /// Drops the cached copy of `page`.
    pub fn invalidate(&self, page: u32) {
        self.cache.remove(&self.cache_key(page));
    }

    async fn fetch_with_retry(&self, page: u32) -> Result<Page, Error> {
        let mut attempts = 0;
        let mut delay = self.retry.initial_delay;

        loop {
            match self.source.fetch_page(page).await {
                Ok(data) => return Ok(data),
                Err(e) if self.retry.should_retry(&e, attempts) => {
                    let wait: Duration = self.retry.wait_for(&e, delay);
                    attempts += 1;
                    log::warn!(
                        "page {} failed ({}), retry {}/{} in {:?}",
                        page,
                        e,
                        attempts,
                        self.retry.max_retries,
                        wait
                    );
                    tokio::time::sleep(wait).await;
                    delay = self.retry.next_delay(delay);
                }
                Err(Error::Transport(TransportError::TooManyRequests { retry_after })) => {
                    log::warn!("page {} still rate limited after {} retries", page, attempts);
                    return Err(Error::RateLimited { retry_after });
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn cache_key(&self, page: u32) -> String {
        format!("artworks:{}:{}", self.source.page_size(), page)
    }
}

#[async_trait]
impl<S: PageSource> PageSource for CachedSource<S> {
    async fn fetch_page(&self, page: u32) -> Result<Page, Error> {
        self.fetch(page).await.map(Response::into_inner)
    }

    fn page_size(&self) -> u32 {
        self.source.page_size()
    }
}
