//! Main ArticClient

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use reqwest::StatusCode;
use url::Url;

use crate::error::Error;
use crate::error::TransportError;
use crate::error::ValidationError;
use crate::error::MAX_PAGE_SIZE;
use crate::rate_limit::RateLimiter;

/// Base URL of the public Art Institute of Chicago API.
pub const DEFAULT_BASE_URL: &str = "https://api.artic.edu/api/v1";

/// Records per page when none is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Client for the artworks listing endpoint.
///
/// This client is cheap to clone (uses `Arc` internally) and can be shared
/// across tasks. It never retries; wrap it in a
/// [`CachedSource`](crate::cache::CachedSource) for caching and retry.
///
/// # Example
///
/// ```ignore
/// use artic_lib::ArticClient;
///
/// let client = ArticClient::builder()
///     .url("https://api.artic.edu/api/v1")
///     .page_size(12)
///     .build()?;
///
/// let page = client.fetch_page(1).await?;
/// println!("{} artworks in total", page.total_count());
/// ```
#[derive(Clone)]
pub struct ArticClient {
    inner: Arc<ArticClientInner>,
}

struct ArticClientInner {
    base_url: Url,
    page_size: u32,
    http_client: Client,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    rate_limiter: RateLimiter,
}

impl ArticClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> ArticClientBuilder<Missing> {
        ArticClientBuilder::new()
    }

    /// Creates a client for the public API with default settings.
    pub fn public() -> Result<Self, Error> {
        Self::builder().url(DEFAULT_BASE_URL).build()
    }

    /// Returns the base URL of the API.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Returns the configured page size.
    pub fn page_size(&self) -> u32 {
        self.inner.page_size
    }

    /// Sends a GET request for `url`.
    ///
    /// Waits for a rate limit slot first. Any non-success status is a
    /// [`TransportError`]; there is no retry at this level.
    pub(crate) async fn get(&self, url: Url) -> Result<reqwest::Response, Error> {
        self.inner.rate_limiter.acquire().await;

        log::debug!("GET {}", url);

        let mut request = self
            .inner
            .http_client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json");

        if let Some(agent) = &self.inner.user_agent {
            request = request.header("AIC-User-Agent", agent);
        }

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| self.map_send_error(e))?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = parse_retry_after(&response);
            log::warn!("rate limited by {} (retry after {:?})", url, retry_after);
            return Err(TransportError::TooManyRequests { retry_after }.into());
        }

        let body = response.text().await.unwrap_or_default();
        let message = if body.is_empty() {
            status.canonical_reason().unwrap_or("request failed").to_string()
        } else {
            body
        };
        log::warn!("GET {} failed with {}", url, status);
        Err(TransportError::http(status.as_u16(), message).into())
    }

    fn map_send_error(&self, error: reqwest::Error) -> Error {
        match self.inner.timeout {
            Some(timeout) if error.is_timeout() => TransportError::Timeout(timeout).into(),
            _ => TransportError::Network(error).into(),
        }
    }
}

impl std::fmt::Debug for ArticClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArticClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("page_size", &self.inner.page_size)
            .field("timeout", &self.inner.timeout)
            .finish()
    }
}

/// Parses the Retry-After header value (seconds).
fn parse_retry_after(response: &reqwest::Response) -> Option<Duration> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing an [`ArticClient`].
///
/// Uses the typestate pattern so `build` is only available once the base URL
/// has been set.
///
/// # Example
///
/// ```ignore
/// let client = ArticClient::builder()
///     .url("https://api.artic.edu/api/v1")
///     .page_size(12)
///     .timeout(Duration::from_secs(10))
///     .build()?;
/// ```
pub struct ArticClientBuilder<U> {
    url: U,
    page_size: u32,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    user_agent: Option<String>,
    rate_limiter: Option<RateLimiter>,
    http_client: Option<Client>,
}

impl ArticClientBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            page_size: DEFAULT_PAGE_SIZE,
            timeout: None,
            connect_timeout: None,
            user_agent: None,
            rate_limiter: None,
            http_client: None,
        }
    }

    /// Sets the API base URL, e.g. `https://api.artic.edu/api/v1`.
    pub fn url(self, url: impl Into<String>) -> ArticClientBuilder<Set<String>> {
        ArticClientBuilder {
            url: Set(url.into()),
            page_size: self.page_size,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            user_agent: self.user_agent,
            rate_limiter: self.rate_limiter,
            http_client: self.http_client,
        }
    }
}

impl Default for ArticClientBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> ArticClientBuilder<U> {
    /// Sets the number of records per page.
    ///
    /// Defaults to 12. Must be between 1 and 100.
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets the `AIC-User-Agent` header the API asks callers to send.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Shares a rate limiter with other clients.
    ///
    /// Defaults to [`RateLimiter::default`].
    pub fn rate_limiter(mut self, limiter: RateLimiter) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl ArticClientBuilder<Set<String>> {
    /// Builds the [`ArticClient`].
    ///
    /// Fails if the URL does not parse, the page size is out of range, or the
    /// HTTP client cannot be created.
    pub fn build(self) -> Result<ArticClient, Error> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ValidationError::InvalidPageSize(self.page_size).into());
        }

        let base_url = Url::parse(&self.url.0)
            .map_err(|e| TransportError::InvalidUrl(format!("{}: {}", self.url.0, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(TransportError::InvalidUrl(self.url.0).into());
        }

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build().map_err(TransportError::Network)?
            }
        };

        Ok(ArticClient {
            inner: Arc::new(ArticClientInner {
                base_url,
                page_size: self.page_size,
                http_client,
                timeout: self.timeout,
                user_agent: self.user_agent,
                rate_limiter: self.rate_limiter.unwrap_or_default(),
            }),
        })
    }
}
