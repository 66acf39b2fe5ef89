//! Table controller: the state a table view renders from.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::BulkSelectOutcome;
use crate::BulkSelectRequest;
use crate::BulkSelector;
use crate::Response;
use crate::SelectionStore;
use crate::api::Page;
use crate::api::PageSource;
use crate::api::page_count;
use crate::cache::CacheConfig;
use crate::cache::CachedSource;
use crate::error::Error;
use crate::error::ValidationError;
use crate::model::RecordId;
use crate::rate_limit::RetryConfig;

/// Owns the table state: current page, last fetched page, collection size,
/// the cross-page selection and the in-flight bulk select.
///
/// A view asks for [`get_current_page_data`](Self::get_current_page_data),
/// renders each row's checkbox from [`is_selected`](Self::is_selected), and
/// forwards checkbox, pagination and bulk-select input back here.
///
/// Rendering goes through a [`CachedSource`] over the fetcher, which by
/// default neither caches nor retries; see
/// [`with_cache_config`](Self::with_cache_config). Bulk select always uses the
/// fetcher itself, so every page it walks is fetched again.
///
/// # Example
///
/// ```ignore
/// let mut table = TableController::new(ArticClient::public()?)
///     .with_cache_config(CacheConfig::default())
///     .with_retry(RetryConfig::default());
///
/// let page = table.get_current_page_data().await?;
/// for artwork in page.records() {
///     println!("[{}] {}", if table.is_selected(artwork.id) { "x" } else { " " }, artwork.title());
/// }
///
/// let task = table.request_bulk_select("15".parse()?).await?;
/// let outcome = task.wait().await?;
/// ```
pub struct TableController<S> {
    source: Arc<S>,
    pages: CachedSource<Arc<S>>,
    selection: SelectionStore,
    current_page: u32,
    total_count: Option<u64>,
    /// Last page fetched, kept while the next one loads.
    current: Option<Response<Page>>,
    bulk_cancel: Option<CancellationToken>,
}

impl<S: PageSource + 'static> TableController<S> {
    /// Creates a controller on page 1 with an empty selection.
    pub fn new(source: S) -> Self {
        let source = Arc::new(source);
        let pages = CachedSource::new(Arc::clone(&source))
            .with_config(CacheConfig::no_cache())
            .with_retry(RetryConfig::no_retry());

        Self {
            source,
            pages,
            selection: SelectionStore::new(),
            current_page: 1,
            total_count: None,
            current: None,
            bulk_cancel: None,
        }
    }

    /// Caches rendered pages per `config`.
    pub fn with_cache_config(mut self, config: CacheConfig) -> Self {
        self.pages = self.pages.with_config(config);
        self
    }

    /// Retries failed page renders per `retry`.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.pages = self.pages.with_retry(retry);
        self
    }

    /// Returns the page fetcher.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the cached source pages are rendered from.
    pub fn pages(&self) -> &CachedSource<Arc<S>> {
        &self.pages
    }

    /// Fetches the current page and remembers it and the collection size.
    pub async fn get_current_page_data(&mut self) -> Result<&Page, Error> {
        let response = self.pages.fetch(self.current_page).await?;
        self.total_count = Some(response.data().total_count());
        Ok(self.current.insert(response).data())
    }

    /// Returns the last fetched page, which may belong to a previous page
    /// number if the current one has not loaded yet.
    pub fn current_data(&self) -> Option<&Page> {
        self.current.as_ref().map(Response::data)
    }

    /// Returns when the cached copy of the last fetched page goes stale, if
    /// it was served from the cache.
    pub fn current_cached_until(&self) -> Option<DateTime<Utc>> {
        self.current.as_ref().and_then(Response::cached_until)
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Moves to page `page`. The next [`get_current_page_data`] fetches it.
    ///
    /// Page numbers start at 1; once the collection size is known, pages past
    /// the last one are rejected.
    ///
    /// [`get_current_page_data`]: Self::get_current_page_data
    pub fn set_current_page(&mut self, page: u32) -> Result<(), ValidationError> {
        if page == 0 {
            return Err(ValidationError::InvalidPage);
        }
        if let Some(total_pages) = self.total_pages()
            && page > total_pages.max(1)
        {
            return Err(ValidationError::PageOutOfRange { page, total_pages });
        }

        if page != self.current_page {
            log::debug!("page {} -> {}", self.current_page, page);
        }
        self.current_page = page;
        Ok(())
    }

    pub fn next_page(&mut self) -> Result<(), ValidationError> {
        self.set_current_page(self.current_page.saturating_add(1))
    }

    pub fn previous_page(&mut self) -> Result<(), ValidationError> {
        self.set_current_page(self.current_page.saturating_sub(1))
    }

    /// Returns the collection size from the last fetch.
    pub fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    /// Returns the page count, once a page has been fetched.
    pub fn total_pages(&self) -> Option<u32> {
        self.total_count
            .map(|total| page_count(total, self.source.page_size()))
    }

    pub fn is_selected(&self, id: RecordId) -> bool {
        self.selection.is_selected(id)
    }

    /// Checks or unchecks `id`. Returns `true` if the selection changed.
    pub fn toggle_selection(&self, id: RecordId, on: bool) -> bool {
        self.selection.toggle(id, on)
    }

    /// Returns a snapshot of the selected ids.
    pub fn selected_ids(&self) -> HashSet<RecordId> {
        self.selection.selected_ids()
    }

    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }

    pub fn clear_selection(&self) {
        self.selection.clear();
    }

    /// Returns a handle to the selection shared with bulk-select tasks.
    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    /// Starts selecting `request.count()` rows from the first row of the
    /// current page, in the background.
    ///
    /// A bulk select still running from an earlier request is cancelled
    /// first; rows it already added stay selected. If no page has been
    /// fetched yet, the current page is fetched to learn the collection size.
    ///
    /// The walk fetches from the page fetcher directly: pages already on
    /// screen are fetched again, and failures are not retried.
    pub async fn request_bulk_select(
        &mut self,
        request: BulkSelectRequest,
    ) -> Result<BulkSelectTask, Error> {
        let total_count = match self.total_count {
            Some(total) => total,
            None => self.get_current_page_data().await?.total_count(),
        };

        self.cancel_bulk_select();

        let cancel = CancellationToken::new();
        self.bulk_cancel = Some(cancel.clone());

        let selector = BulkSelector::new(Arc::clone(&self.source), self.selection.clone());
        let start_page = self.current_page;
        let token = cancel.clone();
        let handle = tokio::spawn(async move {
            selector.run(request, start_page, total_count, &token).await
        });

        Ok(BulkSelectTask { cancel, handle })
    }

    /// Cancels the in-flight bulk select, if any.
    ///
    /// Returns `true` if there was one to cancel.
    pub fn cancel_bulk_select(&mut self) -> bool {
        match self.bulk_cancel.take() {
            Some(token) if !token.is_cancelled() => {
                token.cancel();
                true
            }
            _ => false,
        }
    }
}

/// Handle to a bulk select running in the background.
pub struct BulkSelectTask {
    cancel: CancellationToken,
    handle: JoinHandle<Result<BulkSelectOutcome, Error>>,
}

impl BulkSelectTask {
    /// Asks the walk to stop. Rows already added stay selected.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the walk to end and returns its outcome.
    pub async fn wait(mut self) -> Result<BulkSelectOutcome, Error> {
        self.join().await
    }

    /// Waits for the walk to end without consuming the handle.
    ///
    /// Safe to use in `select!`. Must not be called again once it returned.
    pub async fn join(&mut self) -> Result<BulkSelectOutcome, Error> {
        (&mut self.handle)
            .await
            .map_err(|e| Error::Task(e.to_string()))?
    }
}
