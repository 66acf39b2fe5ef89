//! Bulk selection across pages.
//!
//! Selecting "the next N rows" from the page on screen may need rows from the
//! pages after it. [`BulkSelector`] walks forward one page at a time, taking
//! the first rows of each page in server order until N rows were taken or
//! the collection runs out.

use std::str::FromStr;

use tokio_util::sync::CancellationToken;

use crate::SelectionStore;
use crate::api::PageSource;
use crate::api::page_count;
use crate::error::Error;
use crate::error::ValidationError;
use crate::model::RecordId;

/// A validated request to select `count` rows.
///
/// # Example
///
/// ```
/// use artic_lib::BulkSelectRequest;
///
/// let request: BulkSelectRequest = " 15 ".parse().unwrap();
/// assert_eq!(request.count(), 15);
///
/// assert!("0".parse::<BulkSelectRequest>().is_err());
/// assert!("many".parse::<BulkSelectRequest>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkSelectRequest {
    count: u64,
}

impl BulkSelectRequest {
    /// Creates a request for `count` rows. `count` must be at least 1.
    pub fn new(count: i64) -> Result<Self, ValidationError> {
        match u64::try_from(count) {
            Ok(count) if count >= 1 => Ok(Self { count }),
            _ => Err(ValidationError::InvalidCount(count)),
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

impl FromStr for BulkSelectRequest {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let count = trimmed
            .parse::<i64>()
            .map_err(|_| ValidationError::NotANumber(trimmed.to_string()))?;
        Self::new(count)
    }
}

impl TryFrom<i64> for BulkSelectRequest {
    type Error = ValidationError;

    fn try_from(count: i64) -> Result<Self, Self::Error> {
        Self::new(count)
    }
}

/// What a bulk-select walk did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkSelectOutcome {
    /// Rows requested.
    pub requested: u64,
    /// Ids taken, in the order they were added.
    pub taken: Vec<RecordId>,
    /// Pages fetched successfully.
    pub pages_fetched: u32,
    /// Rows still missing when the walk stopped.
    pub remaining: u64,
    /// `true` if the walk stopped because it was cancelled.
    pub cancelled: bool,
}

impl BulkSelectOutcome {
    fn new(requested: u64) -> Self {
        Self {
            requested,
            remaining: requested,
            ..Default::default()
        }
    }

    /// Returns `true` if every requested row was selected.
    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }
}

/// Walks pages forward from a start page, selecting the first N rows.
///
/// Pages are fetched one at a time and in increasing order, because how many
/// rows to take from a page depends on how many earlier pages supplied. Each
/// page is fetched through the source even if it was shown before.
///
/// # Example
///
/// ```ignore
/// let selector = BulkSelector::new(source, selection.clone());
/// let request = BulkSelectRequest::new(15)?;
///
/// let outcome = selector
///     .run(request, 1, 25, &CancellationToken::new())
///     .await?;
/// assert_eq!(outcome.taken.len(), 15);
/// ```
pub struct BulkSelector<S> {
    source: S,
    selection: SelectionStore,
}

impl<S: PageSource> BulkSelector<S> {
    pub fn new(source: S, selection: SelectionStore) -> Self {
        Self { source, selection }
    }

    /// Selects `request.count()` rows starting at the first row of `start_page`.
    ///
    /// `total_count` is the collection size from the last fetch; it bounds the
    /// walk at `ceil(total_count / page_size)` pages. Running out of pages is
    /// not an error: the outcome reports what is still `remaining`.
    ///
    /// If a page fetch fails the walk stops and returns
    /// [`Error::BulkSelect`]; rows added from earlier pages stay selected.
    /// Cancelling `cancel` stops the walk before its next fetch (or abandons
    /// the fetch in flight) and returns the outcome with `cancelled` set.
    pub async fn run(
        &self,
        request: BulkSelectRequest,
        start_page: u32,
        total_count: u64,
        cancel: &CancellationToken,
    ) -> Result<BulkSelectOutcome, Error> {
        if start_page == 0 {
            return Err(ValidationError::InvalidPage.into());
        }

        let total_pages = page_count(total_count, self.source.page_size());
        let mut outcome = BulkSelectOutcome::new(request.count());
        let mut page = start_page;

        log::info!(
            "bulk select of {} rows from page {} ({} pages)",
            request.count(),
            start_page,
            total_pages
        );

        while outcome.remaining > 0 && page <= total_pages {
            let fetched = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    outcome.cancelled = true;
                    break;
                }
                result = self.source.fetch_page(page) => result,
            };

            let fetched = match fetched {
                Ok(fetched) => fetched,
                Err(e) => {
                    log::warn!(
                        "bulk select stopped at page {} after {} rows: {}",
                        page,
                        outcome.taken.len(),
                        e
                    );
                    return Err(Error::BulkSelect {
                        page,
                        progress: outcome,
                        source: Box::new(e),
                    });
                }
            };

            let take = outcome.remaining.min(fetched.len() as u64) as usize;
            let ids: Vec<RecordId> = fetched.ids().take(take).collect();
            self.selection.extend(ids.iter().copied());

            outcome.taken.extend(ids);
            outcome.remaining -= take as u64;
            outcome.pages_fetched += 1;
            page += 1;
        }

        if outcome.cancelled {
            log::info!("bulk select cancelled after {} rows", outcome.taken.len());
        } else {
            log::info!(
                "bulk select finished: {} of {} rows",
                outcome.taken.len(),
                outcome.requested
            );
        }

        Ok(outcome)
    }
}
