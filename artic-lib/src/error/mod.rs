//! Error types

mod transport;
mod validation;

pub use transport::*;
pub use validation::*;

use std::time::Duration;

use crate::bulk::BulkSelectOutcome;

/// Errors returned by the artwork table library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The remote record source could not be reached or answered badly.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Input rejected before any work was done.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The API kept answering 429 after the page cache's retry budget was
    /// spent. The plain client reports a 429 as
    /// [`TransportError::TooManyRequests`] instead.
    #[error("Rate limited (retry after {retry_after:?})")]
    RateLimited {
        /// Value of the `Retry-After` header, if the server sent one.
        retry_after: Option<Duration>,
    },

    /// A bulk-select walk aborted part way through.
    ///
    /// Identifiers selected from earlier pages stay selected; `progress`
    /// describes what was done before the failure.
    #[error("Bulk selection stopped at page {page}: {source}")]
    BulkSelect {
        /// The page whose fetch failed.
        page: u32,
        /// What the walk achieved before failing.
        progress: BulkSelectOutcome,
        /// The underlying fetch error.
        #[source]
        source: Box<Error>,
    },

    /// A background bulk-select task panicked or was aborted.
    #[error("Background task failed: {0}")]
    Task(String),
}

impl Error {
    /// Returns `true` if retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_retryable(),
            Self::RateLimited { .. } => true,
            _ => false,
        }
    }

    /// Returns the transport error at the root of this error, if any.
    pub fn transport(&self) -> Option<&TransportError> {
        match self {
            Self::Transport(e) => Some(e),
            Self::BulkSelect { source, .. } => source.transport(),
            _ => None,
        }
    }

    /// Returns the HTTP status code if this error came from an HTTP response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::RateLimited { .. } => Some(429),
            _ => self.transport().and_then(TransportError::status_code),
        }
    }
}
