//! Validation error types

/// Largest page size the artworks endpoint accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Input rejected before any request is made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Bulk-select count below 1.
    #[error("Row count must be at least 1, got {0}")]
    InvalidCount(i64),

    /// Bulk-select count that does not parse as an integer.
    #[error("Row count is not a number: {0:?}")]
    NotANumber(String),

    /// Page numbers are 1-indexed.
    #[error("Page numbers start at 1")]
    InvalidPage,

    /// Page past the last page of the collection.
    #[error("Page {page} is out of range (1..={total_pages})")]
    PageOutOfRange {
        /// The requested page.
        page: u32,
        /// The number of pages currently known.
        total_pages: u32,
    },

    /// Page size outside what the API serves.
    #[error("Page size must be between 1 and 100, got {0}")]
    InvalidPageSize(u32),
}
