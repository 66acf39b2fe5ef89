//! Page type for paginated artwork listings.

use serde::Deserialize;
use serde::Serialize;

use crate::model::Artwork;
use crate::model::RecordId;

/// Number of pages needed to show `total_count` records at `page_size` per page.
///
/// # Example
///
/// ```
/// use artic_lib::api::page_count;
///
/// assert_eq!(page_count(25, 12), 3);
/// assert_eq!(page_count(24, 12), 2);
/// assert_eq!(page_count(0, 12), 0);
/// ```
pub fn page_count(total_count: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total_count.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// One fetch's worth of artworks plus the collection size.
///
/// # Example
///
/// ```
/// use artic_lib::api::Page;
/// use artic_lib::model::Artwork;
///
/// let page = Page::new(2, vec![Artwork::new(7), Artwork::new(9)], 25);
///
/// assert_eq!(page.number(), 2);
/// assert_eq!(page.ids().collect::<Vec<_>>(), vec![7, 9]);
/// assert_eq!(page.total_count(), 25);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// 1-indexed page number this page was fetched for.
    number: u32,
    records: Vec<Artwork>,
    /// Total record count across all pages.
    total_count: u64,
    /// Page size the server applied, if it reported one.
    limit: Option<u32>,
    /// Page count the server reported, if any.
    total_pages: Option<u32>,
}

impl Page {
    /// Creates a page from its records and the collection total.
    pub fn new(number: u32, records: Vec<Artwork>, total_count: u64) -> Self {
        Self {
            number,
            records,
            total_count,
            limit: None,
            total_pages: None,
        }
    }

    /// Sets the page size the server applied.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the page count the server reported.
    pub fn with_total_pages(mut self, total_pages: u32) -> Self {
        self.total_pages = Some(total_pages);
        self
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    /// Returns the records in server order.
    pub fn records(&self) -> &[Artwork] {
        &self.records
    }

    /// Consumes the page and returns the records.
    pub fn into_records(self) -> Vec<Artwork> {
        self.records
    }

    /// Returns the record identifiers in server order.
    pub fn ids(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.records.iter().map(|record| record.id)
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Returns the page size the server reported, if any.
    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    /// Returns the page count the server reported, if any.
    pub fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}
