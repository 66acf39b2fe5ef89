//! Shared test fixtures.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::Notify;

use artic_lib::api::Page;
use artic_lib::api::PageSource;
use artic_lib::error::Error;
use artic_lib::error::TransportError;
use artic_lib::model::Artwork;
use artic_lib::model::RecordId;

/// First record id; ids are `FIRST_ID + position` across the collection.
pub const FIRST_ID: RecordId = 1000;

/// In-memory collection of `total` artworks served `page_size` at a time.
pub struct MemorySource {
    total: u64,
    page_size: u32,
    failing: HashSet<u32>,
    gate: Option<(u32, Arc<Notify>)>,
    fetches: Mutex<Vec<u32>>,
}

impl MemorySource {
    pub fn new(total: u64, page_size: u32) -> Self {
        Self {
            total,
            page_size,
            failing: HashSet::new(),
            gate: None,
            fetches: Mutex::new(Vec::new()),
        }
    }

    /// Makes every fetch of `page` fail with HTTP 503.
    pub fn failing_on(mut self, page: u32) -> Self {
        self.failing.insert(page);
        self
    }

    /// Makes fetches of `page` wait until `gate` is notified.
    pub fn gated_on(mut self, page: u32, gate: Arc<Notify>) -> Self {
        self.gate = Some((page, gate));
        self
    }

    /// Pages requested so far, in request order.
    pub fn fetches(&self) -> Vec<u32> {
        self.fetches.lock().unwrap().clone()
    }

    /// Ids on `page`, in server order.
    pub fn ids_on_page(&self, page: u32) -> Vec<RecordId> {
        let start = u64::from(page - 1) * u64::from(self.page_size);
        let end = (start + u64::from(self.page_size)).min(self.total);
        (start..end).map(|pos| FIRST_ID + pos).collect()
    }
}

#[async_trait]
impl PageSource for MemorySource {
    async fn fetch_page(&self, page: u32) -> Result<Page, Error> {
        self.fetches.lock().unwrap().push(page);

        if let Some((gated, gate)) = &self.gate
            && *gated == page
        {
            gate.notified().await;
        }

        if self.failing.contains(&page) {
            return Err(TransportError::http(503, "Service Unavailable").into());
        }

        let records = self.ids_on_page(page).into_iter().map(Artwork::new).collect();
        Ok(Page::new(page, records, self.total))
    }

    fn page_size(&self) -> u32 {
        self.page_size
    }
}

/// Yields until `source` has been asked for `page`.
pub async fn wait_for_fetch(source: &MemorySource, page: u32) {
    while !source.fetches().contains(&page) {
        tokio::task::yield_now().await;
    }
}
