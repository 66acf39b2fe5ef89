//! The page source seam.

use std::sync::Arc;

use async_trait::async_trait;

use super::Page;
use crate::error::Error;

/// Anything that can produce a numbered page of artworks.
///
/// [`ArticClient`](crate::ArticClient) talks to the remote API;
/// [`CachedSource`](crate::cache::CachedSource) wraps another source with a
/// page cache and retry. Implementations must not mutate selection state.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches the 1-indexed `page`.
    async fn fetch_page(&self, page: u32) -> Result<Page, Error>;

    /// Number of records per full page.
    fn page_size(&self) -> u32;
}

#[async_trait]
impl<S: PageSource + ?Sized> PageSource for Arc<S> {
    async fn fetch_page(&self, page: u32) -> Result<Page, Error> {
        (**self).fetch_page(page).await
    }

    fn page_size(&self) -> u32 {
        (**self).page_size()
    }
}
