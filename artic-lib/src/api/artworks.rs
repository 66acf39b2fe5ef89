//! Artworks listing: the page fetcher.

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use super::Page;
use super::PageSource;
use crate::ArticClient;
use crate::error::Error;
use crate::error::TransportError;
use crate::error::ValidationError;
use crate::model::Artwork;

impl ArticClient {
    /// Fetches one page of the artworks listing.
    ///
    /// Issues `GET {base}/artworks?page={page}&limit={page_size}&fields=...`
    /// and translates the response into a [`Page`]. Transport failures are
    /// returned as they are; nothing is retried or cached here.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let page = client.fetch_page(1).await?;
    /// for artwork in page.records() {
    ///     println!("{} {}", artwork.id, artwork.title());
    /// }
    /// ```
    pub async fn fetch_page(&self, page: u32) -> Result<Page, Error> {
        if page == 0 {
            return Err(ValidationError::InvalidPage.into());
        }

        let url = artworks_url(self.base_url(), page, self.page_size())?;
        let response = self.get(url).await?;

        let body = response.text().await.map_err(TransportError::Network)?;
        let listing: ArtworksResponse = serde_json::from_str(&body).map_err(|e| {
            TransportError::parse_with_body(format!("artworks page {}: {}", page, e), body.clone())
        })?;

        log::debug!(
            "page {} returned {} records of {}",
            page,
            listing.data.len(),
            listing.pagination.total
        );

        let mut result = Page::new(page, listing.data, listing.pagination.total);
        if let Some(limit) = listing.pagination.limit {
            result = result.with_limit(limit);
        }
        if let Some(total_pages) = listing.pagination.total_pages {
            result = result.with_total_pages(total_pages);
        }
        Ok(result)
    }
}

#[async_trait]
impl PageSource for ArticClient {
    async fn fetch_page(&self, page: u32) -> Result<Page, Error> {
        ArticClient::fetch_page(self, page).await
    }

    fn page_size(&self) -> u32 {
        ArticClient::page_size(self)
    }
}

/// Builds the listing URL for `page` under `base`.
pub(crate) fn artworks_url(base: &Url, page: u32, page_size: u32) -> Result<Url, TransportError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| TransportError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .push("artworks");

    url.query_pairs_mut()
        .append_pair("page", &page.to_string())
        .append_pair("limit", &page_size.to_string())
        .append_pair("fields", &Artwork::FIELDS.join(","));

    Ok(url)
}

/// Response body of the artworks listing.
#[derive(Debug, Deserialize)]
struct ArtworksResponse {
    data: Vec<Artwork>,
    pagination: Pagination,
}

/// Pagination block of a listing response.
#[derive(Debug, Deserialize)]
struct Pagination {
    total: u64,
    #[serde(default)]
    limit: Option<u32>,
    #[serde(default)]
    total_pages: Option<u32>,
}
