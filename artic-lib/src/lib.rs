//! Artwork table library
//!
//! Async building blocks for a paginated artwork table with a selection that
//! spans pages: a page fetcher for the Art Institute of Chicago artworks
//! listing, a caching and retrying page source, the cross-page selection
//! store, and a bulk selector that walks forward across pages.

pub mod api;
pub mod cache;
pub mod error;
pub mod model;
pub mod rate_limit;

mod bulk;
mod client;
mod response;
mod selection;
mod table;

pub use bulk::*;
pub use client::*;
pub use response::CacheStatus;
pub use response::Response;
pub use selection::SelectionStore;
pub use table::*;
