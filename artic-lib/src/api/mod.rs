//! Web API operations

mod artworks;
mod page;
mod source;

pub use page::*;
pub use source::*;
