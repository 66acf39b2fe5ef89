//! Page caching layer
//!
//! [`CachedSource`] puts a TTL page cache and a retry policy in front of any
//! [`PageSource`](crate::api::PageSource). Pages are stored bincode-encoded
//! in a [`MemoryCache`].

mod config;
mod memory;
mod source;

pub use config::*;
pub use memory::*;
pub use source::*;

use chrono::DateTime;
use chrono::Utc;

/// An encoded page and the moment it goes stale.
#[derive(Debug, Clone)]
pub struct CachedValue {
    pub data: Vec<u8>,
    pub expires_at: DateTime<Utc>,
}

impl CachedValue {
    /// Creates a value that expires `ttl` from now.
    pub fn with_ttl(data: Vec<u8>, ttl: std::time::Duration) -> Self {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        Self {
            data,
            expires_at: Utc::now().checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
