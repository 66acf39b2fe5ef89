//! In-memory page store

use dashmap::DashMap;

use super::CachedValue;

/// Concurrent map from cache key to encoded page.
///
/// Expired entries are never returned; they are dropped when read and swept
/// whenever a new entry is stored.
#[derive(Debug, Default)]
pub struct MemoryCache {
    store: DashMap<String, CachedValue>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the live entry for `key`.
    pub fn get(&self, key: &str) -> Option<CachedValue> {
        let value = self.store.get(key)?.value().clone();
        if value.is_expired() {
            self.store.remove_if(key, |_, v| v.is_expired());
            return None;
        }
        Some(value)
    }

    /// Stores `value` under `key` and sweeps expired entries.
    pub fn insert(&self, key: impl Into<String>, value: CachedValue) {
        self.store.retain(|_, v| !v.is_expired());
        self.store.insert(key.into(), value);
    }

    pub fn remove(&self, key: &str) {
        self.store.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn live(data: &[u8]) -> CachedValue {
        CachedValue::with_ttl(data.to_vec(), Duration::from_secs(60))
    }

    fn expired(data: &[u8]) -> CachedValue {
        CachedValue::with_ttl(data.to_vec(), Duration::ZERO)
    }

    #[test]
    fn test_get_insert() {
        let cache = MemoryCache::new();
        cache.insert("a", live(b"one"));

        assert_eq!(cache.get("a").unwrap().data, b"one");
        assert!(cache.get("b").is_none());
    }

    #[test]
    fn test_expired_entry_is_not_returned() {
        let cache = MemoryCache::new();
        cache.insert("a", expired(b"stale"));

        assert!(cache.get("a").is_none());
        assert!(cache.store.is_empty());
    }

    #[test]
    fn test_insert_sweeps_expired() {
        let cache = MemoryCache::new();
        cache.store.insert("old".to_string(), expired(b"x"));

        cache.insert("new", live(b"y"));

        assert_eq!(cache.store.len(), 1);
        assert!(cache.get("new").is_some());
    }

    #[test]
    fn test_remove() {
        let cache = MemoryCache::new();
        cache.insert("a", live(&[1]));
        cache.insert("b", live(&[2]));

        cache.remove("a");
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());
    }
}
