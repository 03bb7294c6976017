use crate::domain::model::CacheEntry;
use crate::domain::ports::CacheStore;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;

/// In-process cache; the least recently used entry is evicted once
/// `capacity` is reached.
pub struct MemoryCache {
    entries: Mutex<LruCache<String, CacheEntry>>,
}

impl MemoryCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<CacheEntry>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn insert(&self, key: &str, entry: CacheEntry) -> Result<()> {
        self.entries.lock().put(key.to_string(), entry);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().pop(key);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.entries.lock().clear();
        Ok(())
    }

    fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize> {
        let mut entries = self.entries.lock();
        let expired: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            entries.pop(key);
        }
        Ok(expired.len())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.entries.lock().len())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
