use crate::domain::model::CacheEntry;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};

/// Key/value storage behind the response cache.
///
/// Stores hand back entries whether or not they have expired; freshness is
/// decided by the caller so that stale data can still be served when the
/// upstream API fails.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<CacheEntry>>;

    fn insert(&self, key: &str, entry: CacheEntry) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;

    fn clear(&self) -> Result<()>;

    /// Drops every entry expired at `now`, returning how many were removed.
    fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize>;

    fn len(&self) -> Result<usize>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn backend_name(&self) -> &'static str;
}
