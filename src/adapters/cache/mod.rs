mod memory;
#[cfg(feature = "redis-cache")]
mod redis_cache;
#[cfg(feature = "sqlite-cache")]
mod sqlite;

pub use memory::MemoryCache;
#[cfg(feature = "redis-cache")]
pub use redis_cache::RedisCache;
#[cfg(feature = "sqlite-cache")]
pub use sqlite::SqliteCache;

use crate::config::{CacheBackendKind, CacheConfig};
use crate::domain::model::CacheEntry;
use crate::domain::ports::CacheStore;
use crate::utils::error::{HypixelError, Result};
use chrono::{Duration, Utc};
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// TTL policy in front of a [`CacheStore`], shared by every client and
/// converter built from the same configuration.
#[derive(Clone)]
pub struct ResponseCache {
    store: Arc<dyn CacheStore>,
    ttl: Option<Duration>,
    old_data_on_error: bool,
}

impl fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseCache")
            .field("backend", &self.store.backend_name())
            .field("ttl", &self.ttl)
            .field("old_data_on_error", &self.old_data_on_error)
            .finish()
    }
}

fn ttl_from_seconds(seconds: u64) -> Result<Duration> {
    i64::try_from(seconds)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or_else(|| HypixelError::InvalidConfigValueError {
            field: "cache.expire_after_seconds".to_string(),
            value: seconds.to_string(),
            reason: "Value is too large for a cache lifetime".to_string(),
        })
}

impl ResponseCache {
    pub fn new(store: Arc<dyn CacheStore>, ttl: Option<Duration>, old_data_on_error: bool) -> Self {
        Self {
            store,
            ttl,
            old_data_on_error,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        let store: Arc<dyn CacheStore> = match config.backend {
            CacheBackendKind::Memory => {
                let capacity = NonZeroUsize::new(config.max_entries).ok_or_else(|| {
                    HypixelError::InvalidConfigValueError {
                        field: "cache.max_entries".to_string(),
                        value: config.max_entries.to_string(),
                        reason: "Value must be at least 1".to_string(),
                    }
                })?;
                Arc::new(MemoryCache::new(capacity))
            }
            #[cfg(feature = "sqlite-cache")]
            CacheBackendKind::Sqlite => Arc::new(SqliteCache::open(config.sqlite_path())?),
            #[cfg(not(feature = "sqlite-cache"))]
            CacheBackendKind::Sqlite => {
                return Err(HypixelError::ConfigError {
                    message: "the sqlite cache backend requires the `sqlite-cache` feature"
                        .to_string(),
                })
            }
            #[cfg(feature = "redis-cache")]
            CacheBackendKind::Redis => {
                Arc::new(RedisCache::open(&config.redis_url, &config.cache_name)?)
            }
            #[cfg(not(feature = "redis-cache"))]
            CacheBackendKind::Redis => {
                return Err(HypixelError::ConfigError {
                    message: "the redis cache backend requires the `redis-cache` feature"
                        .to_string(),
                })
            }
        };

        let ttl = config.expire_after_seconds.map(ttl_from_seconds).transpose()?;

        tracing::debug!(
            "Response cache enabled: backend={}, ttl={:?}",
            store.backend_name(),
            ttl
        );
        Ok(Self::new(store, ttl, config.old_data_on_error))
    }

    /// Body stored under `key` if it has not expired yet.
    pub fn fresh(&self, key: &str) -> Result<Option<String>> {
        let now = Utc::now();
        Ok(self
            .store
            .get(key)?
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.body))
    }

    /// Body stored under `key` regardless of expiry, but only when stale
    /// fallback is enabled.
    pub fn stale(&self, key: &str) -> Result<Option<String>> {
        if !self.old_data_on_error {
            return Ok(None);
        }
        Ok(self.store.get(key)?.map(|entry| entry.body))
    }

    pub fn store(&self, key: &str, body: &str) -> Result<()> {
        self.store
            .insert(key, CacheEntry::new(body, self.ttl, Utc::now()))
    }

    pub fn invalidate(&self, key: &str) -> Result<()> {
        self.store.remove(key)
    }

    pub fn clear(&self) -> Result<()> {
        self.store.clear()
    }

    pub fn purge_expired(&self) -> Result<usize> {
        self.store.purge_expired(Utc::now())
    }

    pub fn len(&self) -> Result<usize> {
        self.store.len()
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.store.is_empty()
    }

    pub fn serves_stale(&self) -> bool {
        self.old_data_on_error
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(ttl: Option<Duration>, old_data_on_error: bool) -> ResponseCache {
        let store = Arc::new(MemoryCache::new(NonZeroUsize::new(8).unwrap()));
        ResponseCache::new(store, ttl, old_data_on_error)
    }

    #[test]
    fn test_fresh_and_stale_lookups() {
        let cache = cache(Some(Duration::seconds(-1)), true);
        cache.store("k", "{\"a\":1}").unwrap();

        assert_eq!(cache.fresh("k").unwrap(), None);
        assert_eq!(cache.stale("k").unwrap().as_deref(), Some("{\"a\":1}"));
        assert_eq!(cache.purge_expired().unwrap(), 1);
        assert!(cache.is_empty().unwrap());
    }

    #[test]
    fn test_stale_disabled() {
        let cache = cache(Some(Duration::seconds(-1)), false);
        cache.store("k", "{}").unwrap();
        assert_eq!(cache.stale("k").unwrap(), None);
    }

    #[test]
    fn test_no_ttl_never_expires() {
        let cache = cache(None, false);
        cache.store("k", "{}").unwrap();
        assert_eq!(cache.fresh("k").unwrap().as_deref(), Some("{}"));
        cache.invalidate("k").unwrap();
        assert_eq!(cache.fresh("k").unwrap(), None);
    }

    #[test]
    fn test_from_config_rejects_unrepresentable_ttl() {
        let config = CacheConfig::memory().with_expire_after(Some(u64::MAX));
        assert!(matches!(
            ResponseCache::from_config(&config),
            Err(HypixelError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_huge_ttl_is_stored_without_deadline_overflow() {
        let cache = cache(Some(Duration::seconds(10_000_000_000_000)), true);
        cache.store("k", "{}").unwrap();
        assert_eq!(cache.fresh("k").unwrap().as_deref(), Some("{}"));
    }

    #[cfg(not(feature = "redis-cache"))]
    #[test]
    fn test_redis_backend_needs_its_feature() {
        let config = CacheConfig::redis("hypixel", "redis://127.0.0.1/");
        assert!(matches!(
            ResponseCache::from_config(&config),
            Err(HypixelError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_from_config_rejects_zero_capacity() {
        let mut config = CacheConfig::memory();
        config.max_entries = 0;
        assert!(ResponseCache::from_config(&config).is_err());
    }
}
