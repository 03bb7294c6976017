use crate::domain::model::CacheEntry;
use crate::domain::ports::CacheStore;
use crate::utils::error::{HypixelError, Result};
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use redis::{Client, Commands, Connection};

/// How long Redis keeps an entry after it expires, so stale data can still
/// be served while the upstream API is down.
pub const STALE_RETENTION_SECONDS: i64 = 86_400;

/// Cache kept in Redis, shareable between processes. Entries are stored as
/// JSON so their deadlines survive alongside the body.
pub struct RedisCache {
    conn: Mutex<Connection>,
    prefix: String,
}

impl RedisCache {
    pub fn open(url: &str, cache_name: &str) -> Result<Self> {
        let client = Client::open(url)?;
        let conn = client.get_connection()?;
        tracing::debug!("Connected to Redis cache at {}", url);
        Ok(Self {
            conn: Mutex::new(conn),
            prefix: key_prefix(cache_name),
        })
    }

    fn key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Every key under this cache's prefix.
    fn keys(&self, conn: &mut Connection) -> Result<Vec<String>> {
        let pattern = format!("{}*", escape_glob(&self.prefix));
        let keys = conn.scan_match::<_, String>(pattern)?.collect();
        Ok(keys)
    }
}

fn key_prefix(cache_name: &str) -> String {
    format!("hypixelio:{}:", cache_name)
}

fn escape_glob(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn encode(entry: &CacheEntry) -> Result<String> {
    Ok(serde_json::to_string(entry)?)
}

fn decode(raw: &str) -> Result<CacheEntry> {
    serde_json::from_str(raw).map_err(|e| HypixelError::Cache {
        message: format!("unreadable Redis entry: {}", e),
    })
}

/// Milliseconds Redis should keep the entry, or `None` to keep it forever.
fn retention_millis(entry: &CacheEntry, now: DateTime<Utc>) -> Option<u64> {
    let deadline = entry
        .expires_at?
        .checked_add_signed(Duration::seconds(STALE_RETENTION_SECONDS))?;
    let millis = deadline.signed_duration_since(now).num_milliseconds();
    Some(u64::try_from(millis).unwrap_or(0).max(1))
}

impl CacheStore for RedisCache {
    fn get(&self, key: &str) -> Result<Option<CacheEntry>> {
        let raw: Option<String> = self.conn.lock().get(self.key(key))?;
        raw.as_deref().map(decode).transpose()
    }

    fn insert(&self, key: &str, entry: CacheEntry) -> Result<()> {
        let value = encode(&entry)?;
        let mut conn = self.conn.lock();
        match retention_millis(&entry, Utc::now()) {
            Some(millis) => redis::cmd("SET")
                .arg(self.key(key))
                .arg(value)
                .arg("PX")
                .arg(millis)
                .query::<()>(&mut *conn)?,
            None => conn.set::<_, _, ()>(self.key(key), value)?,
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.conn.lock().del::<_, ()>(self.key(key))?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut conn = self.conn.lock();
        let keys = self.keys(&mut conn)?;
        if !keys.is_empty() {
            conn.del::<_, ()>(keys)?;
        }
        Ok(())
    }

    fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize> {
        let mut conn = self.conn.lock();
        let mut expired = Vec::new();
        for key in self.keys(&mut conn)? {
            let raw: Option<String> = conn.get(&key)?;
            let stale = match raw.as_deref().map(decode) {
                Some(Ok(entry)) => entry.is_expired(now),
                Some(Err(_)) => true,
                None => false,
            };
            if stale {
                expired.push(key);
            }
        }
        if !expired.is_empty() {
            conn.del::<_, ()>(&expired)?;
        }
        Ok(expired.len())
    }

    fn len(&self) -> Result<usize> {
        let mut conn = self.conn.lock();
        Ok(self.keys(&mut conn)?.len())
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
