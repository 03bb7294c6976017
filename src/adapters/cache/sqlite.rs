use crate::domain::model::CacheEntry;
use crate::domain::ports::CacheStore;
use crate::utils::error::{HypixelError, Result};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Cache persisted to a SQLite file so it survives restarts.
pub struct SqliteCache {
    conn: Mutex<Connection>,
}

impl SqliteCache {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        tracing::debug!("Opened SQLite cache at {}", path.as_ref().display());
        Self::with_connection(conn)
    }

    pub fn in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS responses (
                key TEXT PRIMARY KEY,
                body TEXT NOT NULL,
                stored_at INTEGER NOT NULL,
                expires_at INTEGER
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_responses_expires_at ON responses(expires_at)",
            [],
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn from_millis(column: &str, millis: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| HypixelError::Cache {
        message: format!("invalid {} timestamp: {}", column, millis),
    })
}

impl CacheStore for SqliteCache {
    fn get(&self, key: &str) -> Result<Option<CacheEntry>> {
        let conn = self.conn.lock();
        let row = conn
            .query_row(
                "SELECT body, stored_at, expires_at FROM responses WHERE key = ?1",
                [key],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, Option<i64>>(2)?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some((body, stored_at, expires_at)) => Ok(Some(CacheEntry {
                body,
                stored_at: from_millis("stored_at", stored_at)?,
                expires_at: expires_at
                    .map(|millis| from_millis("expires_at", millis))
                    .transpose()?,
            })),
            None => Ok(None),
        }
    }

    fn insert(&self, key: &str, entry: CacheEntry) -> Result<()> {
        self.conn.lock().execute(
            "INSERT OR REPLACE INTO responses (key, body, stored_at, expires_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                key,
                entry.body,
                entry.stored_at.timestamp_millis(),
                entry.expires_at.map(|at| at.timestamp_millis())
            ],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.conn
            .lock()
            .execute("DELETE FROM responses WHERE key = ?1", [key])?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.conn.lock().execute("DELETE FROM responses", [])?;
        Ok(())
    }

    fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize> {
        let removed = self.conn.lock().execute(
            "DELETE FROM responses WHERE expires_at IS NOT NULL AND expires_at <= ?1",
            [now.timestamp_millis()],
        )?;
        Ok(removed)
    }

    fn len(&self) -> Result<usize> {
        let count: i64 =
            self.conn
                .lock()
                .query_row("SELECT COUNT(*) FROM responses", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}
