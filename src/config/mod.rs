#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_range,
    validate_url, validate_url_scheme, Validate,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_HYPIXEL_API_URL: &str = "https://api.hypixel.net/v2";
pub const DEFAULT_MOJANG_API_URL: &str = "https://api.mojang.com";
pub const DEFAULT_CRAFATAR_URL: &str = "https://crafatar.com";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
/// Ten years; anything longer is better expressed as "never expires".
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1/";
pub const MAX_EXPIRE_AFTER_SECONDS: u64 = 315_360_000;

pub fn default_user_agent() -> String {
    format!(
        "hypixelio/{} (+https://github.com/janaSunrise/HypixelIO)",
        env!("CARGO_PKG_VERSION")
    )
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackendKind {
    #[default]
    Memory,
    Sqlite,
    Redis,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: CacheBackendKind,
    /// Cache name; the SQLite backend stores into `{cache_name}.sqlite`.
    pub cache_name: String,
    /// Seconds until an entry expires. `None` keeps entries forever.
    pub expire_after_seconds: Option<u64>,
    /// Serve expired entries when the upstream API fails.
    pub old_data_on_error: bool,
    /// Capacity of the in-memory backend.
    pub max_entries: usize,
    /// Server used by the Redis backend. Keys are namespaced by `cache_name`.
    pub redis_url: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackendKind::Memory,
            cache_name: "cache".to_string(),
            expire_after_seconds: Some(30),
            old_data_on_error: true,
            max_entries: 1024,
            redis_url: DEFAULT_REDIS_URL.to_string(),
        }
    }
}

impl CacheConfig {
    pub fn memory() -> Self {
        Self::default()
    }

    pub fn sqlite(cache_name: impl Into<String>) -> Self {
        Self {
            backend: CacheBackendKind::Sqlite,
            cache_name: cache_name.into(),
            ..Self::default()
        }
    }

    pub fn redis(cache_name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            backend: CacheBackendKind::Redis,
            cache_name: cache_name.into(),
            redis_url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_expire_after(mut self, seconds: Option<u64>) -> Self {
        self.expire_after_seconds = seconds;
        self
    }

    pub fn with_old_data_on_error(mut self, enabled: bool) -> Self {
        self.old_data_on_error = enabled;
        self
    }

    pub fn sqlite_path(&self) -> String {
        format!("{}.sqlite", self.cache_name)
    }
}

impl Validate for CacheConfig {
    fn validate(&self) -> Result<()> {
        validate_path("cache.cache_name", &self.cache_name)?;
        validate_positive_number("cache.max_entries", self.max_entries, 1)?;
        if self.backend == CacheBackendKind::Redis {
            validate_url_scheme("cache.redis_url", &self.redis_url, &["redis", "rediss"])?;
        }
        if let Some(seconds) = self.expire_after_seconds {
            validate_range(
                "cache.expire_after_seconds",
                seconds,
                0,
                MAX_EXPIRE_AFTER_SECONDS,
            )?;
        }
        Ok(())
    }
}

/// Settings shared by the async and blocking clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_keys: Vec<String>,
    pub hypixel_api_url: String,
    pub mojang_api_url: String,
    pub crafatar_url: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
    pub cache: Option<CacheConfig>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_keys: Vec::new(),
            hypixel_api_url: DEFAULT_HYPIXEL_API_URL.to_string(),
            mojang_api_url: DEFAULT_MOJANG_API_URL.to_string(),
            crafatar_url: DEFAULT_CRAFATAR_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: default_user_agent(),
            cache: None,
        }
    }
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_keys: vec![api_key.into()],
            ..Self::default()
        }
    }

    pub fn with_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            api_keys: keys.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_hypixel_api_url(mut self, url: impl Into<String>) -> Self {
        self.hypixel_api_url = url.into();
        self
    }

    pub fn with_mojang_api_url(mut self, url: impl Into<String>) -> Self {
        self.mojang_api_url = url.into();
        self
    }

    pub fn with_crafatar_url(mut self, url: impl Into<String>) -> Self {
        self.crafatar_url = url.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Validate for ClientConfig {
    fn validate(&self) -> Result<()> {
        validate_url("hypixel_api_url", &self.hypixel_api_url)?;
        validate_url("mojang_api_url", &self.mojang_api_url)?;
        validate_url("crafatar_url", &self.crafatar_url)?;
        validate_range("timeout_seconds", self.timeout_seconds, 1, 300)?;
        validate_non_empty_string("user_agent", &self.user_agent)?;
        for key in &self.api_keys {
            validate_non_empty_string("api_keys", key)?;
        }
        if let Some(cache) = &self.cache {
            cache.validate()?;
        }
        Ok(())
    }
}
