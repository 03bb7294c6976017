pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::cache::{MemoryCache, ResponseCache};
#[cfg(feature = "redis-cache")]
pub use adapters::cache::RedisCache;
#[cfg(feature = "sqlite-cache")]
pub use adapters::cache::SqliteCache;
pub use config::{
    toml_config::TomlConfig, CacheBackendKind, CacheConfig, ClientConfig, MAX_EXPIRE_AFTER_SECONDS,
};
#[cfg(feature = "blocking")]
pub use crate::core::{BlockingClient, BlockingConverter};
pub use crate::core::ratelimit::MAX_WAIT_SECONDS;
pub use crate::core::{Converter, HypixelClient, RateLimitStatus, SkinKind};
pub use domain::lookup::{FindGuildQuery, GuildQuery, PlayerRef};
pub use domain::model;
pub use domain::ports::CacheStore;
pub use utils::error::{HypixelError, Result};
