use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HypixelError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("The Hypixel API had a problem [{reason}]")]
    HypixelApi { reason: String },

    #[error("The Mojang API had a problem [{reason}]")]
    MojangApi { reason: String },

    #[error("The Crafatar API had a problem [{reason}]")]
    CrafatarApi { reason: String },

    #[error("Rate limit hit for the Hypixel API{}", retry_hint(.retry_after))]
    RateLimited { retry_after: Option<DateTime<Utc>> },

    #[error("Invalid player name or UUID [{reason}]")]
    PlayerNotFound { reason: String, user: Option<String> },

    #[error("Invalid guild name or ID [{reason}]")]
    GuildNotFound { reason: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Cache error: {message}")]
    Cache { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

fn retry_hint(retry_after: &Option<DateTime<Utc>>) -> String {
    match retry_after {
        Some(at) => format!(", retry after {}", at.to_rfc3339()),
        None => String::new(),
    }
}

impl HypixelError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn hypixel(reason: impl Into<String>) -> Self {
        Self::HypixelApi {
            reason: reason.into(),
        }
    }

    pub fn mojang(reason: impl Into<String>) -> Self {
        Self::MojangApi {
            reason: reason.into(),
        }
    }

    /// Failures caused by the remote side being unavailable or refusing
    /// service, as opposed to the caller asking for something that does not
    /// exist. Only these may be answered from stale cache data.
    pub fn is_upstream_failure(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::HypixelApi { .. } | Self::MojangApi { .. } | Self::RateLimited { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PlayerNotFound { .. } | Self::GuildNotFound { .. })
    }
}

#[cfg(feature = "sqlite-cache")]
impl From<rusqlite::Error> for HypixelError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Cache {
            message: err.to_string(),
        }
    }
}

#[cfg(feature = "redis-cache")]
impl From<redis::RedisError> for HypixelError {
    fn from(err: redis::RedisError) -> Self {
        Self::Cache {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HypixelError>;
