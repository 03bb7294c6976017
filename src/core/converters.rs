//! Username and UUID conversion through the Mojang API.

use crate::adapters::cache::ResponseCache;
use crate::config::ClientConfig;
use crate::core::request::{build_url, RawResponse};
use crate::core::transport;
use crate::domain::lookup::{normalize_uuid, validate_name};
use crate::utils::error::{HypixelError, Result};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use url::Url;

/// Which Mojang lookup a response belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    UsernameToUuid,
    UuidToUsername,
}

impl Lookup {
    fn field(self) -> &'static str {
        match self {
            Self::UsernameToUuid => "id",
            Self::UuidToUsername => "name",
        }
    }
}

/// URL building and response interpretation shared by [`Converter`] and the
/// blocking converter.
#[derive(Debug, Clone)]
pub struct MojangCore {
    base_url: String,
    cache: Option<ResponseCache>,
}

impl MojangCore {
    pub fn new(base_url: impl Into<String>, cache: Option<ResponseCache>) -> Self {
        Self {
            base_url: base_url.into(),
            cache,
        }
    }

    /// Returns the validated subject together with the URL to query.
    pub fn url(&self, lookup: Lookup, input: &str) -> Result<(String, Url)> {
        let (subject, path) = match lookup {
            Lookup::UsernameToUuid => {
                let name = validate_name(input)?;
                (name.to_string(), format!("/users/profiles/minecraft/{}", name))
            }
            Lookup::UuidToUsername => {
                let uuid = normalize_uuid(input)?;
                let path = format!("/user/profile/{}", uuid);
                (uuid, path)
            }
        };
        Ok((subject, build_url(&self.base_url, &path, &[])?))
    }

    pub fn cached(&self, lookup: Lookup, url: &Url) -> Option<String> {
        let body = self.cache.as_ref()?.fresh(url.as_str()).ok().flatten()?;
        let value: Value = serde_json::from_str(&body).ok()?;
        tracing::debug!("Cache hit for {}", url.path());
        extract(lookup, &value).ok()
    }

    pub fn complete(
        &self,
        lookup: Lookup,
        url: &Url,
        subject: &str,
        outcome: std::result::Result<RawResponse, reqwest::Error>,
    ) -> Result<String> {
        let result = outcome
            .map_err(HypixelError::from)
            .and_then(|raw| interpret(raw, subject));

        match result {
            Ok(value) => {
                let found = extract(lookup, &value)?;
                if let Some(cache) = &self.cache {
                    if let Err(e) = cache.store(url.as_str(), &value.to_string()) {
                        tracing::warn!("Failed to cache {}: {}", url.path(), e);
                    }
                }
                Ok(found)
            }
            Err(err) if err.is_upstream_failure() => {
                let stale = self
                    .cache
                    .as_ref()
                    .and_then(|cache| cache.stale(url.as_str()).ok().flatten())
                    .and_then(|body| serde_json::from_str::<Value>(&body).ok())
                    .and_then(|value| extract(lookup, &value).ok());
                match stale {
                    Some(found) => {
                        tracing::warn!("Serving stale Mojang data for {}: {}", subject, err);
                        Ok(found)
                    }
                    None => Err(err),
                }
            }
            Err(err) => Err(err),
        }
    }
}

fn not_found(reason: &str, subject: &str) -> HypixelError {
    HypixelError::PlayerNotFound {
        reason: reason.to_string(),
        user: Some(subject.to_string()),
    }
}

fn interpret(raw: RawResponse, subject: &str) -> Result<Value> {
    tracing::debug!("Mojang lookup for {} -> {}", subject, raw.status);
    match raw.status {
        StatusCode::NO_CONTENT | StatusCode::NOT_FOUND => {
            return Err(not_found("No player with this name or UUID exists", subject))
        }
        StatusCode::BAD_REQUEST => {
            return Err(not_found("The UUID or name is badly formed", subject))
        }
        StatusCode::TOO_MANY_REQUESTS => return Err(HypixelError::RateLimited { retry_after: None }),
        status if !status.is_success() => {
            return Err(HypixelError::mojang(format!("Unexpected status {}", status)))
        }
        _ => {}
    }

    let value: Value = serde_json::from_str(&raw.body)
        .map_err(|e| HypixelError::mojang(format!("Malformed JSON response: {}", e)))?;

    if let Some(message) = value
        .get("errorMessage")
        .or_else(|| value.get("error"))
        .and_then(Value::as_str)
    {
        return Err(HypixelError::mojang(message));
    }
    Ok(value)
}

fn extract(lookup: Lookup, value: &Value) -> Result<String> {
    value
        .get(lookup.field())
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            HypixelError::mojang(format!("Response is missing the '{}' field", lookup.field()))
        })
}

/// Async username and UUID converter.
#[derive(Debug, Clone)]
pub struct Converter {
    http: Client,
    core: MojangCore,
}

impl Converter {
    pub fn new() -> Result<Self> {
        Self::with_config(&ClientConfig::default(), None)
    }

    pub fn with_config(config: &ClientConfig, cache: Option<ResponseCache>) -> Result<Self> {
        Ok(Self {
            http: transport::http_client(config)?,
            core: MojangCore::new(config.mojang_api_url.clone(), cache),
        })
    }

    pub(crate) fn from_parts(http: Client, core: MojangCore) -> Self {
        Self { http, core }
    }

    /// UUID (32 hex digits, no dashes) of the player called `username`.
    pub async fn username_to_uuid(&self, username: &str) -> Result<String> {
        self.lookup(Lookup::UsernameToUuid, username).await
    }

    /// Current name of the player with `uuid`, dashed or not.
    pub async fn uuid_to_username(&self, uuid: &str) -> Result<String> {
        self.lookup(Lookup::UuidToUsername, uuid).await
    }

    async fn lookup(&self, lookup: Lookup, input: &str) -> Result<String> {
        let (subject, url) = self.core.url(lookup, input)?;
        if let Some(found) = self.core.cached(lookup, &url) {
            return Ok(found);
        }
        let outcome = transport::get(&self.http, &url, None).await;
        self.core.complete(lookup, &url, &subject, outcome)
    }
}
