//! Everything about a Hypixel request that does not depend on how the bytes
//! travel: URL building, key rotation, rate limiting, caching and response
//! interpretation. The async and blocking clients only add the transport.

use crate::adapters::cache::ResponseCache;
use crate::config::ClientConfig;
use crate::core::endpoint::Endpoint;
use crate::core::ratelimit::{RateLimitStatus, RateLimiter};
use crate::utils::error::{HypixelError, Result};
use crate::utils::validation::Validate;
use chrono::Utc;
use parking_lot::RwLock;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use url::Url;

pub const API_KEY_HEADER: &str = "API-Key";

/// API keys used in rotation so load is spread across all of them.
#[derive(Debug, Default)]
pub struct KeyRing {
    keys: RwLock<Vec<String>>,
    cursor: AtomicUsize,
}

impl KeyRing {
    pub fn new(keys: Vec<String>) -> Self {
        let ring = Self::default();
        ring.add(keys);
        ring
    }

    /// Next key in rotation, or `None` when no key is configured.
    pub fn next(&self) -> Option<String> {
        let keys = self.keys.read();
        if keys.is_empty() {
            return None;
        }
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % keys.len();
        Some(keys[index].clone())
    }

    /// Adds keys, skipping ones already present.
    pub fn add<I, S>(&self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut current = self.keys.write();
        for key in keys {
            let key = key.into();
            if !current.contains(&key) {
                current.push(key);
            }
        }
    }

    /// Removes keys, ignoring ones that are not present.
    pub fn remove<I, S>(&self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut current = self.keys.write();
        for key in keys {
            current.retain(|existing| existing != key.as_ref());
        }
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.keys.read().clone()
    }

    pub fn len(&self) -> usize {
        self.keys.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.read().is_empty()
    }
}

/// A request ready to be sent.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub endpoint: Endpoint,
    pub url: Url,
    pub api_key: Option<String>,
    /// What the caller asked for, used in not-found errors.
    pub subject: Option<String>,
}

impl ApiRequest {
    /// The key is sent as a header, so the URL alone identifies the response.
    pub fn cache_key(&self) -> &str {
        self.url.as_str()
    }
}

/// Transport-independent view of an HTTP response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

pub enum Prepared {
    /// Answered locally from the cache.
    Ready(Value),
    Send(ApiRequest),
}

/// Builds a URL from a base, a path and query parameters in order.
pub fn build_url(base: &str, path: &str, params: &[(&str, String)]) -> Result<Url> {
    let joined = format!("{}{}", base.trim_end_matches('/'), path);
    let mut url = Url::parse(&joined)
        .map_err(|e| HypixelError::invalid_argument(format!("Invalid URL '{}': {}", joined, e)))?;
    if !params.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (name, value) in params {
            pairs.append_pair(name, value);
        }
    }
    Ok(url)
}

/// The `cause` field Hypixel puts in error bodies.
pub fn error_cause(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()?
        .get("cause")?
        .as_str()
        .map(str::to_string)
}

pub struct RequestCore {
    config: ClientConfig,
    keys: KeyRing,
    limiter: RateLimiter,
    cache: Option<ResponseCache>,
}

impl RequestCore {
    pub fn new(config: ClientConfig, cache: Option<ResponseCache>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            keys: KeyRing::new(config.api_keys.clone()),
            limiter: RateLimiter::new(),
            config,
            cache,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn keys(&self) -> &KeyRing {
        &self.keys
    }

    pub fn cache(&self) -> Option<&ResponseCache> {
        self.cache.as_ref()
    }

    pub fn rate_limit(&self) -> RateLimitStatus {
        self.limiter.status()
    }

    /// `api_key` overrides the key ring for this one request.
    fn pick_key(&self, endpoint: Endpoint, api_key: Option<&str>) -> Result<Option<String>> {
        if let Some(key) = api_key {
            return Ok(Some(key.to_string()));
        }
        if !endpoint.requires_key() {
            return Ok(None);
        }
        self.keys.next().map(Some).ok_or_else(|| {
            HypixelError::invalid_argument(format!(
                "An API key is required for {}",
                endpoint.path()
            ))
        })
    }

    pub fn build_request(
        &self,
        endpoint: Endpoint,
        params: &[(&str, String)],
        subject: Option<&str>,
        api_key: Option<&str>,
    ) -> Result<ApiRequest> {
        let url = build_url(&self.config.hypixel_api_url, endpoint.path(), params)?;
        Ok(ApiRequest {
            endpoint,
            url,
            api_key: self.pick_key(endpoint, api_key)?,
            subject: subject.map(str::to_string),
        })
    }

    /// Serves fresh cache hits and enforces the local rate-limit gate. A key
    /// is only taken from the ring once the cache has missed.
    pub fn prepare(
        &self,
        endpoint: Endpoint,
        params: &[(&str, String)],
        subject: Option<&str>,
        api_key: Option<&str>,
    ) -> Result<Prepared> {
        let url = build_url(&self.config.hypixel_api_url, endpoint.path(), params)?;

        if let Some(value) = self.cached(endpoint, &url) {
            tracing::debug!("Cache hit for {}", url.path());
            return Ok(Prepared::Ready(value));
        }

        let request = ApiRequest {
            endpoint,
            api_key: self.pick_key(endpoint, api_key)?,
            subject: subject.map(str::to_string),
            url,
        };

        if request.api_key.is_some() {
            if let Err(err) = self.limiter.check(Utc::now()) {
                return self.fallback(&request, err).map(Prepared::Ready);
            }
        }

        tracing::debug!("GET {}", request.url);
        Ok(Prepared::Send(request))
    }

    /// Turns the transport outcome into JSON, caching successes and falling
    /// back to stale data on upstream failures.
    pub fn complete(
        &self,
        request: &ApiRequest,
        outcome: std::result::Result<RawResponse, reqwest::Error>,
    ) -> Result<Value> {
        let result = outcome
            .map_err(HypixelError::from)
            .and_then(|raw| self.interpret(request, raw));

        match result {
            Ok(value) => {
                self.remember(request, &value);
                Ok(value)
            }
            Err(err) => self.fallback(request, err),
        }
    }

    fn interpret(&self, request: &ApiRequest, raw: RawResponse) -> Result<Value> {
        let now = Utc::now();
        tracing::debug!("{} -> {}", request.url.path(), raw.status);

        if raw.status == StatusCode::TOO_MANY_REQUESTS {
            return Err(self.limiter.throttled(&raw.headers, now));
        }
        if request.api_key.is_some() {
            self.limiter.update(&raw.headers, now);
        }

        match raw.status {
            StatusCode::FORBIDDEN => {
                return Err(HypixelError::hypixel(
                    error_cause(&raw.body).unwrap_or_else(|| "Invalid API key specified".to_string()),
                ))
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                return Err(HypixelError::invalid_argument(
                    error_cause(&raw.body)
                        .unwrap_or_else(|| "Some data provided is invalid".to_string()),
                ))
            }
            StatusCode::NOT_FOUND => {
                return Err(request.endpoint.not_found(request.subject.as_deref()))
            }
            status if !status.is_success() => {
                let mut reason = format!("Unexpected status {}", status);
                if let Some(cause) = error_cause(&raw.body) {
                    reason.push_str(&format!(": {}", cause));
                }
                return Err(HypixelError::hypixel(reason));
            }
            _ => {}
        }

        let value: Value = serde_json::from_str(&raw.body)
            .map_err(|e| HypixelError::hypixel(format!("Malformed JSON response: {}", e)))?;

        if value.get("success").and_then(Value::as_bool) == Some(false) {
            let mut reason = "Something in the API has a problem.".to_string();
            if let Some(cause) = value.get("cause").and_then(Value::as_str) {
                reason.push_str(&format!(" Reason given: {}", cause));
            }
            return Err(HypixelError::hypixel(reason));
        }

        Ok(value)
    }

    fn cache_for(&self, endpoint: Endpoint) -> Option<&ResponseCache> {
        self.cache.as_ref().filter(|_| endpoint.cacheable())
    }

    /// Entries are keyed by URL alone since the key travels as a header.
    fn cached(&self, endpoint: Endpoint, url: &Url) -> Option<Value> {
        let cache = self.cache_for(endpoint)?;
        match cache.fresh(url.as_str()) {
            Ok(Some(body)) => serde_json::from_str(&body)
                .map_err(|e| tracing::warn!("Ignoring unreadable cache entry: {}", e))
                .ok(),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Cache lookup failed: {}", e);
                None
            }
        }
    }

    fn remember(&self, request: &ApiRequest, value: &Value) {
        if let Some(cache) = self.cache_for(request.endpoint) {
            if let Err(e) = cache.store(request.cache_key(), &value.to_string()) {
                tracing::warn!("Failed to cache {}: {}", request.url.path(), e);
            }
        }
    }

    fn fallback(&self, request: &ApiRequest, err: HypixelError) -> Result<Value> {
        if !err.is_upstream_failure() {
            return Err(err);
        }
        let Some(cache) = self.cache_for(request.endpoint) else {
            return Err(err);
        };

        match cache.stale(request.cache_key()) {
            Ok(Some(body)) => match serde_json::from_str(&body) {
                Ok(value) => {
                    tracing::warn!(
                        "Serving stale data for {} after error: {}",
                        request.url.path(),
                        err
                    );
                    Ok(value)
                }
                Err(_) => Err(err),
            },
            Ok(None) => Err(err),
            Err(cache_err) => {
                tracing::warn!("Stale cache lookup failed: {}", cache_err);
                Err(err)
            }
        }
    }
}
