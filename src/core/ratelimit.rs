use crate::utils::error::{HypixelError, Result};
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use reqwest::header::HeaderMap;

pub const HEADER_LIMIT: &str = "RateLimit-Limit";
pub const HEADER_REMAINING: &str = "RateLimit-Remaining";
pub const HEADER_RESET: &str = "RateLimit-Reset";
pub const HEADER_RETRY_AFTER: &str = "Retry-After";

/// Longest wait we accept from a header; larger values are clamped.
pub const MAX_WAIT_SECONDS: i64 = 86_400;

/// Snapshot of what the API last told us about our quota.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimitStatus {
    pub limit: Option<u32>,
    pub remaining: Option<u32>,
    pub reset_at: Option<DateTime<Utc>>,
    pub retry_after: Option<DateTime<Utc>>,
}

impl RateLimitStatus {
    /// When the next request may be sent, if we are currently blocked.
    pub fn blocked_until(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if let Some(retry_after) = self.retry_after.filter(|at| *at > now) {
            return Some(retry_after);
        }
        match (self.remaining, self.reset_at) {
            (Some(0), Some(reset_at)) if reset_at > now => Some(reset_at),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct RateLimiter {
    state: Mutex<RateLimitStatus>,
}

fn header_number(headers: &HeaderMap, name: &str) -> Option<i64> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<i64>().ok())
}

fn after(now: DateTime<Utc>, seconds: i64) -> DateTime<Utc> {
    let wait = Duration::seconds(seconds.clamp(0, MAX_WAIT_SECONDS));
    now.checked_add_signed(wait).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> RateLimitStatus {
        *self.state.lock()
    }

    /// Refuses locally instead of burning a request the API would reject.
    pub fn check(&self, now: DateTime<Utc>) -> Result<()> {
        match self.state.lock().blocked_until(now) {
            Some(until) => Err(HypixelError::RateLimited {
                retry_after: Some(until),
            }),
            None => Ok(()),
        }
    }

    pub fn update(&self, headers: &HeaderMap, now: DateTime<Utc>) {
        let Some(remaining) = header_number(headers, HEADER_REMAINING) else {
            return;
        };

        let mut state = self.state.lock();
        if let Some(limit) = header_number(headers, HEADER_LIMIT) {
            state.limit = u32::try_from(limit).ok();
        }
        state.remaining = u32::try_from(remaining.max(0)).ok();
        if let Some(reset) = header_number(headers, HEADER_RESET) {
            state.reset_at = Some(after(now, reset));
        }
        tracing::debug!(
            "Rate limit: {:?}/{:?} remaining, resets at {:?}",
            state.remaining,
            state.limit,
            state.reset_at
        );
    }

    /// Records a 429 and returns the error to surface.
    pub fn throttled(&self, headers: &HeaderMap, now: DateTime<Utc>) -> HypixelError {
        let wait = header_number(headers, HEADER_RETRY_AFTER)
            .or_else(|| header_number(headers, HEADER_RESET))
            .unwrap_or(60);
        let until = after(now, wait);

        let mut state = self.state.lock();
        state.remaining = Some(0);
        state.retry_after = Some(until);
        tracing::warn!("Hypixel API rate limit hit, retry after {}", until);

        HypixelError::RateLimited {
            retry_after: Some(until),
        }
    }
}
