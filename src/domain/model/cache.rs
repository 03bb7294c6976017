use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A cached response body with its expiry deadline. `expires_at` of `None`
/// never expires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub body: String,
    pub stored_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl CacheEntry {
    pub fn new(body: impl Into<String>, ttl: Option<Duration>, now: DateTime<Utc>) -> Self {
        Self {
            body: body.into(),
            stored_at: now,
            // a deadline past chrono's range never expires
            expires_at: ttl.and_then(|ttl| now.checked_add_signed(ttl)),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|deadline| deadline <= now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry() {
        let now = Utc::now();
        let entry = CacheEntry::new("{}", Some(Duration::seconds(30)), now);
        assert!(!entry.is_expired(now));
        assert!(!entry.is_expired(now + Duration::seconds(29)));
        assert!(entry.is_expired(now + Duration::seconds(30)));

        let forever = CacheEntry::new("{}", None, now);
        assert!(!forever.is_expired(now + Duration::days(365)));
    }

    #[test]
    fn test_overflowing_ttl_never_expires() {
        let now = Utc::now();
        let entry = CacheEntry::new("{}", Some(Duration::MAX), now);
        assert_eq!(entry.expires_at, None);
        assert!(!entry.is_expired(now + Duration::days(365)));
    }
}
