//! Crafatar render URLs for player skins.

use crate::core::request::{build_url, RawResponse};
use crate::utils::error::{HypixelError, Result};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkinKind {
    #[default]
    Avatar,
    Head,
    Body,
    Skin,
}

impl SkinKind {
    fn segment(self) -> &'static str {
        match self {
            Self::Avatar => "avatars",
            Self::Head => "renders/head",
            Self::Body => "renders/body",
            Self::Skin => "skins",
        }
    }
}

impl fmt::Display for SkinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Avatar => "avatar",
            Self::Head => "head",
            Self::Body => "body",
            Self::Skin => "skin",
        };
        f.write_str(name)
    }
}

impl FromStr for SkinKind {
    type Err = HypixelError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "avatar" => Ok(Self::Avatar),
            "head" => Ok(Self::Head),
            "body" => Ok(Self::Body),
            "skin" => Ok(Self::Skin),
            other => Err(HypixelError::invalid_argument(format!(
                "Unknown skin kind '{}', expected avatar, head, body or skin",
                other
            ))),
        }
    }
}

/// `uuid` must already be normalized.
pub fn skin_url(base: &str, kind: SkinKind, uuid: &str) -> Result<Url> {
    build_url(base, &format!("/{}/{}", kind.segment(), uuid), &[])
}

/// Checks that Crafatar can actually render the URL.
pub fn verify(url: Url, raw: &RawResponse) -> Result<Url> {
    match raw.status {
        StatusCode::UNPROCESSABLE_ENTITY => Err(HypixelError::invalid_argument(format!(
            "Crafatar rejected the UUID in {}",
            url
        ))),
        status if !status.is_success() => Err(HypixelError::CrafatarApi {
            reason: format!("Unexpected status {} for {}", status, url),
        }),
        _ => Ok(url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderMap;

    #[test]
    fn test_urls_per_kind() {
        let uuid = "069a79f444e94726a5befca90e38aaf5";
        let base = "https://crafatar.com";
        assert_eq!(
            skin_url(base, SkinKind::Avatar, uuid).unwrap().as_str(),
            format!("https://crafatar.com/avatars/{}", uuid)
        );
        assert_eq!(
            skin_url(base, SkinKind::Head, uuid).unwrap().path(),
            format!("/renders/head/{}", uuid)
        );
        assert_eq!(
            skin_url(base, SkinKind::Skin, uuid).unwrap().path(),
            format!("/skins/{}", uuid)
        );
        assert_eq!("BODY".parse::<SkinKind>().unwrap(), SkinKind::Body);
        assert!("cape".parse::<SkinKind>().is_err());
    }

    #[test]
    fn test_verify_statuses() {
        let url = skin_url("https://crafatar.com", SkinKind::Body, "abc").unwrap();
        let raw = |status: u16| RawResponse {
            status: StatusCode::from_u16(status).unwrap(),
            headers: HeaderMap::new(),
            body: String::new(),
        };
        assert!(verify(url.clone(), &raw(200)).is_ok());
        assert!(matches!(
            verify(url.clone(), &raw(422)),
            Err(HypixelError::InvalidArgument { .. })
        ));
        assert!(matches!(
            verify(url, &raw(500)),
            Err(HypixelError::CrafatarApi { .. })
        ));
    }
}
