use crate::utils::error::{HypixelError, Result};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static PLAYER_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[A-Za-z0-9_]{1,16}$").expect("player name pattern is valid"));

/// A player given either by display name or by UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlayerRef {
    Name(String),
    Uuid(String),
}

impl PlayerRef {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    pub fn uuid(uuid: impl Into<String>) -> Self {
        Self::Uuid(uuid.into())
    }

    /// Treats anything that parses as a UUID as one, and everything else as
    /// a name. Minecraft names are at most 16 characters so the two never
    /// overlap.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if uuid::Uuid::try_parse(trimmed).is_ok() {
            Self::Uuid(trimmed.to_string())
        } else {
            Self::Name(trimmed.to_string())
        }
    }

    /// The user-facing value, used in not-found errors.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Name(value) | Self::Uuid(value) => value,
        }
    }
}

impl fmt::Display for PlayerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for PlayerRef {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<String> for PlayerRef {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

/// Normalizes a dashed or undashed UUID into the 32 character lowercase form
/// the APIs use.
pub fn normalize_uuid(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(HypixelError::invalid_argument(
            "Please provide a player's username or UUID.",
        ));
    }
    uuid::Uuid::try_parse(trimmed)
        .map(|parsed| parsed.simple().to_string())
        .map_err(|e| HypixelError::invalid_argument(format!("Malformed UUID '{}': {}", trimmed, e)))
}

/// Minecraft names are 1 to 16 letters, digits or underscores. Anything else
/// is rejected before it reaches a URL path.
pub fn validate_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(HypixelError::invalid_argument(
            "Please provide a player's username or UUID.",
        ));
    }
    if !PLAYER_NAME.is_match(trimmed) {
        return Err(HypixelError::invalid_argument(format!(
            "'{}' is not a valid Minecraft username",
            trimmed
        )));
    }
    Ok(trimmed)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuildQuery {
    Id(String),
    Name(String),
    Player(PlayerRef),
}

impl GuildQuery {
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    pub fn player(player: impl Into<PlayerRef>) -> Self {
        Self::Player(player.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FindGuildQuery {
    ByName(String),
    ByPlayer(PlayerRef),
}

pub(crate) fn require_non_empty<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(HypixelError::invalid_argument(format!(
            "Please provide the {}.",
            what
        )));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_distinguishes_names_from_uuids() {
        assert_eq!(
            PlayerRef::parse("c8438cdd-1260-4344-8cca-9e28646efbe7"),
            PlayerRef::Uuid("c8438cdd-1260-4344-8cca-9e28646efbe7".to_string())
        );
        assert_eq!(
            PlayerRef::parse(" janaSunrise "),
            PlayerRef::Name("janaSunrise".to_string())
        );
    }

    #[test]
    fn test_normalize_uuid() {
        assert_eq!(
            normalize_uuid("C8438CDD-1260-4344-8CCA-9E28646EFBE7").unwrap(),
            "c8438cdd126043448cca9e28646efbe7"
        );
        assert_eq!(
            normalize_uuid("c8438cdd126043448cca9e28646efbe7").unwrap(),
            "c8438cdd126043448cca9e28646efbe7"
        );
        assert!(matches!(
            normalize_uuid("not-a-uuid"),
            Err(HypixelError::InvalidArgument { .. })
        ));
        assert!(matches!(
            normalize_uuid(""),
            Err(HypixelError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name(" Notch ").unwrap(), "Notch");
        assert_eq!(validate_name("jeb_").unwrap(), "jeb_");
        assert!(validate_name("  ").is_err());
    }

    #[test]
    fn test_validate_name_rejects_url_syntax() {
        for name in [
            "Notch?x=1",
            "x/../Notch",
            "Notch#frag",
            "a b",
            "%2e%2e",
            "seventeen_chars_x",
        ] {
            assert!(
                matches!(validate_name(name), Err(HypixelError::InvalidArgument { .. })),
                "{name} should be rejected"
            );
        }
    }
}
