use crate::utils::error::HypixelError;

/// Fixed Hypixel API routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Key,
    Boosters,
    Player,
    Friends,
    Watchdog,
    Guild,
    FindGuild,
    GameCounts,
    Leaderboards,
    Status,
    RecentGames,
    SkyblockProfile,
    SkyblockProfiles,
    SkyblockUserAuctions,
    SkyblockActiveAuctions,
    SkyblockBazaar,
    SkyblockNews,
    ResourceAchievements,
    ResourceChallenges,
    ResourceQuests,
    ResourceGuildAchievements,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::Key => "/key",
            Self::Boosters => "/boosters",
            Self::Player => "/player",
            Self::Friends => "/friends",
            Self::Watchdog => "/punishmentstats",
            Self::Guild => "/guild",
            Self::FindGuild => "/findGuild",
            Self::GameCounts => "/counts",
            Self::Leaderboards => "/leaderboards",
            Self::Status => "/status",
            Self::RecentGames => "/recentgames",
            Self::SkyblockProfile => "/skyblock/profile",
            Self::SkyblockProfiles => "/skyblock/profiles",
            Self::SkyblockUserAuctions => "/skyblock/auction",
            Self::SkyblockActiveAuctions => "/skyblock/auctions",
            Self::SkyblockBazaar => "/skyblock/bazaar",
            Self::SkyblockNews => "/skyblock/news",
            Self::ResourceAchievements => "/resources/achievements",
            Self::ResourceChallenges => "/resources/challenges",
            Self::ResourceQuests => "/resources/quests",
            Self::ResourceGuildAchievements => "/resources/guilds/achievements",
        }
    }

    /// Resource routes are public; every other route needs an API key.
    pub fn requires_key(self) -> bool {
        !matches!(
            self,
            Self::ResourceAchievements
                | Self::ResourceChallenges
                | Self::ResourceQuests
                | Self::ResourceGuildAchievements
                | Self::SkyblockActiveAuctions
                | Self::SkyblockBazaar
        )
    }

    /// Key info describes the key itself and is never served from cache.
    pub fn cacheable(self) -> bool {
        self != Self::Key
    }

    /// Error for a 404 on this route. `subject` is whatever the caller asked
    /// for, e.g. a player name.
    pub fn not_found(self, subject: Option<&str>) -> HypixelError {
        match self {
            Self::Player
            | Self::Friends
            | Self::Status
            | Self::RecentGames
            | Self::SkyblockProfile
            | Self::SkyblockProfiles
            | Self::SkyblockUserAuctions => HypixelError::PlayerNotFound {
                reason: "The player being searched does not exist".to_string(),
                user: subject.map(str::to_string),
            },
            Self::Guild | Self::FindGuild => HypixelError::GuildNotFound {
                reason: match subject {
                    Some(subject) => format!("No guild matches '{}'", subject),
                    None => "No guild matches the query".to_string(),
                },
            },
            _ => HypixelError::hypixel(format!(
                "The route specified does not exist: {}",
                self.path()
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_routes_skip_the_key() {
        assert!(Endpoint::Player.requires_key());
        assert!(!Endpoint::ResourceQuests.requires_key());
        assert!(!Endpoint::SkyblockBazaar.requires_key());
        assert!(!Endpoint::SkyblockActiveAuctions.requires_key());
        assert!(Endpoint::SkyblockNews.requires_key());
        assert!(!Endpoint::Key.cacheable());
        assert!(Endpoint::Player.cacheable());
    }

    #[test]
    fn test_not_found_mapping() {
        assert!(matches!(
            Endpoint::Status.not_found(Some("Notch")),
            HypixelError::PlayerNotFound { user: Some(ref u), .. } if u == "Notch"
        ));
        assert!(matches!(
            Endpoint::Guild.not_found(None),
            HypixelError::GuildNotFound { .. }
        ));
        assert!(matches!(
            Endpoint::Boosters.not_found(None),
            HypixelError::HypixelApi { .. }
        ));
    }
}
