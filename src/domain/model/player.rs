use crate::utils::stats::{self, RankFields};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerChallenges {
    #[serde(default)]
    pub all_time: HashMap<String, i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialMedia {
    #[serde(default)]
    pub links: HashMap<String, String>,
}

/// A Hypixel network player.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    #[serde(rename = "_id", default)]
    pub hypixel_id: Option<String>,
    pub uuid: String,
    #[serde(rename = "displayname", default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub known_aliases: Vec<String>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub first_login: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default)]
    pub one_time_achievements: Vec<String>,
    #[serde(default)]
    pub achievement_points: u64,
    #[serde(default)]
    pub achievements: HashMap<String, i64>,
    #[serde(default)]
    pub network_exp: f64,
    #[serde(default)]
    pub karma: u64,
    #[serde(default)]
    pub challenges: PlayerChallenges,
    #[serde(rename = "mostRecentGameType", default)]
    pub most_recent_game: Option<String>,
    #[serde(default)]
    pub social_media: SocialMedia,
    #[serde(default)]
    pub rank: Option<String>,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub monthly_package_rank: Option<String>,
    #[serde(default)]
    pub new_package_rank: Option<String>,
    #[serde(default)]
    pub package_rank: Option<String>,
    #[serde(default)]
    pub stats: HashMap<String, serde_json::Value>,
}

impl Player {
    /// Display name, falling back to the UUID for players that never set one.
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.uuid)
    }

    pub fn network_level(&self) -> u64 {
        stats::network_level(self.network_exp)
    }

    pub fn network_level_exact(&self) -> f64 {
        stats::network_level_exact(self.network_exp)
    }

    pub fn rank(&self) -> Option<String> {
        stats::resolve_rank(RankFields {
            prefix: self.prefix.as_deref(),
            rank: self.rank.as_deref(),
            monthly_package_rank: self.monthly_package_rank.as_deref(),
            new_package_rank: self.new_package_rank.as_deref(),
            package_rank: self.package_rank.as_deref(),
        })
    }

    /// Name as shown in chat, e.g. `[MVP+] Notch`.
    pub fn display(&self) -> String {
        stats::profile_display(self.name(), self.rank().as_deref())
    }

    pub fn game_stats(&self, game: &str) -> Option<&serde_json::Value> {
        self.stats.get(game)
    }
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.uuid == other.uuid
    }
}

impl Eq for Player {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "_id": "5ac3f1b3c8f2a4e1c2a1b7d3",
            "uuid": "2a13b3a34bf343fa9d8db0f87187da39",
            "displayname": "007rohitj",
            "knownAliases": ["007rohitj"],
            "firstLogin": 1_500_000_000_000_i64,
            "lastLogin": 1_600_000_000_000_i64,
            "oneTimeAchievements": ["general_wigglytuff"],
            "achievementPoints": 130,
            "achievements": {
                "bedwars_level": 5,
                "general_challenger": 7,
                "bedwars_wins": 18
            },
            "networkExp": 10_000.0,
            "challenges": { "all_time": { "SKYWARS__feather_challenge": 1 } },
            "mostRecentGameType": "BEDWARS",
            "socialMedia": { "links": { "DISCORD": "rohit#0001" } },
            "newPackageRank": "MVP_PLUS",
            "unknownField": true
        })
    }

    #[test]
    fn test_player_deserializes_from_api_shape() {
        let player: Player = serde_json::from_value(sample()).unwrap();

        assert_eq!(player.name(), "007rohitj");
        assert_eq!(player.achievement_points, 130);
        assert_eq!(player.achievements.get("bedwars_wins"), Some(&18));
        assert_eq!(player.one_time_achievements.len(), 1);
        assert_eq!(player.most_recent_game.as_deref(), Some("BEDWARS"));
        assert_eq!(
            player.social_media.links.get("DISCORD").map(String::as_str),
            Some("rohit#0001")
        );
        assert_eq!(player.first_login.unwrap().timestamp(), 1_500_000_000);
        assert_eq!(player.network_level(), 2);
        assert_eq!(player.rank().as_deref(), Some("MVP+"));
        assert_eq!(player.display(), "[MVP+] 007rohitj");
    }

    #[test]
    fn test_player_tolerates_sparse_records() {
        let player: Player =
            serde_json::from_value(json!({ "uuid": "2a13b3a34bf343fa9d8db0f87187da39" })).unwrap();
        assert_eq!(player.name(), "2a13b3a34bf343fa9d8db0f87187da39");
        assert_eq!(player.network_level(), 1);
        assert!(player.rank().is_none());
    }
}
