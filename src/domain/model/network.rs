use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// Usage information about an API key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyInfo {
    pub key: String,
    pub owner: String,
    #[serde(default)]
    pub limit: u32,
    #[serde(rename = "queriesInPastMin", default)]
    pub queries_in_past_minute: u32,
    #[serde(default)]
    pub total_queries: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoosterInfo {
    #[serde(rename = "_id")]
    pub id: String,
    pub purchaser_uuid: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub original_length: u64,
    #[serde(default)]
    pub length: u64,
    #[serde(rename = "gameType")]
    pub game_type_code: u32,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date_activated: DateTime<Utc>,
    /// Either `true` or the list of players stacked onto the booster.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stacked: Option<serde_json::Value>,
}

impl BoosterInfo {
    pub fn is_stacked(&self) -> bool {
        self.stacked.is_some()
    }
}

impl PartialEq for BoosterInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.purchaser_uuid == other.purchaser_uuid
    }
}

impl Eq for BoosterInfo {}

impl Hash for BoosterInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.purchaser_uuid.hash(state);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoosterState {
    #[serde(default)]
    pub decrementing: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boosters {
    #[serde(default)]
    pub boosters: Vec<BoosterInfo>,
    #[serde(rename = "boosterState", default)]
    pub state: BoosterState,
}

impl Boosters {
    pub fn len(&self) -> usize {
        self.boosters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boosters.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BoosterInfo> {
        self.boosters.iter()
    }

    pub fn for_game(&self, game_type_code: u32) -> impl Iterator<Item = &BoosterInfo> {
        self.boosters
            .iter()
            .filter(move |booster| booster.game_type_code == game_type_code)
    }
}

/// Ban counters published by the anti-cheat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchdogInfo {
    #[serde(rename = "watchdog_lastMinute", default)]
    pub last_minute_bans: u64,
    #[serde(rename = "staff_rollingDaily", default)]
    pub staff_rolling_daily: u64,
    #[serde(rename = "watchdog_total", default)]
    pub total_bans: u64,
    #[serde(rename = "watchdog_rollingDaily", default)]
    pub watchdog_rolling_daily: u64,
    #[serde(rename = "staff_total", default)]
    pub staff_total_bans: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameCount {
    #[serde(default)]
    pub players: u64,
    #[serde(default)]
    pub modes: Option<HashMap<String, u64>>,
}

/// Online player counts keyed by game type (`SKYWARS`, `MAIN_LOBBY`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Games {
    #[serde(default)]
    pub games: HashMap<String, GameCount>,
    #[serde(default)]
    pub player_count: u64,
}

impl Games {
    pub fn get(&self, game_type: &str) -> Option<&GameCount> {
        self.games.get(game_type)
    }

    pub fn players_in(&self, game_type: &str) -> u64 {
        self.get(game_type).map_or(0, |count| count.players)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardData {
    pub path: String,
    #[serde(default)]
    pub prefix: String,
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub count: u32,
    #[serde(rename = "leaders", default)]
    pub leaders_uuid: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboards {
    #[serde(default)]
    pub leaderboards: HashMap<String, Vec<LeaderboardData>>,
}

impl Leaderboards {
    pub fn for_game(&self, game_type: &str) -> &[LeaderboardData] {
        self.leaderboards
            .get(game_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_boosters_response() {
        let boosters: Boosters = serde_json::from_value(json!({
            "success": true,
            "boosters": [
                { "_id": "b1", "purchaserUuid": "p1", "amount": 2.0, "originalLength": 3600,
                  "length": 3000, "gameType": 24, "dateActivated": 1_600_000_000_000_i64,
                  "stacked": ["p2"] },
                { "_id": "b2", "purchaserUuid": "p2", "amount": 3.0, "originalLength": 3600,
                  "length": 3600, "gameType": 58, "dateActivated": 1_600_000_000_000_i64 }
            ],
            "boosterState": { "decrementing": true }
        }))
        .unwrap();

        assert_eq!(boosters.len(), 2);
        assert!(boosters.state.decrementing);
        assert!(boosters.boosters[0].is_stacked());
        assert!(!boosters.boosters[1].is_stacked());
        assert_eq!(boosters.for_game(58).count(), 1);
    }

    #[test]
    fn test_watchdog_and_counts() {
        let watchdog: WatchdogInfo = serde_json::from_value(json!({
            "success": true,
            "watchdog_lastMinute": 3,
            "staff_rollingDaily": 1200,
            "watchdog_total": 5_000_000,
            "watchdog_rollingDaily": 4000,
            "staff_total": 2_000_000
        }))
        .unwrap();
        assert_eq!(watchdog.total_bans, 5_000_000);
        assert_eq!(watchdog.last_minute_bans, 3);

        let games: Games = serde_json::from_value(json!({
            "success": true,
            "games": { "SKYWARS": { "players": 4200, "modes": { "solo_normal": 1000 } } },
            "playerCount": 50000
        }))
        .unwrap();
        assert_eq!(games.player_count, 50000);
        assert_eq!(games.players_in("SKYWARS"), 4200);
        assert_eq!(games.players_in("PIT"), 0);
    }

    #[test]
    fn test_leaderboards_lookup() {
        let boards: Leaderboards = serde_json::from_value(json!({
            "leaderboards": {
                "BEDWARS": [
                    { "path": "bedwars_level", "prefix": "Overall", "title": "Bed Wars Level",
                      "location": "0,0,0", "count": 10, "leaders": ["a", "b"] }
                ]
            }
        }))
        .unwrap();
        assert_eq!(boards.for_game("BEDWARS")[0].leaders_uuid, vec!["a", "b"]);
        assert!(boards.for_game("ARCADE").is_empty());
    }
}
