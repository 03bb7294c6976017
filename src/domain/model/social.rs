use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendData {
    #[serde(rename = "_id")]
    pub request_id: String,
    #[serde(rename = "uuidSender")]
    pub sender_id: String,
    #[serde(rename = "uuidReceiver")]
    pub receiver_id: String,
    #[serde(rename = "started", with = "chrono::serde::ts_milliseconds")]
    pub sent_at: DateTime<Utc>,
}

impl FriendData {
    /// The other side of the friendship as seen from `uuid`.
    pub fn other(&self, uuid: &str) -> &str {
        if self.sender_id == uuid {
            &self.receiver_id
        } else {
            &self.sender_id
        }
    }
}

impl PartialEq for FriendData {
    fn eq(&self, other: &Self) -> bool {
        self.sender_id == other.sender_id && self.receiver_id == other.receiver_id
    }
}

impl Eq for FriendData {}

impl Hash for FriendData {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sender_id.hash(state);
        self.receiver_id.hash(state);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Friends {
    pub friends: Vec<FriendData>,
}

impl Friends {
    pub fn len(&self) -> usize {
        self.friends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.friends.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FriendData> {
        self.friends.iter()
    }
}

impl From<Vec<FriendData>> for Friends {
    fn from(friends: Vec<FriendData>) -> Self {
        Self { friends }
    }
}

impl<'a> IntoIterator for &'a Friends {
    type Item = &'a FriendData;
    type IntoIter = std::slice::Iter<'a, FriendData>;

    fn into_iter(self) -> Self::IntoIter {
        self.friends.iter()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub game_type: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub map: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerStatus {
    pub uuid: String,
    #[serde(default)]
    pub session: Session,
}

impl PlayerStatus {
    pub fn is_online(&self) -> bool {
        self.session.online
    }
}

impl PartialEq for PlayerStatus {
    fn eq(&self, other: &Self) -> bool {
        self.uuid == other.uuid
    }
}

impl Eq for PlayerStatus {}

impl Hash for PlayerStatus {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uuid.hash(state);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentGame {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date: DateTime<Utc>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub ended: Option<DateTime<Utc>>,
    pub game_type: String,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub map: Option<String>,
}

impl RecentGame {
    /// Games still in progress have no end time.
    pub fn in_progress(&self) -> bool {
        self.ended.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentGames {
    pub uuid: String,
    #[serde(default)]
    pub games: Vec<RecentGame>,
}

impl RecentGames {
    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RecentGame> {
        self.games.iter()
    }
}

impl PartialEq for RecentGames {
    fn eq(&self, other: &Self) -> bool {
        self.uuid == other.uuid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn test_friend_equality_ignores_request_id() {
        let a: FriendData = serde_json::from_value(json!({
            "_id": "1", "uuidSender": "s", "uuidReceiver": "r", "started": 1_600_000_000_000_i64
        }))
        .unwrap();
        let b: FriendData = serde_json::from_value(json!({
            "_id": "2", "uuidSender": "s", "uuidReceiver": "r", "started": 1_600_000_000_001_i64
        }))
        .unwrap();

        assert_eq!(a, b);
        assert_eq!(a.other("s"), "r");
        assert_eq!(a.other("r"), "s");
        let set: HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_status_and_recent_games() {
        let status: PlayerStatus = serde_json::from_value(json!({
            "uuid": "abc",
            "session": { "online": true, "gameType": "SKYWARS", "mode": "solo_normal" }
        }))
        .unwrap();
        assert!(status.is_online());
        assert_eq!(status.session.game_type.as_deref(), Some("SKYWARS"));

        let games: RecentGames = serde_json::from_value(json!({
            "uuid": "abc",
            "games": [
                { "date": 1_600_000_000_000_i64, "gameType": "BEDWARS", "mode": "EIGHT_ONE",
                  "map": "Lighthouse", "ended": 1_600_000_600_000_i64 },
                { "date": 1_600_001_000_000_i64, "gameType": "DUELS" }
            ]
        }))
        .unwrap();
        assert_eq!(games.len(), 2);
        assert!(!games.games[0].in_progress());
        assert!(games.games[1].in_progress());
    }
}
