//! Turns interpreted JSON bodies into typed records. Shared by the async and
//! blocking clients so both surface exactly the same errors.

use crate::domain::model::{
    Boosters, FindGuild, FriendData, Friends, Games, Guild, KeyInfo, Leaderboards, Player,
    PlayerStatus, RecentGames, SkyblockActiveAuction, SkyblockBazaar, SkyblockNews,
    SkyblockProfile, SkyblockUserAuction, WatchdogInfo,
};
use crate::utils::error::{HypixelError, Result};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

fn take_field(body: &mut Value, key: &str) -> Value {
    body.get_mut(key).map(Value::take).unwrap_or(Value::Null)
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    Ok(serde_json::from_value(value)?)
}

fn player_not_found(subject: &str) -> HypixelError {
    HypixelError::PlayerNotFound {
        reason: "Invalid UUID or the player does not exist".to_string(),
        user: Some(subject.to_string()),
    }
}

pub fn key_info(mut body: Value) -> Result<KeyInfo> {
    decode(take_field(&mut body, "record"))
}

pub fn boosters(body: Value) -> Result<Boosters> {
    decode(body)
}

pub fn player(mut body: Value, subject: &str) -> Result<Player> {
    match take_field(&mut body, "player") {
        Value::Null => Err(player_not_found(subject)),
        player => decode(player),
    }
}

pub fn friends(mut body: Value) -> Result<Friends> {
    let records: Vec<FriendData> = match take_field(&mut body, "records") {
        Value::Null => Vec::new(),
        records => decode(records)?,
    };
    Ok(Friends { friends: records })
}

pub fn watchdog(body: Value) -> Result<WatchdogInfo> {
    decode(body)
}

pub fn guild(mut body: Value, subject: &str) -> Result<Guild> {
    match take_field(&mut body, "guild") {
        Value::Null => Err(HypixelError::GuildNotFound {
            reason: format!("No guild matches '{}'", subject),
        }),
        guild => decode(guild),
    }
}

pub fn find_guild(body: Value) -> Result<FindGuild> {
    decode(body)
}

pub fn games(body: Value) -> Result<Games> {
    decode(body)
}

pub fn leaderboards(body: Value) -> Result<Leaderboards> {
    decode(body)
}

pub fn status(body: Value) -> Result<PlayerStatus> {
    decode(body)
}

pub fn recent_games(body: Value) -> Result<RecentGames> {
    decode(body)
}

pub fn skyblock_profile(mut body: Value, subject: &str) -> Result<SkyblockProfile> {
    match take_field(&mut body, "profile") {
        Value::Null => Err(HypixelError::PlayerNotFound {
            reason: "The SkyBlock profile does not exist".to_string(),
            user: Some(subject.to_string()),
        }),
        profile => decode(profile),
    }
}

pub fn skyblock_profiles(mut body: Value) -> Result<Vec<SkyblockProfile>> {
    match take_field(&mut body, "profiles") {
        Value::Null => Ok(Vec::new()),
        profiles => decode(profiles),
    }
}

pub fn skyblock_user_auctions(body: Value, subject: &str) -> Result<SkyblockUserAuction> {
    let auctions: SkyblockUserAuction = decode(body)?;
    if auctions.is_empty() {
        return Err(player_not_found(subject));
    }
    Ok(auctions)
}

pub fn skyblock_active_auctions(body: Value) -> Result<SkyblockActiveAuction> {
    decode(body)
}

pub fn skyblock_bazaar(body: Value) -> Result<SkyblockBazaar> {
    decode(body)
}

pub fn skyblock_news(body: Value) -> Result<SkyblockNews> {
    decode(body)
}

/// Resource payloads are returned raw, without the envelope fields.
pub fn resource(mut body: Value, field: &str) -> Value {
    take_field(&mut body, field)
}

pub fn guild_achievements(mut body: Value) -> Value {
    json!({
        "one_time": take_field(&mut body, "one_time"),
        "tiered": take_field(&mut body, "tiered"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_player_is_not_found() {
        let err = player(json!({"success": true, "player": null}), "Notch").unwrap_err();
        assert!(matches!(
            err,
            HypixelError::PlayerNotFound { user: Some(ref u), .. } if u == "Notch"
        ));
    }

    #[test]
    fn test_player_record() {
        let body = json!({
            "success": true,
            "player": {
                "uuid": "069a79f444e94726a5befca90e38aaf5",
                "displayname": "Notch",
                "networkExp": 0.0,
                "newPackageRank": "VIP_PLUS"
            }
        });
        let player = player(body, "Notch").unwrap();
        assert_eq!(player.name(), "Notch");
        assert_eq!(player.display(), "[VIP+] Notch");
    }

    #[test]
    fn test_null_guild_is_not_found() {
        assert!(matches!(
            guild(json!({"success": true, "guild": null}), "Nobody"),
            Err(HypixelError::GuildNotFound { .. })
        ));
    }

    #[test]
    fn test_friends_and_key_records() {
        let friends = friends(json!({
            "success": true,
            "records": [{
                "_id": "5f1",
                "uuidSender": "a",
                "uuidReceiver": "b",
                "started": 1_600_000_000_000i64
            }]
        }))
        .unwrap();
        assert_eq!(friends.len(), 1);
        assert_eq!(friends.friends[0].other("a"), "b");

        let key = key_info(json!({
            "success": true,
            "record": {"key": "k", "owner": "o", "limit": 120, "queriesInPastMin": 3, "totalQueries": 9}
        }))
        .unwrap();
        assert_eq!(key.queries_in_past_minute, 3);
    }

    #[test]
    fn test_empty_user_auctions_are_not_found() {
        assert!(matches!(
            skyblock_user_auctions(json!({"success": true, "auctions": []}), "abc"),
            Err(HypixelError::PlayerNotFound { .. })
        ));
    }

    #[test]
    fn test_resource_envelopes_are_stripped() {
        let body = json!({"success": true, "lastUpdated": 1, "one_time": {"A": 1}, "tiered": {}});
        let achievements = guild_achievements(body);
        assert_eq!(achievements["one_time"]["A"], 1);
        assert!(achievements.get("success").is_none());

        let quests = resource(json!({"success": true, "quests": {"bedwars": []}}), "quests");
        assert_eq!(quests, json!({"bedwars": []}));
    }
}
