use crate::utils::stats;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuildMember {
    pub uuid: String,
    #[serde(default)]
    pub rank: Option<String>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub joined: Option<DateTime<Utc>>,
    #[serde(default)]
    pub exp_history: HashMap<String, u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guild {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub coins: u64,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub members: Vec<GuildMember>,
    #[serde(default)]
    pub legacy_ranking: Option<u64>,
    #[serde(default)]
    pub exp: f64,
    #[serde(default)]
    pub achievements: HashMap<String, i64>,
    #[serde(rename = "guildExpByGameType", default)]
    pub exp_by_game: HashMap<String, f64>,
}

impl Guild {
    pub fn level(&self) -> u64 {
        stats::guild_level(self.exp)
    }

    pub fn level_exact(&self) -> f64 {
        stats::guild_level_exact(self.exp)
    }

    pub fn display(&self) -> String {
        stats::guild_display(&self.name, self.tag.as_deref())
    }

    pub fn member(&self, uuid: &str) -> Option<&GuildMember> {
        self.members.iter().find(|member| member.uuid == uuid)
    }
}

/// Result of a guild search: the guild id, if any guild matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindGuild {
    #[serde(default)]
    pub guild: Option<String>,
}
