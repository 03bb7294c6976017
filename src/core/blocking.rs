//! Synchronous variants of [`HypixelClient`](crate::HypixelClient) and
//! [`Converter`](crate::Converter). They must not be called from inside an
//! async runtime.

use crate::adapters::cache::ResponseCache;
use crate::config::ClientConfig;
use crate::core::converters::{Lookup, MojangCore};
use crate::core::endpoint::Endpoint;
use crate::core::ratelimit::RateLimitStatus;
use crate::core::records;
use crate::core::request::{Prepared, RequestCore};
use crate::core::skins::{self, SkinKind};
use crate::core::transport::blocking as transport;
use crate::domain::lookup::{normalize_uuid, require_non_empty, FindGuildQuery, GuildQuery, PlayerRef};
use crate::domain::model::{
    Boosters, FindGuild, Friends, Games, Guild, KeyInfo, Leaderboards, Player, PlayerStatus,
    RecentGames, SkyblockActiveAuction, SkyblockBazaar, SkyblockNews, SkyblockProfile,
    SkyblockUserAuction, WatchdogInfo,
};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use reqwest::blocking::Client;
use serde_json::Value;
use std::sync::Arc;
use url::Url;

#[derive(Debug, Clone)]
pub struct BlockingConverter {
    http: Client,
    core: MojangCore,
}

impl BlockingConverter {
    pub fn new() -> Result<Self> {
        Self::with_config(&ClientConfig::default(), None)
    }

    pub fn with_config(config: &ClientConfig, cache: Option<ResponseCache>) -> Result<Self> {
        Ok(Self {
            http: transport::http_client(config)?,
            core: MojangCore::new(config.mojang_api_url.clone(), cache),
        })
    }

    pub fn username_to_uuid(&self, username: &str) -> Result<String> {
        self.lookup(Lookup::UsernameToUuid, username)
    }

    pub fn uuid_to_username(&self, uuid: &str) -> Result<String> {
        self.lookup(Lookup::UuidToUsername, uuid)
    }

    fn lookup(&self, lookup: Lookup, input: &str) -> Result<String> {
        let (subject, url) = self.core.url(lookup, input)?;
        if let Some(found) = self.core.cached(lookup, &url) {
            return Ok(found);
        }
        let outcome = transport::get(&self.http, &url, None);
        self.core.complete(lookup, &url, &subject, outcome)
    }
}

#[derive(Clone)]
pub struct BlockingClient {
    http: Client,
    core: Arc<RequestCore>,
    converter: BlockingConverter,
}

impl BlockingClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::new(api_key))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let cache = config
            .cache
            .as_ref()
            .map(ResponseCache::from_config)
            .transpose()?;
        Self::with_cache(config, cache)
    }

    pub fn with_cache(config: ClientConfig, cache: Option<ResponseCache>) -> Result<Self> {
        let http = transport::http_client(&config)?;
        let converter = BlockingConverter {
            http: http.clone(),
            core: MojangCore::new(config.mojang_api_url.clone(), cache.clone()),
        };
        Ok(Self {
            http,
            core: Arc::new(RequestCore::new(config, cache)?),
            converter,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        self.core.config()
    }

    pub fn converter(&self) -> &BlockingConverter {
        &self.converter
    }

    pub fn cache(&self) -> Option<&ResponseCache> {
        self.core.cache()
    }

    pub fn rate_limit(&self) -> RateLimitStatus {
        self.core.rate_limit()
    }

    pub fn add_key<I, S>(&self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.core.keys().add(keys);
    }

    pub fn remove_key<I, S>(&self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.core.keys().remove(keys);
    }

    pub fn keys(&self) -> Vec<String> {
        self.core.keys().snapshot()
    }

    fn fetch(
        &self,
        endpoint: Endpoint,
        params: &[(&str, String)],
        subject: Option<&str>,
        api_key: Option<&str>,
    ) -> Result<Value> {
        match self.core.prepare(endpoint, params, subject, api_key)? {
            Prepared::Ready(value) => Ok(value),
            Prepared::Send(request) => {
                let outcome = transport::get(&self.http, &request.url, request.api_key.as_deref());
                self.core.complete(&request, outcome)
            }
        }
    }

    pub fn resolve(&self, player: &PlayerRef) -> Result<String> {
        match player {
            PlayerRef::Uuid(uuid) => normalize_uuid(uuid),
            PlayerRef::Name(name) => self.converter.username_to_uuid(name),
        }
    }

    fn fetch_for_player(
        &self,
        endpoint: Endpoint,
        param: &str,
        player: &PlayerRef,
    ) -> Result<Value> {
        let uuid = self.resolve(player)?;
        self.fetch(endpoint, &[(param, uuid)], Some(player.as_str()), None)
    }

    pub fn get_key_info(&self, api_key: Option<&str>) -> Result<KeyInfo> {
        records::key_info(self.fetch(Endpoint::Key, &[], None, api_key)?)
    }

    pub fn get_boosters(&self) -> Result<Boosters> {
        records::boosters(self.fetch(Endpoint::Boosters, &[], None, None)?)
    }

    pub fn get_player(&self, player: impl Into<PlayerRef>) -> Result<Player> {
        let player = player.into();
        let body = self.fetch_for_player(Endpoint::Player, "uuid", &player)?;
        records::player(body, player.as_str())
    }

    pub fn get_friends(&self, player: impl Into<PlayerRef>) -> Result<Friends> {
        records::friends(self.fetch_for_player(Endpoint::Friends, "uuid", &player.into())?)
    }

    pub fn get_watchdog_info(&self) -> Result<WatchdogInfo> {
        records::watchdog(self.fetch(Endpoint::Watchdog, &[], None, None)?)
    }

    pub fn get_guild(&self, query: GuildQuery) -> Result<Guild> {
        let (param, value, subject) = match &query {
            GuildQuery::Id(id) => {
                let id = require_non_empty(id, "guild ID")?;
                ("id", id.to_string(), id.to_string())
            }
            GuildQuery::Name(name) => {
                let name = require_non_empty(name, "guild name")?;
                ("name", name.to_string(), name.to_string())
            }
            GuildQuery::Player(player) => ("player", self.resolve(player)?, player.to_string()),
        };
        let body = self.fetch(Endpoint::Guild, &[(param, value)], Some(&subject), None)?;
        records::guild(body, &subject)
    }

    pub fn find_guild(&self, query: FindGuildQuery) -> Result<FindGuild> {
        let (param, value, subject) = match &query {
            FindGuildQuery::ByName(name) => {
                let name = require_non_empty(name, "guild name")?;
                ("byName", name.to_string(), name.to_string())
            }
            FindGuildQuery::ByPlayer(player) => {
                ("byUuid", self.resolve(player)?, player.to_string())
            }
        };
        let body = self.fetch(Endpoint::FindGuild, &[(param, value)], Some(&subject), None)?;
        records::find_guild(body)
    }

    pub fn get_games_info(&self) -> Result<Games> {
        records::games(self.fetch(Endpoint::GameCounts, &[], None, None)?)
    }

    pub fn get_leaderboards(&self) -> Result<Leaderboards> {
        records::leaderboards(self.fetch(Endpoint::Leaderboards, &[], None, None)?)
    }

    pub fn get_player_status(&self, player: impl Into<PlayerRef>) -> Result<PlayerStatus> {
        records::status(self.fetch_for_player(Endpoint::Status, "uuid", &player.into())?)
    }

    pub fn get_player_recent_games(&self, player: impl Into<PlayerRef>) -> Result<RecentGames> {
        records::recent_games(self.fetch_for_player(Endpoint::RecentGames, "uuid", &player.into())?)
    }

    pub fn get_skyblock_profile(&self, profile_id: &str) -> Result<SkyblockProfile> {
        let profile_id = require_non_empty(profile_id, "SkyBlock profile ID")?;
        let body = self.fetch(
            Endpoint::SkyblockProfile,
            &[("profile", profile_id.to_string())],
            Some(profile_id),
            None,
        )?;
        records::skyblock_profile(body, profile_id)
    }

    pub fn get_skyblock_profiles(&self, player: impl Into<PlayerRef>) -> Result<Vec<SkyblockProfile>> {
        records::skyblock_profiles(self.fetch_for_player(
            Endpoint::SkyblockProfiles,
            "uuid",
            &player.into(),
        )?)
    }

    pub fn get_skyblock_user_auctions(
        &self,
        player: impl Into<PlayerRef>,
    ) -> Result<SkyblockUserAuction> {
        let player = player.into();
        let body = self.fetch_for_player(Endpoint::SkyblockUserAuctions, "player", &player)?;
        records::skyblock_user_auctions(body, player.as_str())
    }

    pub fn get_skyblock_active_auctions(&self, page: u32) -> Result<SkyblockActiveAuction> {
        records::skyblock_active_auctions(self.fetch(
            Endpoint::SkyblockActiveAuctions,
            &[("page", page.to_string())],
            None,
            None,
        )?)
    }

    pub fn get_skyblock_bazaar(&self) -> Result<SkyblockBazaar> {
        records::skyblock_bazaar(self.fetch(Endpoint::SkyblockBazaar, &[], None, None)?)
    }

    pub fn get_skyblock_news(&self) -> Result<SkyblockNews> {
        records::skyblock_news(self.fetch(Endpoint::SkyblockNews, &[], None, None)?)
    }

    pub fn get_resources_achievements(&self) -> Result<Value> {
        let body = self.fetch(Endpoint::ResourceAchievements, &[], None, None)?;
        Ok(records::resource(body, "achievements"))
    }

    pub fn get_resources_challenges(&self) -> Result<Value> {
        let body = self.fetch(Endpoint::ResourceChallenges, &[], None, None)?;
        Ok(records::resource(body, "challenges"))
    }

    pub fn get_resources_quests(&self) -> Result<Value> {
        let body = self.fetch(Endpoint::ResourceQuests, &[], None, None)?;
        Ok(records::resource(body, "quests"))
    }

    pub fn get_resources_guild_achievements(&self) -> Result<Value> {
        let body = self.fetch(Endpoint::ResourceGuildAchievements, &[], None, None)?;
        Ok(records::guild_achievements(body))
    }

    pub fn get_skin_url(&self, player: impl Into<PlayerRef>, kind: SkinKind) -> Result<Url> {
        let uuid = self.resolve(&player.into())?;
        let url = skins::skin_url(&self.config().crafatar_url, kind, &uuid)?;
        let raw = transport::get(&self.http, &url, None)?;
        skins::verify(url, &raw)
    }
}
