use crate::adapters::cache::ResponseCache;
use crate::config::ClientConfig;
use crate::core::converters::{Converter, MojangCore};
use crate::core::endpoint::Endpoint;
use crate::core::ratelimit::RateLimitStatus;
use crate::core::records;
use crate::core::request::{Prepared, RequestCore};
use crate::core::skins::{self, SkinKind};
use crate::core::transport;
use crate::domain::lookup::{normalize_uuid, require_non_empty, FindGuildQuery, GuildQuery, PlayerRef};
use crate::domain::model::{
    Boosters, FindGuild, Friends, Games, Guild, KeyInfo, Leaderboards, Player, PlayerStatus,
    RecentGames, SkyblockActiveAuction, SkyblockBazaar, SkyblockNews, SkyblockProfile,
    SkyblockUserAuction, WatchdogInfo,
};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use url::Url;

/// Async Hypixel API client. Cloning is cheap and clones share keys, rate
/// limit state and cache.
#[derive(Clone)]
pub struct HypixelClient {
    http: Client,
    core: Arc<RequestCore>,
    converter: Converter,
}

impl HypixelClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::new(api_key))
    }

    /// Builds the client and, when `config.cache` is set, its cache backend.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let cache = config
            .cache
            .as_ref()
            .map(ResponseCache::from_config)
            .transpose()?;
        Self::with_cache(config, cache)
    }

    /// Uses an already built cache, e.g. one shared with another client.
    pub fn with_cache(config: ClientConfig, cache: Option<ResponseCache>) -> Result<Self> {
        let http = transport::http_client(&config)?;
        let converter = Converter::from_parts(
            http.clone(),
            MojangCore::new(config.mojang_api_url.clone(), cache.clone()),
        );
        Ok(Self {
            http,
            core: Arc::new(RequestCore::new(config, cache)?),
            converter,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        self.core.config()
    }

    pub fn converter(&self) -> &Converter {
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

    async fn fetch(
        &self,
        endpoint: Endpoint,
        params: &[(&str, String)],
        subject: Option<&str>,
        api_key: Option<&str>,
    ) -> Result<Value> {
        match self.core.prepare(endpoint, params, subject, api_key)? {
            Prepared::Ready(value) => Ok(value),
            Prepared::Send(request) => {
                let outcome =
                    transport::get(&self.http, &request.url, request.api_key.as_deref()).await;
                self.core.complete(&request, outcome)
            }
        }
    }

    /// Resolves a player reference to the undashed UUID, asking Mojang for
    /// names.
    pub async fn resolve(&self, player: &PlayerRef) -> Result<String> {
        match player {
            PlayerRef::Uuid(uuid) => normalize_uuid(uuid),
            PlayerRef::Name(name) => self.converter.username_to_uuid(name).await,
        }
    }

    /// Usage of `api_key`, or of the next key in rotation.
    pub async fn get_key_info(&self, api_key: Option<&str>) -> Result<KeyInfo> {
        let body = self.fetch(Endpoint::Key, &[], None, api_key).await?;
        records::key_info(body)
    }

    pub async fn get_boosters(&self) -> Result<Boosters> {
        let body = self.fetch(Endpoint::Boosters, &[], None, None).await?;
        records::boosters(body)
    }

    pub async fn get_player(&self, player: impl Into<PlayerRef>) -> Result<Player> {
        let player = player.into();
        let uuid = self.resolve(&player).await?;
        let body = self
            .fetch(Endpoint::Player, &[("uuid", uuid)], Some(player.as_str()), None)
            .await?;
        records::player(body, player.as_str())
    }

    pub async fn get_friends(&self, player: impl Into<PlayerRef>) -> Result<Friends> {
        let player = player.into();
        let uuid = self.resolve(&player).await?;
        let body = self
            .fetch(Endpoint::Friends, &[("uuid", uuid)], Some(player.as_str()), None)
            .await?;
        records::friends(body)
    }

    pub async fn get_watchdog_info(&self) -> Result<WatchdogInfo> {
        let body = self.fetch(Endpoint::Watchdog, &[], None, None).await?;
        records::watchdog(body)
    }

    pub async fn get_guild(&self, query: GuildQuery) -> Result<Guild> {
        let (param, value, subject) = match &query {
            GuildQuery::Id(id) => {
                let id = require_non_empty(id, "guild ID")?;
                ("id", id.to_string(), id.to_string())
            }
            GuildQuery::Name(name) => {
                let name = require_non_empty(name, "guild name")?;
                ("name", name.to_string(), name.to_string())
            }
            GuildQuery::Player(player) => {
                ("player", self.resolve(player).await?, player.to_string())
            }
        };
        let body = self
            .fetch(Endpoint::Guild, &[(param, value)], Some(&subject), None)
            .await?;
        records::guild(body, &subject)
    }

    pub async fn find_guild(&self, query: FindGuildQuery) -> Result<FindGuild> {
        let (param, value, subject) = match &query {
            FindGuildQuery::ByName(name) => {
                let name = require_non_empty(name, "guild name")?;
                ("byName", name.to_string(), name.to_string())
            }
            FindGuildQuery::ByPlayer(player) => {
                ("byUuid", self.resolve(player).await?, player.to_string())
            }
        };
        let body = self
            .fetch(Endpoint::FindGuild, &[(param, value)], Some(&subject), None)
            .await?;
        records::find_guild(body)
    }

    pub async fn get_games_info(&self) -> Result<Games> {
        let body = self.fetch(Endpoint::GameCounts, &[], None, None).await?;
        records::games(body)
    }

    pub async fn get_leaderboards(&self) -> Result<Leaderboards> {
        let body = self.fetch(Endpoint::Leaderboards, &[], None, None).await?;
        records::leaderboards(body)
    }

    pub async fn get_player_status(&self, player: impl Into<PlayerRef>) -> Result<PlayerStatus> {
        let player = player.into();
        let uuid = self.resolve(&player).await?;
        let body = self
            .fetch(Endpoint::Status, &[("uuid", uuid)], Some(player.as_str()), None)
            .await?;
        records::status(body)
    }

    pub async fn get_player_recent_games(
        &self,
        player: impl Into<PlayerRef>,
    ) -> Result<RecentGames> {
        let player = player.into();
        let uuid = self.resolve(&player).await?;
        let body = self
            .fetch(Endpoint::RecentGames, &[("uuid", uuid)], Some(player.as_str()), None)
            .await?;
        records::recent_games(body)
    }

    pub async fn get_skyblock_profile(&self, profile_id: &str) -> Result<SkyblockProfile> {
        let profile_id = require_non_empty(profile_id, "SkyBlock profile ID")?;
        let body = self
            .fetch(
                Endpoint::SkyblockProfile,
                &[("profile", profile_id.to_string())],
                Some(profile_id),
                None,
            )
            .await?;
        records::skyblock_profile(body, profile_id)
    }

    /// Every SkyBlock profile the player is a member of.
    pub async fn get_skyblock_profiles(
        &self,
        player: impl Into<PlayerRef>,
    ) -> Result<Vec<SkyblockProfile>> {
        let player = player.into();
        let uuid = self.resolve(&player).await?;
        let body = self
            .fetch(
                Endpoint::SkyblockProfiles,
                &[("uuid", uuid)],
                Some(player.as_str()),
                None,
            )
            .await?;
        records::skyblock_profiles(body)
    }

    pub async fn get_skyblock_user_auctions(
        &self,
        player: impl Into<PlayerRef>,
    ) -> Result<SkyblockUserAuction> {
        let player = player.into();
        let uuid = self.resolve(&player).await?;
        let body = self
            .fetch(
                Endpoint::SkyblockUserAuctions,
                &[("player", uuid)],
                Some(player.as_str()),
                None,
            )
            .await?;
        records::skyblock_user_auctions(body, player.as_str())
    }

    pub async fn get_skyblock_active_auctions(&self, page: u32) -> Result<SkyblockActiveAuction> {
        let body = self
            .fetch(
                Endpoint::SkyblockActiveAuctions,
                &[("page", page.to_string())],
                None,
                None,
            )
            .await?;
        records::skyblock_active_auctions(body)
    }

    pub async fn get_skyblock_bazaar(&self) -> Result<SkyblockBazaar> {
        let body = self.fetch(Endpoint::SkyblockBazaar, &[], None, None).await?;
        records::skyblock_bazaar(body)
    }

    pub async fn get_skyblock_news(&self) -> Result<SkyblockNews> {
        let body = self.fetch(Endpoint::SkyblockNews, &[], None, None).await?;
        records::skyblock_news(body)
    }

    pub async fn get_resources_achievements(&self) -> Result<Value> {
        let body = self
            .fetch(Endpoint::ResourceAchievements, &[], None, None)
            .await?;
        Ok(records::resource(body, "achievements"))
    }

    pub async fn get_resources_challenges(&self) -> Result<Value> {
        let body = self
            .fetch(Endpoint::ResourceChallenges, &[], None, None)
            .await?;
        Ok(records::resource(body, "challenges"))
    }

    pub async fn get_resources_quests(&self) -> Result<Value> {
        let body = self.fetch(Endpoint::ResourceQuests, &[], None, None).await?;
        Ok(records::resource(body, "quests"))
    }

    pub async fn get_resources_guild_achievements(&self) -> Result<Value> {
        let body = self
            .fetch(Endpoint::ResourceGuildAchievements, &[], None, None)
            .await?;
        Ok(records::guild_achievements(body))
    }

    /// Crafatar render URL for the player, checked to actually resolve.
    pub async fn get_skin_url(&self, player: impl Into<PlayerRef>, kind: SkinKind) -> Result<Url> {
        let uuid = self.resolve(&player.into()).await?;
        let url = skins::skin_url(&self.config().crafatar_url, kind, &uuid)?;
        let raw = transport::get(&self.http, &url, None).await?;
        skins::verify(url, &raw)
    }
}
