//! Command line surface of the `hypixelio` binary.

use crate::config::toml_config::TomlConfig;
use crate::config::ClientConfig;
use crate::core::{HypixelClient, SkinKind};
use crate::domain::lookup::{FindGuildQuery, GuildQuery, PlayerRef};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "hypixelio")]
#[command(version, about = "Query Hypixel network statistics from the command line")]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Hypixel API key, added to the keys from the configuration file
    #[arg(short, long, env = "HYPIXEL_KEY", hide_env_values = true)]
    pub key: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Ignore any cache configured in the configuration file
    #[arg(long)]
    pub no_cache: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Args)]
pub struct PlayerArgs {
    /// Player name or UUID
    pub player: String,

    /// Treat the argument as a UUID even if it does not look like one
    #[arg(long)]
    pub uuid: bool,
}

impl PlayerArgs {
    pub fn player_ref(&self) -> PlayerRef {
        if self.uuid {
            PlayerRef::uuid(self.player.trim())
        } else {
            PlayerRef::parse(&self.player)
        }
    }
}

#[derive(Debug, Clone, Args)]
#[group(required = true, multiple = false)]
pub struct GuildArgs {
    #[arg(long)]
    pub id: Option<String>,

    #[arg(long)]
    pub name: Option<String>,

    /// Name or UUID of a guild member
    #[arg(long)]
    pub player: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResourceKind {
    Achievements,
    Challenges,
    Quests,
    GuildAchievements,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Player profile
    Player(PlayerArgs),
    /// Friend list of a player
    Friends(PlayerArgs),
    /// Online status and current game
    Status(PlayerArgs),
    /// Recently played games
    RecentGames(PlayerArgs),
    /// Guild by id, name or member
    Guild(GuildArgs),
    /// Guild id by name or member
    FindGuild {
        #[arg(long, conflicts_with = "player", required_unless_present = "player")]
        name: Option<String>,
        #[arg(long)]
        player: Option<String>,
    },
    /// Usage of an API key
    Key {
        /// Key to inspect instead of the configured one
        key: Option<String>,
    },
    /// Active network boosters
    Boosters,
    /// Anti-cheat ban statistics
    Watchdog,
    /// Player counts per game
    Counts,
    Leaderboards,
    /// SkyBlock profile by profile id
    SkyblockProfile { profile_id: String },
    /// Every SkyBlock profile of a player
    SkyblockProfiles(PlayerArgs),
    /// Auctions started by a player
    SkyblockAuctions(PlayerArgs),
    /// One page of the auction house
    SkyblockActiveAuctions {
        #[arg(long, default_value_t = 0)]
        page: u32,
    },
    SkyblockBazaar,
    SkyblockNews,
    /// Static game resources
    Resources {
        #[arg(value_enum)]
        kind: ResourceKind,
    },
    /// Convert a name to a UUID
    Uuid { name: String },
    /// Convert a UUID to the current name
    Name { uuid: String },
    /// Crafatar render URL of a player's skin
    Avatar {
        #[command(flatten)]
        player: PlayerArgs,
        #[arg(long, default_value = "avatar")]
        kind: SkinKind,
    },
}

impl Cli {
    /// Configuration file (if any) merged with the command line overrides.
    pub fn client_config(&self) -> Result<(ClientConfig, Option<TomlConfig>)> {
        let file = match &self.config {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path.display());
                let file = TomlConfig::from_file(path)?;
                file.validate()?;
                Some(file)
            }
            None => None,
        };

        let mut config = file
            .clone()
            .map(TomlConfig::into_client_config)
            .unwrap_or_default();
        if let Some(key) = self.key.as_deref().filter(|key| !key.trim().is_empty()) {
            if !config.api_keys.iter().any(|existing| existing == key) {
                config.api_keys.insert(0, key.to_string());
            }
        }
        if self.no_cache {
            config.cache = None;
        }
        config.validate()?;
        Ok((config, file))
    }
}

fn to_json<T: Serialize>(record: &T) -> Result<Value> {
    Ok(serde_json::to_value(record)?)
}

/// Runs one command and returns its result as JSON.
pub async fn execute(client: &HypixelClient, command: &Command) -> Result<Value> {
    match command {
        Command::Player(args) => to_json(&client.get_player(args.player_ref()).await?),
        Command::Friends(args) => to_json(&client.get_friends(args.player_ref()).await?),
        Command::Status(args) => to_json(&client.get_player_status(args.player_ref()).await?),
        Command::RecentGames(args) => {
            to_json(&client.get_player_recent_games(args.player_ref()).await?)
        }
        Command::Guild(args) => {
            let query = match (&args.id, &args.name, &args.player) {
                (Some(id), _, _) => GuildQuery::id(id.as_str()),
                (_, Some(name), _) => GuildQuery::name(name.as_str()),
                (_, _, Some(player)) => GuildQuery::player(player.as_str()),
                // clap requires exactly one of the three
                (None, None, None) => GuildQuery::name(""),
            };
            to_json(&client.get_guild(query).await?)
        }
        Command::FindGuild { name, player } => {
            let query = match (name, player) {
                (_, Some(player)) => FindGuildQuery::ByPlayer(PlayerRef::parse(player)),
                (name, None) => FindGuildQuery::ByName(name.clone().unwrap_or_default()),
            };
            to_json(&client.find_guild(query).await?)
        }
        Command::Key { key } => to_json(&client.get_key_info(key.as_deref()).await?),
        Command::Boosters => to_json(&client.get_boosters().await?),
        Command::Watchdog => to_json(&client.get_watchdog_info().await?),
        Command::Counts => to_json(&client.get_games_info().await?),
        Command::Leaderboards => to_json(&client.get_leaderboards().await?),
        Command::SkyblockProfile { profile_id } => {
            to_json(&client.get_skyblock_profile(profile_id).await?)
        }
        Command::SkyblockProfiles(args) => {
            to_json(&client.get_skyblock_profiles(args.player_ref()).await?)
        }
        Command::SkyblockAuctions(args) => {
            to_json(&client.get_skyblock_user_auctions(args.player_ref()).await?)
        }
        Command::SkyblockActiveAuctions { page } => {
            to_json(&client.get_skyblock_active_auctions(*page).await?)
        }
        Command::SkyblockBazaar => to_json(&client.get_skyblock_bazaar().await?),
        Command::SkyblockNews => to_json(&client.get_skyblock_news().await?),
        Command::Resources { kind } => match kind {
            ResourceKind::Achievements => client.get_resources_achievements().await,
            ResourceKind::Challenges => client.get_resources_challenges().await,
            ResourceKind::Quests => client.get_resources_quests().await,
            ResourceKind::GuildAchievements => client.get_resources_guild_achievements().await,
        },
        Command::Uuid { name } => Ok(serde_json::json!({
            "name": name,
            "uuid": client.converter().username_to_uuid(name).await?,
        })),
        Command::Name { uuid } => Ok(serde_json::json!({
            "uuid": uuid,
            "name": client.converter().uuid_to_username(uuid).await?,
        })),
        Command::Avatar { player, kind } => {
            let url = client.get_skin_url(player.player_ref(), *kind).await?;
            Ok(serde_json::json!({ "kind": kind, "url": url.as_str() }))
        }
    }
}
