//! Typed records mirroring the upstream JSON schemas.

pub mod cache;
pub mod guild;
pub mod network;
pub mod player;
pub mod skyblock;
pub mod social;

pub use cache::CacheEntry;
pub use guild::{FindGuild, Guild, GuildMember};
pub use network::{
    BoosterInfo, BoosterState, Boosters, GameCount, Games, KeyInfo, LeaderboardData, Leaderboards,
    WatchdogInfo,
};
pub use player::{Player, PlayerChallenges, SocialMedia};
pub use skyblock::{
    AuctionBid, NewsItem, SkyblockActiveAuction, SkyblockAuction, SkyblockBazaar,
    SkyblockBazaarItem, SkyblockNews, SkyblockProfile, SkyblockProfileMember, SkyblockUserAuction,
};
pub use social::{FriendData, Friends, PlayerStatus, RecentGame, RecentGames, Session};
