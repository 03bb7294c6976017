#[cfg(feature = "blocking")]
pub mod blocking;
pub mod client;
pub mod converters;
pub mod endpoint;
pub mod ratelimit;
pub mod records;
pub mod request;
pub mod skins;
pub mod transport;

#[cfg(feature = "blocking")]
pub use blocking::{BlockingClient, BlockingConverter};
pub use client::HypixelClient;
pub use converters::Converter;
pub use endpoint::Endpoint;
pub use ratelimit::RateLimitStatus;
pub use skins::SkinKind;
