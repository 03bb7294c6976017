use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkyblockProfileMember {
    #[serde(default)]
    pub coin_purse: f64,
    #[serde(default)]
    pub death_count: u64,
    #[serde(default)]
    pub stats: HashMap<String, f64>,
    #[serde(default)]
    pub objectives: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub crafted_generators: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkyblockProfile {
    pub profile_id: String,
    #[serde(default)]
    pub cute_name: Option<String>,
    /// Members keyed by player UUID.
    #[serde(default)]
    pub members: HashMap<String, SkyblockProfileMember>,
    #[serde(default)]
    pub community_upgrades: Option<serde_json::Value>,
}

impl SkyblockProfile {
    pub fn member(&self, uuid: &str) -> Option<&SkyblockProfileMember> {
        self.members.get(uuid)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl PartialEq for SkyblockProfile {
    fn eq(&self, other: &Self) -> bool {
        self.profile_id == other.profile_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuctionBid {
    pub bidder: String,
    #[serde(default)]
    pub profile_id: Option<String>,
    pub amount: u64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkyblockAuction {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    pub uuid: String,
    pub auctioneer: String,
    #[serde(default)]
    pub profile_id: Option<String>,
    pub item_name: String,
    #[serde(default)]
    pub item_lore: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default)]
    pub starting_bid: u64,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub claimed: bool,
    #[serde(default)]
    pub claimed_bidders: Vec<String>,
    #[serde(default)]
    pub bids: Vec<AuctionBid>,
    #[serde(default)]
    pub highest_bid_amount: u64,
    #[serde(default)]
    pub bin: bool,
}

impl SkyblockAuction {
    pub fn highest_bid(&self) -> Option<&AuctionBid> {
        self.bids.iter().max_by_key(|bid| bid.amount)
    }
}

impl PartialEq for SkyblockAuction {
    fn eq(&self, other: &Self) -> bool {
        self.uuid == other.uuid
    }
}

impl Eq for SkyblockAuction {}

impl Hash for SkyblockAuction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uuid.hash(state);
    }
}

/// One page of the auction house.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkyblockActiveAuction {
    pub page: u32,
    pub total_pages: u32,
    pub total_auctions: u64,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub auctions: Vec<SkyblockAuction>,
}

impl SkyblockActiveAuction {
    pub fn has_next_page(&self) -> bool {
        self.page + 1 < self.total_pages
    }

    pub fn len(&self) -> usize {
        self.auctions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.auctions.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkyblockUserAuction {
    #[serde(default)]
    pub auctions: Vec<SkyblockAuction>,
}

impl SkyblockUserAuction {
    pub fn len(&self) -> usize {
        self.auctions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.auctions.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkyblockBazaarItem {
    pub product_id: String,
    #[serde(default)]
    pub sell_price: f64,
    #[serde(default)]
    pub sell_volume: u64,
    #[serde(default)]
    pub sell_moving_week: u64,
    #[serde(default)]
    pub sell_orders: u64,
    #[serde(default)]
    pub buy_price: f64,
    #[serde(default)]
    pub buy_volume: u64,
    #[serde(default)]
    pub buy_moving_week: u64,
    #[serde(default)]
    pub buy_orders: u64,
}

impl PartialEq for SkyblockBazaarItem {
    fn eq(&self, other: &Self) -> bool {
        self.product_id == other.product_id
    }
}

impl Eq for SkyblockBazaarItem {}

impl Hash for SkyblockBazaarItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.product_id.hash(state);
    }
}

#[derive(Deserialize)]
struct RawBazaarProduct {
    quick_status: SkyblockBazaarItem,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBazaar {
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    products: HashMap<String, RawBazaarProduct>,
}

/// Bazaar quick status per product id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "RawBazaar")]
pub struct SkyblockBazaar {
    pub last_updated: Option<DateTime<Utc>>,
    pub products: HashMap<String, SkyblockBazaarItem>,
}

impl From<RawBazaar> for SkyblockBazaar {
    fn from(raw: RawBazaar) -> Self {
        Self {
            last_updated: raw.last_updated,
            products: raw
                .products
                .into_iter()
                .map(|(id, product)| (id, product.quick_status))
                .collect(),
        }
    }
}

impl SkyblockBazaar {
    pub fn get(&self, product_id: &str) -> Option<&SkyblockBazaarItem> {
        self.products.get(product_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub item: serde_json::Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkyblockNews {
    #[serde(rename = "items", default)]
    pub news: Vec<NewsItem>,
}

impl SkyblockNews {
    pub fn len(&self) -> usize {
        self.news.len()
    }

    pub fn is_empty(&self) -> bool {
        self.news.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bazaar_flattens_quick_status() {
        let bazaar: SkyblockBazaar = serde_json::from_value(json!({
            "success": true,
            "lastUpdated": 1_600_000_000_000_i64,
            "products": {
                "ENCHANTED_COAL": {
                    "product_id": "ENCHANTED_COAL",
                    "sell_summary": [],
                    "buy_summary": [],
                    "quick_status": {
                        "productId": "ENCHANTED_COAL",
                        "sellPrice": 301.5,
                        "sellVolume": 1000,
                        "sellMovingWeek": 50000,
                        "sellOrders": 12,
                        "buyPrice": 310.1,
                        "buyVolume": 2000,
                        "buyMovingWeek": 60000,
                        "buyOrders": 20
                    }
                }
            }
        }))
        .unwrap();

        let coal = bazaar.get("ENCHANTED_COAL").unwrap();
        assert_eq!(coal.sell_orders, 12);
        assert_eq!(coal.buy_price, 310.1);
        assert_eq!(bazaar.last_updated.unwrap().timestamp(), 1_600_000_000);
    }

    #[test]
    fn test_active_auction_page() {
        let page: SkyblockActiveAuction = serde_json::from_value(json!({
            "success": true,
            "page": 0,
            "totalPages": 3,
            "totalAuctions": 2500,
            "lastUpdated": 1_600_000_000_000_i64,
            "auctions": [{
                "uuid": "a1",
                "auctioneer": "p1",
                "profile_id": "prof",
                "item_name": "Aspect of the End",
                "item_lore": "§9Aspect of the End",
                "tier": "RARE",
                "starting_bid": 100000,
                "bids": [
                    { "bidder": "x", "amount": 120000, "timestamp": 1_600_000_000_000_i64 },
                    { "bidder": "y", "amount": 150000, "timestamp": 1_600_000_100_000_i64 }
                ],
                "highest_bid_amount": 150000
            }]
        }))
        .unwrap();

        assert!(page.has_next_page());
        assert_eq!(page.len(), 1);
        assert_eq!(page.auctions[0].highest_bid().unwrap().bidder, "y");
    }
}
