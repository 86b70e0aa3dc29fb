//! Display-oriented records derived from exchange data.

use crate::Price;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

fn price_as_float<S>(price: &Price, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    rust_decimal::serde::float::serialize(&price.inner(), serializer)
}

/// A ranked, display-ready instrument.
///
/// Field names follow the coin-listing shape consumed by front ends, and
/// numeric fields serialize as JSON numbers to match it.
/// `market_cap` is the 24h quote volume, used as a proxy: the exchange does
/// not report circulating supply, so `market_cap_rank` is always 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedToken {
    /// Exchange symbol (e.g., "BTCUSDT"). Unique within one ranking.
    pub id: String,
    /// Base asset code.
    pub symbol: String,
    /// Base asset code (the exchange has no long names).
    pub name: String,
    /// Icon URL derived from the lowercased base asset.
    pub image: String,
    #[serde(serialize_with = "price_as_float")]
    pub current_price: Price,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub market_cap: Decimal,
    pub market_cap_rank: u32,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub price_change_percentage_24h: Decimal,
    /// 24h base-asset volume.
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub total_volume: Decimal,
    pub base_asset: String,
    pub quote_asset: String,
}

/// Last-price notification pushed from the ticker stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceUpdate {
    pub symbol: String,
    pub price: Price,
    /// Local receive time.
    pub received_at: DateTime<Utc>,
}

impl PriceUpdate {
    pub fn new(symbol: impl Into<String>, price: Price) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            received_at: Utc::now(),
        }
    }
}
