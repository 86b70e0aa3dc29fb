//! Raw REST response types.
//!
//! The exchange encodes numbers as JSON strings. Numeric fields here go
//! through a lenient decoder that also accepts JSON numbers and null, and
//! falls back to zero instead of failing the whole response.

use mktscan_core::{
    parse_decimal_or_zero, BookLevel, Instrument, MarketSummary, OrderBook, Price, Size,
    TickerSnapshot, TradingStatus,
};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Deserialize a decimal from a string, number, or null. Zero on failure.
fn lenient_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct LenientDecimalVisitor;

    impl<'de> Visitor<'de> for LenientDecimalVisitor {
        type Value = Decimal;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string, number, or null")
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Decimal::ZERO)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Decimal::ZERO)
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(parse_decimal_or_zero(v))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            // Go through the shortest round-trip string to avoid binary noise.
            Ok(parse_decimal_or_zero(&v.to_string()))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Decimal::from(v))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Decimal::from(v))
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            deserializer.deserialize_any(self)
        }
    }

    deserializer.deserialize_any(LenientDecimalVisitor)
}

/// `GET /api/v3/exchangeInfo` response (subset).
#[derive(Debug, Deserialize)]
pub struct RawExchangeInfo {
    #[serde(default)]
    pub symbols: Vec<RawSymbolInfo>,
}

/// One catalog entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSymbolInfo {
    pub symbol: String,
    #[serde(default)]
    pub status: Option<TradingStatus>,
    #[serde(default)]
    pub base_asset: String,
    #[serde(default)]
    pub quote_asset: String,
}

impl From<RawSymbolInfo> for Instrument {
    fn from(raw: RawSymbolInfo) -> Self {
        Instrument::new(
            raw.symbol,
            raw.base_asset,
            raw.quote_asset,
            raw.status.unwrap_or(TradingStatus::NotTradable),
        )
    }
}

/// `GET /api/v3/ticker/24hr` entry (subset).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTicker24h {
    pub symbol: String,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub price_change: Decimal,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub price_change_percent: Decimal,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub last_price: Decimal,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub high_price: Decimal,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub low_price: Decimal,
    /// Base-asset volume.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub volume: Decimal,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub quote_volume: Decimal,
}

impl From<RawTicker24h> for TickerSnapshot {
    fn from(raw: RawTicker24h) -> Self {
        Self {
            symbol: raw.symbol,
            last_price: Price::new(raw.last_price),
            quote_volume: raw.quote_volume,
            volume: raw.volume,
            price_change_percent: raw.price_change_percent,
        }
    }
}

impl From<RawTicker24h> for MarketSummary {
    fn from(raw: RawTicker24h) -> Self {
        Self {
            symbol: raw.symbol,
            last_price: Price::new(raw.last_price),
            price_change: raw.price_change,
            price_change_percent: raw.price_change_percent,
            high_price: Price::new(raw.high_price),
            low_price: Price::new(raw.low_price),
            volume: raw.volume,
            quote_volume: raw.quote_volume,
        }
    }
}

/// `GET /api/v3/ticker/price` response.
#[derive(Debug, Deserialize)]
pub struct RawPriceTicker {
    pub symbol: String,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub price: Decimal,
}

/// One `[price, quantity]` book level.
#[derive(Debug, Deserialize)]
pub struct RawLevel(
    #[serde(deserialize_with = "lenient_decimal")] pub Decimal,
    #[serde(deserialize_with = "lenient_decimal")] pub Decimal,
);

/// `GET /api/v3/depth` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDepth {
    #[serde(default)]
    pub last_update_id: u64,
    #[serde(default)]
    pub bids: Vec<RawLevel>,
    #[serde(default)]
    pub asks: Vec<RawLevel>,
}

impl RawDepth {
    /// Convert into a book for `symbol`, keeping level order as received.
    pub fn into_order_book(self, symbol: impl Into<String>) -> OrderBook {
        let level = |raw: RawLevel| BookLevel::new(Price::new(raw.0), Size::new(raw.1));
        OrderBook {
            symbol: symbol.into(),
            last_update_id: self.last_update_id,
            bids: self.bids.into_iter().map(level).collect(),
            asks: self.asks.into_iter().map(level).collect(),
        }
    }
}
