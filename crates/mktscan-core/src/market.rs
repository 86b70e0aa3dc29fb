//! Exchange-reported market snapshots.
//!
//! Instruments, 24h tickers and order books as the exchange reports them,
//! already converted from the string-encoded wire format into decimals.

use crate::error::{CoreError, Result};
use crate::{Price, Size};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trading status of an instrument.
///
/// Anything the exchange reports other than `TRADING` (`BREAK`, `HALT`,
/// `END_OF_DAY`, ...) is treated as not tradable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradingStatus {
    #[serde(rename = "TRADING")]
    Trading,
    #[serde(other)]
    NotTradable,
}

impl TradingStatus {
    pub fn is_tradable(&self) -> bool {
        matches!(self, Self::Trading)
    }
}

impl fmt::Display for TradingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trading => write!(f, "TRADING"),
            Self::NotTradable => write!(f, "NOT_TRADABLE"),
        }
    }
}

/// A tradable base/quote pair from the instrument catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    /// Exchange symbol (e.g., "BTCUSDT").
    pub symbol: String,
    /// Base asset code (e.g., "BTC").
    pub base_asset: String,
    /// Quote asset code (e.g., "USDT").
    pub quote_asset: String,
    pub status: TradingStatus,
}

impl Instrument {
    pub fn new(
        symbol: impl Into<String>,
        base_asset: impl Into<String>,
        quote_asset: impl Into<String>,
        status: TradingStatus,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            base_asset: base_asset.into(),
            quote_asset: quote_asset.into(),
            status,
        }
    }
}

/// Point-in-time 24h statistics for one instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerSnapshot {
    pub symbol: String,
    /// Last trade price.
    pub last_price: Price,
    /// 24h volume denominated in the quote asset.
    pub quote_volume: Decimal,
    /// 24h volume denominated in the base asset.
    pub volume: Decimal,
    /// 24h price change in percent (e.g., 3.14 for +3.14%).
    pub price_change_percent: Decimal,
}

impl TickerSnapshot {
    /// Snapshot with every numeric field zeroed.
    ///
    /// Stands in for instruments the ticker endpoint did not report.
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            last_price: Price::ZERO,
            quote_volume: Decimal::ZERO,
            volume: Decimal::ZERO,
            price_change_percent: Decimal::ZERO,
        }
    }
}

/// 24h market summary for a single symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketSummary {
    pub symbol: String,
    pub last_price: Price,
    /// Absolute 24h price change.
    pub price_change: Decimal,
    pub price_change_percent: Decimal,
    pub high_price: Price,
    pub low_price: Price,
    /// 24h base-asset volume.
    pub volume: Decimal,
    /// 24h quote-asset volume.
    pub quote_volume: Decimal,
}

/// One order-book level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookLevel {
    pub price: Price,
    pub quantity: Size,
}

impl BookLevel {
    pub fn new(price: Price, quantity: Size) -> Self {
        Self { price, quantity }
    }
}

/// Order-book depth snapshot.
///
/// Levels keep the exchange order (best to worst) on both sides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBook {
    pub symbol: String,
    pub last_update_id: u64,
    pub bids: Vec<BookLevel>,
    pub asks: Vec<BookLevel>,
}

impl OrderBook {
    /// Empty book, returned when depth could not be fetched.
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            last_update_id: 0,
            bids: Vec::new(),
            asks: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    pub fn best_bid(&self) -> Option<&BookLevel> {
        self.bids.first()
    }

    pub fn best_ask(&self) -> Option<&BookLevel> {
        self.asks.first()
    }

    /// Best ask minus best bid, if both sides are present.
    pub fn spread(&self) -> Option<Decimal> {
        Some(self.best_ask()?.price.inner() - self.best_bid()?.price.inner())
    }
}

/// Normalize a user-supplied symbol to the exchange's uppercase form.
///
/// Rejects empty input and anything that is not ASCII alphanumeric.
pub fn normalize_symbol(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidSymbol("empty symbol".to_string()));
    }
    if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(CoreError::InvalidSymbol(trimmed.to_string()));
    }
    Ok(trimmed.to_ascii_uppercase())
}
