//! Core domain types for the mktscan market-data client.
//!
//! This crate provides the records shared by the REST and streaming sides:
//! - `Price`, `Size`: Precision-safe numeric types
//! - `Instrument`, `TickerSnapshot`: Exchange-reported snapshots
//! - `RankedToken`, `MarketSummary`, `OrderBook`: Display-oriented records
//! - `PriceUpdate`: Real-time last-price notification
//! - Formatting helpers for prices, volumes and percentages

pub mod decimal;
pub mod error;
pub mod format;
pub mod market;
pub mod types;

pub use decimal::{parse_decimal_or_zero, Price, Size};
pub use error::{CoreError, Result};
pub use format::{format_percentage, format_price, format_volume};
pub use market::{
    normalize_symbol, BookLevel, Instrument, MarketSummary, OrderBook, TickerSnapshot, TradingStatus,
};
pub use types::{PriceUpdate, RankedToken};
