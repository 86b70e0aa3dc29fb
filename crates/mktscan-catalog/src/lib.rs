//! REST market-data fetchers and instrument ranking.
//!
//! Fetches the instrument catalog and 24h tickers from the exchange's public
//! REST API and ranks tradable instruments for display. Single-symbol price,
//! market-summary and order-book lookups live on the same client.
//!
//! Every public fetcher has two forms: `try_*` returns a `CatalogResult`,
//! the plain form logs any failure and returns an empty/zero/`None` sentinel.

pub mod client;
pub mod error;
pub mod ranker;
pub mod wire;

pub use client::{ExchangeClient, DEFAULT_REST_URL, DEPTH_LIMIT};
pub use error::{CatalogError, CatalogResult};
pub use ranker::{icon_url, CatalogRanker, DEFAULT_RANK_LIMIT, MAJOR_ASSETS, REFERENCE_QUOTE_ASSET};
pub use wire::{RawDepth, RawExchangeInfo, RawPriceTicker, RawSymbolInfo, RawTicker24h};
