//! HTTP client for the exchange's public market-data REST API.
//!
//! Fetches the instrument catalog, 24h tickers, last prices and order-book
//! depth. The best-effort fetchers never return an error: transport failures,
//! non-success statuses and undecodable bodies are logged and mapped to the
//! documented sentinel (empty vector, zero price, `None`, empty book).
//! Callers cannot tell "no data" from "fetch failed" by the return value.

use crate::error::{CatalogError, CatalogResult};
use crate::ranker::CatalogRanker;
use crate::wire::{RawDepth, RawExchangeInfo, RawPriceTicker, RawTicker24h};
use mktscan_core::{Instrument, MarketSummary, OrderBook, Price, RankedToken, TickerSnapshot};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Public REST endpoint.
pub const DEFAULT_REST_URL: &str = "https://api.binance.com";

/// Default timeout for API requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Order-book levels requested per side.
pub const DEPTH_LIMIT: u32 = 20;

const EXCHANGE_INFO_PATH: &str = "/api/v3/exchangeInfo";
const TICKER_24H_PATH: &str = "/api/v3/ticker/24hr";
const TICKER_PRICE_PATH: &str = "/api/v3/ticker/price";
const DEPTH_PATH: &str = "/api/v3/depth";

/// Client for the exchange market-data endpoints.
pub struct ExchangeClient {
    /// HTTP client.
    client: Client,
    /// REST base URL without trailing slash.
    base_url: String,
    ranker: CatalogRanker,
}

impl ExchangeClient {
    /// Create a new client with the default timeout.
    ///
    /// # Arguments
    /// * `base_url` - REST base URL (e.g., "https://api.binance.com")
    pub fn new(base_url: impl Into<String>) -> CatalogResult<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a new client with an explicit request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> CatalogResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ranker: CatalogRanker::default(),
        })
    }

    /// Replace the ranking policy.
    pub fn with_ranker(mut self, ranker: CatalogRanker) -> Self {
        self.ranker = ranker;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> CatalogResult<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, ?query, "GET");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| CatalogError::HttpClient(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::HttpStatus {
                status: status.as_u16(),
                path: path.to_string(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::Decode(format!("Failed to read {path} body: {e}")))?;

        Ok(serde_json::from_str(&body)?)
    }

    /// Fetch the full instrument catalog.
    pub async fn try_fetch_instruments(&self) -> CatalogResult<Vec<Instrument>> {
        let info: RawExchangeInfo = self.get_json(EXCHANGE_INFO_PATH, &[]).await?;
        let instruments: Vec<Instrument> = info.symbols.into_iter().map(Into::into).collect();
        debug!(count = instruments.len(), "Fetched instrument catalog");
        Ok(instruments)
    }

    /// Fetch 24h ticker snapshots for every symbol.
    pub async fn try_fetch_tickers(&self) -> CatalogResult<Vec<TickerSnapshot>> {
        let raw: Vec<RawTicker24h> = self.get_json(TICKER_24H_PATH, &[]).await?;
        let tickers: Vec<TickerSnapshot> = raw.into_iter().map(Into::into).collect();
        debug!(count = tickers.len(), "Fetched 24h tickers");
        Ok(tickers)
    }

    /// Rank tradable instruments, surfacing any fetch error.
    ///
    /// Catalog and tickers are requested concurrently; either failing fails
    /// the whole ranking.
    pub async fn try_rank_top_instruments(&self, limit: usize) -> CatalogResult<Vec<RankedToken>> {
        let (instruments, tickers) =
            tokio::try_join!(self.try_fetch_instruments(), self.try_fetch_tickers())?;
        let ranked = self.ranker.rank(instruments, tickers, limit);
        info!(count = ranked.len(), limit, "Ranked top instruments");
        Ok(ranked)
    }

    /// Rank tradable instruments. Empty on any failure, never partial.
    pub async fn rank_top_instruments(&self, limit: usize) -> Vec<RankedToken> {
        match self.try_rank_top_instruments(limit).await {
            Ok(ranked) => ranked,
            Err(e) => {
                warn!(error = %e, "Failed to rank instruments, returning empty list");
                Vec::new()
            }
        }
    }

    /// Fetch the last price of one symbol.
    pub async fn try_fetch_price(&self, symbol: &str) -> CatalogResult<Price> {
        let raw: RawPriceTicker = self
            .get_json(TICKER_PRICE_PATH, &[("symbol", symbol)])
            .await?;
        Ok(Price::new(raw.price))
    }

    /// Last price of one symbol. Zero on failure.
    pub async fn fetch_price(&self, symbol: &str) -> Price {
        match self.try_fetch_price(symbol).await {
            Ok(price) => price,
            Err(e) => {
                warn!(symbol, error = %e, "Failed to fetch price");
                Price::ZERO
            }
        }
    }

    /// Fetch the 24h market summary of one symbol.
    pub async fn try_fetch_market_summary(&self, symbol: &str) -> CatalogResult<MarketSummary> {
        let raw: RawTicker24h = self
            .get_json(TICKER_24H_PATH, &[("symbol", symbol)])
            .await?;
        Ok(raw.into())
    }

    /// 24h market summary of one symbol. `None` on failure.
    pub async fn fetch_market_summary(&self, symbol: &str) -> Option<MarketSummary> {
        match self.try_fetch_market_summary(symbol).await {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!(symbol, error = %e, "Failed to fetch market summary");
                None
            }
        }
    }

    /// Fetch the top `DEPTH_LIMIT` levels per side of one symbol's book.
    pub async fn try_fetch_order_book(&self, symbol: &str) -> CatalogResult<OrderBook> {
        let limit = DEPTH_LIMIT.to_string();
        let raw: RawDepth = self
            .get_json(DEPTH_PATH, &[("symbol", symbol), ("limit", limit.as_str())])
            .await?;
        Ok(raw.into_order_book(symbol))
    }

    /// Order-book depth of one symbol. Empty book on failure.
    pub async fn fetch_order_book(&self, symbol: &str) -> OrderBook {
        match self.try_fetch_order_book(symbol).await {
            Ok(book) => book,
            Err(e) => {
                warn!(symbol, error = %e, "Failed to fetch order book");
                OrderBook::empty(symbol)
            }
        }
    }
}
