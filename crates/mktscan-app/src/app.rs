//! Main application orchestration.
//!
//! Each command fetches through the REST client (or the ticker stream for
//! `watch`) and renders plain text. Printing is left to the binary.

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::render::{render_order_book, render_price, render_ranking, render_summary};
use mktscan_catalog::ExchangeClient;
use mktscan_core::{normalize_symbol, PriceUpdate};
use mktscan_ws::{depth_stream_url, PriceStream};
use std::future::Future;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

/// Main application.
pub struct Application {
    config: AppConfig,
    client: ExchangeClient,
    stream: PriceStream,
}

impl Application {
    /// Create a new application.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let client = ExchangeClient::with_timeout(&config.rest_url, config.request_timeout())?
            .with_ranker(config.ranker());
        let stream = PriceStream::new(config.stream_config());

        Ok(Self {
            config,
            client,
            stream,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn client(&self) -> &ExchangeClient {
        &self.client
    }

    pub fn stream(&self) -> &PriceStream {
        &self.stream
    }

    /// Ranked instrument listing, as a table or pretty JSON.
    pub async fn top(&self, limit: Option<usize>, json: bool) -> AppResult<String> {
        let limit = limit.unwrap_or(self.config.rank_limit);
        let tokens = self.client.rank_top_instruments(limit).await;
        if tokens.is_empty() {
            warn!(limit, "No ranked instruments available");
        }

        if json {
            Ok(serde_json::to_string_pretty(&tokens)?)
        } else {
            Ok(render_ranking(&tokens))
        }
    }

    pub async fn price(&self, symbol: &str) -> AppResult<String> {
        let symbol = normalize_symbol(symbol)?;
        let price = self.client.fetch_price(&symbol).await;
        if price.is_zero() {
            return Ok(format!("{symbol}: no price available"));
        }
        Ok(render_price(&symbol, price))
    }

    pub async fn market(&self, symbol: &str) -> AppResult<String> {
        let symbol = normalize_symbol(symbol)?;
        match self.client.fetch_market_summary(&symbol).await {
            Some(summary) => Ok(render_summary(&summary)),
            None => Ok(format!("{symbol}: no market data available")),
        }
    }

    pub async fn depth(&self, symbol: &str) -> AppResult<String> {
        let symbol = normalize_symbol(symbol)?;
        let book = self.client.fetch_order_book(&symbol).await;
        Ok(render_order_book(&book))
    }

    /// Partial-book stream URL for `symbol` on the configured endpoint.
    pub fn depth_url(&self, symbol: &str) -> AppResult<String> {
        let symbol = normalize_symbol(symbol)?;
        Ok(depth_stream_url(&self.config.ws_url, &symbol))
    }

    /// Symbols to stream: the given ones, or the top `watch_count` ranked ids.
    pub async fn watch_symbols(&self, symbols: Vec<String>) -> AppResult<Vec<String>> {
        if !symbols.is_empty() {
            return symbols
                .iter()
                .map(|s| normalize_symbol(s).map_err(AppError::from))
                .collect();
        }

        let ranked = self
            .client
            .rank_top_instruments(self.config.watch_count)
            .await;
        if ranked.is_empty() {
            return Err(AppError::NoSymbols);
        }
        debug!(count = ranked.len(), "Watching top ranked symbols");
        Ok(ranked.into_iter().map(|token| token.id).collect())
    }

    /// Stream price updates to `emit` until `shutdown` resolves.
    ///
    /// The receiver is registered before the stream opens so no early update
    /// is missed. The stream is closed on exit. Returns the number of
    /// updates delivered.
    pub async fn watch_until<F, W>(
        &self,
        symbols: Vec<String>,
        shutdown: F,
        mut emit: W,
    ) -> AppResult<u64>
    where
        F: Future<Output = ()>,
        W: FnMut(&PriceUpdate),
    {
        let symbols = self.watch_symbols(symbols).await?;
        let mut updates = self.stream.subscribe();
        let channels = self.stream.open(&symbols).await?;
        info!(?channels, "Watching prices");

        tokio::pin!(shutdown);
        let mut count = 0u64;

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    info!("Shutdown signal received");
                    break;
                }

                received = updates.recv() => match received {
                    Ok(update) => {
                        count += 1;
                        emit(&update);
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Price watcher lagged, updates dropped");
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }

        self.stream.close().await;
        info!(count, "Price watch ended");
        Ok(count)
    }

    /// Stream price updates to `emit` until Ctrl-C.
    pub async fn watch<W>(&self, symbols: Vec<String>, emit: W) -> AppResult<u64>
    where
        W: FnMut(&PriceUpdate),
    {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        };
        self.watch_until(symbols, ctrl_c, emit).await
    }
}
