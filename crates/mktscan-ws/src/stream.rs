//! Single-slot ticker stream.
//!
//! `PriceStream` owns at most one live connection. `open` tears down the
//! previous connection before dialing the new one, `close` tears it down and
//! clears the slot. Updates are delivered over a broadcast channel; sends with
//! no subscriber are dropped.
//!
//! There is no reconnect and no liveness check: if the server drops the
//! connection, updates stop until the owner calls `open` again.

use crate::error::{WsError, WsResult};
use crate::message::parse_price_update;
use crate::url::{combined_stream_url, ticker_channels, DEFAULT_STREAM_URL};
use futures_util::{SinkExt, StreamExt};
use mktscan_core::PriceUpdate;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio_tungstenite::{
    connect_async_tls_with_config, tungstenite::Message, MaybeTlsStream, WebSocketStream,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Stream configuration.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Stream endpoint base (e.g., "wss://stream.binance.com:9443").
    pub base_url: String,
    /// Capacity of the update broadcast channel.
    pub broadcast_capacity: usize,
    /// How long `close` waits for the server to acknowledge the close frame.
    pub close_timeout_ms: u64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_STREAM_URL.to_string(),
            broadcast_capacity: 1024,
            close_timeout_ms: 2000,
        }
    }
}

/// The live connection occupying the slot.
struct ActiveStream {
    channels: Vec<String>,
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

impl ActiveStream {
    /// Cancel the reader and wait until the socket is gone.
    async fn shutdown(&mut self) {
        self.shutdown.cancel();
        if let Err(e) = (&mut self.task).await {
            if !e.is_cancelled() {
                warn!(error = %e, "Stream reader task failed");
            }
        }
    }
}

impl Drop for ActiveStream {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Owner of the single ticker stream connection.
pub struct PriceStream {
    config: StreamConfig,
    active: Mutex<Option<ActiveStream>>,
    updates: broadcast::Sender<PriceUpdate>,
}

impl PriceStream {
    pub fn new(config: StreamConfig) -> Self {
        let (updates, _) = broadcast::channel(config.broadcast_capacity.max(1));
        Self {
            config,
            active: Mutex::new(None),
            updates,
        }
    }

    /// Register a listener for price updates.
    ///
    /// Receivers only see updates sent after they subscribe.
    pub fn subscribe(&self) -> broadcast::Receiver<PriceUpdate> {
        self.updates.subscribe()
    }

    /// Open a ticker stream for `symbols`, replacing any existing one.
    ///
    /// The previous connection is fully closed before the new one is dialed.
    /// Returns the subscribed channel names. If the new connection cannot be
    /// established the slot is left empty.
    pub async fn open<I, S>(&self, symbols: I) -> WsResult<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut slot = self.active.lock().await;

        if let Some(mut previous) = slot.take() {
            info!(channels = ?previous.channels, "Closing previous price stream");
            previous.shutdown().await;
        }

        let channels = ticker_channels(symbols);
        if channels.is_empty() {
            return Err(WsError::SubscriptionError(
                "no symbols to subscribe".to_string(),
            ));
        }

        let url = combined_stream_url(&self.config.base_url, &channels);
        info!(url = %url, channel_count = channels.len(), "Opening price stream");

        let (socket, _response) = connect_async_tls_with_config(url.as_str(), None, true, None)
            .await
            .map_err(|e| WsError::ConnectionFailed(format!("{url}: {e}")))?;

        let shutdown = CancellationToken::new();
        let task = tokio::spawn(run_reader(
            socket,
            self.updates.clone(),
            shutdown.clone(),
            Duration::from_millis(self.config.close_timeout_ms),
        ));

        *slot = Some(ActiveStream {
            channels: channels.clone(),
            shutdown,
            task,
        });

        Ok(channels)
    }

    /// Close the active stream, if any. Closing twice is a no-op.
    pub async fn close(&self) {
        let mut slot = self.active.lock().await;
        match slot.take() {
            Some(mut active) => {
                active.shutdown().await;
                info!(channels = ?active.channels, "Price stream closed");
            }
            None => debug!("No active price stream to close"),
        }
    }

    /// Whether a stream currently occupies the slot.
    pub async fn is_open(&self) -> bool {
        self.active.lock().await.is_some()
    }

    /// Channels of the active stream.
    pub async fn active_channels(&self) -> Option<Vec<String>> {
        self.active
            .lock()
            .await
            .as_ref()
            .map(|active| active.channels.clone())
    }
}

async fn run_reader(
    socket: Socket,
    updates: broadcast::Sender<PriceUpdate>,
    shutdown: CancellationToken,
    close_timeout: Duration,
) {
    match read_loop(socket, &updates, &shutdown, close_timeout).await {
        Ok(()) => debug!("Price stream reader exited"),
        Err(e) => warn!(error = %e, "Price stream ended"),
    }
}

async fn read_loop(
    socket: Socket,
    updates: &broadcast::Sender<PriceUpdate>,
    shutdown: &CancellationToken,
    close_timeout: Duration,
) -> WsResult<()> {
    let (mut write, mut read) = socket.split();

    loop {
        tokio::select! {
            biased;

            () = shutdown.cancelled() => {
                if let Err(e) = write.send(Message::Close(None)).await {
                    debug!(error = %e, "Failed to send Close frame");
                    return Ok(());
                }
                // Wait for the close handshake so the server has released
                // the connection before the slot is reused.
                let drain = async {
                    while let Some(Ok(msg)) = read.next().await {
                        if matches!(msg, Message::Close(_)) {
                            break;
                        }
                    }
                };
                if tokio::time::timeout(close_timeout, drain).await.is_err() {
                    warn!("Timed out waiting for close acknowledgement");
                }
                return Ok(());
            }

            msg = read.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => dispatch(&text, updates),
                    Some(Ok(Message::Ping(data))) => {
                        trace!("Received ping, sending pong");
                        write.send(Message::Pong(data)).await?;
                    }
                    Some(Ok(Message::Close(frame))) => {
                        let (code, reason) = frame
                            .map(|f| (f.code.into(), f.reason.to_string()))
                            .unwrap_or((1000, "Normal close".to_string()));
                        return Err(WsError::ConnectionClosed { code, reason });
                    }
                    Some(Err(e)) => {
                        error!(?e, "Price stream read error");
                        return Err(e.into());
                    }
                    None => {
                        warn!("Price stream ended by peer");
                        return Ok(());
                    }
                    _ => {}
                }
            }
        }
    }
}

fn dispatch(text: &str, updates: &broadcast::Sender<PriceUpdate>) {
    match parse_price_update(text) {
        Ok(Some(update)) => match updates.send(update) {
            Ok(receivers) => trace!(receivers, "Price update broadcast"),
            Err(_) => trace!("No price update receivers"),
        },
        Ok(None) => trace!("Frame without payload ignored"),
        Err(e) => debug!(error = %e, "Failed to parse stream frame"),
    }
}
