//! Ticker stream client for exchange price updates.
//!
//! Provides:
//! - A single-slot stream owner (`PriceStream`): opening replaces, closing clears
//! - Combined-stream URL builders for ticker and depth channels
//! - Parsing of combined-stream envelopes into `PriceUpdate`s
//! - Broadcast-channel delivery of updates to subscribers

pub mod error;
pub mod message;
pub mod stream;
pub mod url;

pub use error::{WsError, WsResult};
pub use message::{parse_price_update, StreamEnvelope, TickerPayload};
pub use stream::{PriceStream, StreamConfig};
pub use url::{
    combined_stream_url, depth_stream_url, ticker_channel, ticker_channels, DEFAULT_STREAM_URL,
};

use std::sync::Once;

static INIT_CRYPTO: Once = Once::new();

/// Initialize the TLS crypto provider.
/// Must be called before any secure connections are made.
pub fn init_crypto() {
    INIT_CRYPTO.call_once(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}
