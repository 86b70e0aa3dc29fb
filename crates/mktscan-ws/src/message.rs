//! Combined-stream message types.
//!
//! Every frame on a combined stream is wrapped in an envelope:
//! `{"stream": "btcusdt@ticker", "data": {...}}`. Only the symbol (`s`) and
//! last price (`c`) of the ticker payload are consumed.

use crate::error::{WsError, WsResult};
use mktscan_core::{Price, PriceUpdate};
use serde::Deserialize;

/// Combined-stream envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamEnvelope {
    /// Channel name the payload came from.
    #[serde(default)]
    pub stream: Option<String>,
    /// Channel payload. Absent on control responses.
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// 24h ticker payload (subset).
#[derive(Debug, Clone, Deserialize)]
pub struct TickerPayload {
    /// Event type, `24hrTicker` for ticker channels.
    #[serde(rename = "e", default)]
    pub event_type: Option<String>,
    /// Event time (ms since epoch).
    #[serde(rename = "E", default)]
    pub event_time: Option<i64>,
    #[serde(rename = "s", default)]
    pub symbol: String,
    /// Last price, string-encoded.
    #[serde(rename = "c", default)]
    pub last_price: String,
}

/// Parse one text frame into a price update.
///
/// Returns `Ok(None)` for frames without a `data` payload. An unparseable
/// price is reported as zero rather than dropping the update.
pub fn parse_price_update(text: &str) -> WsResult<Option<PriceUpdate>> {
    let envelope: StreamEnvelope = serde_json::from_str(text)?;

    let data = match envelope.data {
        Some(data) if !data.is_null() => data,
        _ => return Ok(None),
    };

    if !data.is_object() {
        return Err(WsError::ParseError(format!(
            "payload on {} is not an object",
            envelope.stream.as_deref().unwrap_or("<unknown>")
        )));
    }

    let payload: TickerPayload = serde_json::from_value(data)?;
    Ok(Some(PriceUpdate::new(
        payload.symbol,
        Price::parse_or_zero(&payload.last_price),
    )))
}
