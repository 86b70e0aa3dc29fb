//! Stream URL builders.

/// Public market-data stream endpoint.
pub const DEFAULT_STREAM_URL: &str = "wss://stream.binance.com:9443";

/// 24h rolling ticker channel for one symbol (e.g., `btcusdt@ticker`).
pub fn ticker_channel(symbol: &str) -> String {
    format!("{}@ticker", symbol.trim().to_ascii_lowercase())
}

/// Ticker channels for a set of symbols, deduplicated in first-seen order.
pub fn ticker_channels<I, S>(symbols: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut channels: Vec<String> = Vec::new();
    for symbol in symbols {
        let symbol = symbol.as_ref();
        if symbol.trim().is_empty() {
            continue;
        }
        let channel = ticker_channel(symbol);
        if !channels.contains(&channel) {
            channels.push(channel);
        }
    }
    channels
}

/// Combined-stream URL multiplexing every channel over one connection.
///
/// Format: `{base}/stream?streams=a@ticker/b@ticker`
pub fn combined_stream_url(base_url: &str, channels: &[String]) -> String {
    format!(
        "{}/stream?streams={}",
        base_url.trim_end_matches('/'),
        channels.join("/")
    )
}

/// Raw-stream URL for the top-20 partial book of one symbol at 100ms.
pub fn depth_stream_url(base_url: &str, symbol: &str) -> String {
    format!(
        "{}/ws/{}@depth20@100ms",
        base_url.trim_end_matches('/'),
        symbol.trim().to_ascii_lowercase()
    )
}
