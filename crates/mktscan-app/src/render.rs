//! Plain-text rendering of command output.

use mktscan_core::{
    format_percentage, format_price, format_volume, MarketSummary, OrderBook, Price, PriceUpdate,
    RankedToken,
};
use std::fmt::Write;

/// Ranked listing, one row per instrument. Volume column is 24h quote volume.
pub fn render_ranking(tokens: &[RankedToken]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>4}  {:<14} {:>16} {:>10} {:>12}",
        "#", "SYMBOL", "PRICE", "24H", "VOLUME"
    );
    for (i, token) in tokens.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>4}  {:<14} {:>16} {:>10} {:>12}",
            i + 1,
            token.id,
            format_price(token.current_price.inner()),
            format_percentage(token.price_change_percentage_24h),
            format_volume(token.market_cap),
        );
    }
    out
}

pub fn render_price(symbol: &str, price: Price) -> String {
    format!("{symbol} {}", format_price(price.inner()))
}

pub fn render_summary(summary: &MarketSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", summary.symbol);
    let _ = writeln!(out, "  last     {}", format_price(summary.last_price.inner()));
    let _ = writeln!(
        out,
        "  change   {} ({})",
        format_price(summary.price_change.abs()),
        format_percentage(summary.price_change_percent)
    );
    let _ = writeln!(out, "  high     {}", format_price(summary.high_price.inner()));
    let _ = writeln!(out, "  low      {}", format_price(summary.low_price.inner()));
    let _ = writeln!(out, "  volume   {}", summary.volume.normalize());
    let _ = writeln!(out, "  quote    {}", format_volume(summary.quote_volume));
    out
}

/// Bids and asks side by side in exchange order.
pub fn render_order_book(book: &OrderBook) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} (update {})", book.symbol, book.last_update_id);
    let _ = writeln!(
        out,
        "{:>16} {:>16} | {:<16} {:<16}",
        "BID QTY", "BID", "ASK", "ASK QTY"
    );

    let rows = book.bids.len().max(book.asks.len());
    for i in 0..rows {
        let (bid_qty, bid_px) = book
            .bids
            .get(i)
            .map(|level| {
                (
                    level.quantity.inner().normalize().to_string(),
                    format_price(level.price.inner()),
                )
            })
            .unwrap_or_default();
        let (ask_px, ask_qty) = book
            .asks
            .get(i)
            .map(|level| {
                (
                    format_price(level.price.inner()),
                    level.quantity.inner().normalize().to_string(),
                )
            })
            .unwrap_or_default();
        let _ = writeln!(out, "{bid_qty:>16} {bid_px:>16} | {ask_px:<16} {ask_qty:<16}");
    }

    match book.spread() {
        Some(spread) => {
            let _ = writeln!(out, "spread {}", format_price(spread));
        }
        None => {
            let _ = writeln!(out, "spread n/a");
        }
    }
    out
}

/// One live update line: local time, symbol, price.
pub fn render_update(update: &PriceUpdate) -> String {
    format!(
        "{} {:<14} {}",
        update.received_at.format("%H:%M:%S%.3f"),
        update.symbol,
        format_price(update.price.inner())
    )
}
