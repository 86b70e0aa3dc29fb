//! Instrument ranking.
//!
//! Joins the instrument catalog with the 24h ticker set and orders the
//! eligible instruments for display:
//! 1. Only `USDT`-quoted, tradable, non-leveraged instruments are kept
//! 2. Curated major assets rank ahead of everything else
//! 3. Within each tier, higher 24h base-asset volume ranks first
//! 4. The result is truncated to the requested limit

use mktscan_core::{Instrument, RankedToken, TickerSnapshot};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Default number of ranked instruments.
pub const DEFAULT_RANK_LIMIT: usize = 300;

/// Quote asset every ranked instrument must be priced in.
pub const REFERENCE_QUOTE_ASSET: &str = "USDT";

/// Symbol fragments marking leveraged-token products.
const LEVERAGED_MARKERS: [&str; 2] = ["DOWN", "UP"];

/// Well-known base assets that rank ahead of pure volume ordering.
///
/// Flat set: members carry no weight relative to each other.
pub const MAJOR_ASSETS: &[&str] = &[
    "BTC", "ETH", "BNB", "SOL", "XRP", "ADA", "DOGE", "TRX", "AVAX", "DOT", "LINK", "MATIC",
    "POL", "TON", "SHIB", "LTC", "BCH", "UNI", "ATOM", "XLM", "ETC", "FIL", "APT", "ARB", "OP",
    "NEAR", "ICP", "HBAR", "VET", "INJ", "SUI", "PEPE", "RNDR", "GRT", "AAVE", "MKR", "ALGO",
    "SAND", "MANA", "AXS", "EGLD", "THETA", "FTM", "XTZ", "EOS", "FLOW", "CRV", "LDO", "RUNE",
    "IMX", "STX", "SEI", "TIA", "WLD",
];

/// Icon URL for a base asset, keyed by the lowercased code.
pub fn icon_url(base_asset: &str) -> String {
    format!(
        "https://assets.coincap.io/assets/icons/{}@2x.png",
        base_asset.to_ascii_lowercase()
    )
}

/// Ranks catalog instruments by major-asset priority, then volume.
#[derive(Debug, Clone)]
pub struct CatalogRanker {
    quote_asset: String,
    majors: HashSet<String>,
}

impl Default for CatalogRanker {
    fn default() -> Self {
        Self::new(REFERENCE_QUOTE_ASSET, MAJOR_ASSETS.iter().copied())
    }
}

impl CatalogRanker {
    pub fn new<I, S>(quote_asset: impl Into<String>, majors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            quote_asset: quote_asset.into(),
            majors: majors.into_iter().map(Into::into).collect(),
        }
    }

    /// Quoted in the reference asset, tradable, and not a leveraged token.
    pub fn is_eligible(&self, instrument: &Instrument) -> bool {
        instrument.quote_asset == self.quote_asset
            && instrument.status.is_tradable()
            && !LEVERAGED_MARKERS
                .iter()
                .any(|marker| instrument.symbol.contains(marker))
    }

    pub fn is_major(&self, base_asset: &str) -> bool {
        self.majors.contains(base_asset)
    }

    fn priority(&self, instrument: &Instrument) -> u8 {
        u8::from(self.is_major(&instrument.base_asset))
    }

    /// Rank `instruments` using `tickers`, returning at most `limit` tokens.
    ///
    /// Instruments without a ticker rank with zeroed statistics. When the
    /// ticker set repeats a symbol, the last entry wins. Ids are unique in
    /// the output even if the catalog repeats a symbol.
    pub fn rank(
        &self,
        instruments: Vec<Instrument>,
        tickers: Vec<TickerSnapshot>,
        limit: usize,
    ) -> Vec<RankedToken> {
        let total = instruments.len();
        let tickers_by_symbol: HashMap<String, TickerSnapshot> = tickers
            .into_iter()
            .map(|ticker| (ticker.symbol.clone(), ticker))
            .collect();

        let mut seen = HashSet::new();
        let mut candidates: Vec<(u8, Instrument, TickerSnapshot)> = instruments
            .into_iter()
            .filter(|instrument| self.is_eligible(instrument))
            .filter(|instrument| seen.insert(instrument.symbol.clone()))
            .map(|instrument| {
                let ticker = tickers_by_symbol
                    .get(&instrument.symbol)
                    .cloned()
                    .unwrap_or_else(|| TickerSnapshot::empty(&instrument.symbol));
                (self.priority(&instrument), instrument, ticker)
            })
            .collect();

        let eligible = candidates.len();

        candidates.sort_by(|(a_priority, _, a_ticker), (b_priority, _, b_ticker)| {
            b_priority
                .cmp(a_priority)
                .then_with(|| b_ticker.volume.cmp(&a_ticker.volume))
        });
        candidates.truncate(limit);

        debug!(
            total,
            eligible,
            ranked = candidates.len(),
            limit,
            "Ranked catalog instruments"
        );

        candidates
            .into_iter()
            .map(|(_, instrument, ticker)| to_ranked_token(instrument, ticker))
            .collect()
    }
}

fn to_ranked_token(instrument: Instrument, ticker: TickerSnapshot) -> RankedToken {
    RankedToken {
        image: icon_url(&instrument.base_asset),
        id: instrument.symbol,
        symbol: instrument.base_asset.clone(),
        name: instrument.base_asset.clone(),
        current_price: ticker.last_price,
        market_cap: ticker.quote_volume,
        market_cap_rank: 0,
        price_change_percentage_24h: ticker.price_change_percent,
        total_volume: ticker.volume,
        base_asset: instrument.base_asset,
        quote_asset: instrument.quote_asset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mktscan_core::{Price, TradingStatus};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn usdt(base: &str) -> Instrument {
        Instrument::new(
            format!("{base}USDT"),
            base,
            "USDT",
            TradingStatus::Trading,
        )
    }

    fn ticker(symbol: &str, volume: Decimal) -> TickerSnapshot {
        TickerSnapshot {
            symbol: symbol.to_string(),
            last_price: Price::new(dec!(1.5)),
            quote_volume: volume * dec!(2),
            volume,
            price_change_percent: dec!(0.25),
        }
    }

    #[test]
    fn test_filters_quote_status_and_leveraged() {
        let ranker = CatalogRanker::default();
        let instruments = vec![
            usdt("BTC"),
            Instrument::new("ETHBTC", "ETH", "BTC", TradingStatus::Trading),
            Instrument::new("LUNAUSDT", "LUNA", "USDT", TradingStatus::NotTradable),
            usdt("BTCDOWN"),
            usdt("ETHUP"),
            // "UP" anywhere in the symbol excludes it, not just a suffix
            usdt("JUP"),
        ];

        let ranked = ranker.rank(instruments, Vec::new(), DEFAULT_RANK_LIMIT);
        let ids: Vec<&str> = ranked.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["BTCUSDT"]);
    }

    #[test]
    fn test_majors_rank_before_volume() {
        let ranker = CatalogRanker::default();
        let instruments = vec![usdt("MEME"), usdt("ETH"), usdt("BTC"), usdt("FOO")];
        let tickers = vec![
            ticker("MEMEUSDT", dec!(9000000)),
            ticker("ETHUSDT", dec!(500)),
            ticker("BTCUSDT", dec!(100)),
            ticker("FOOUSDT", dec!(10000)),
        ];

        let ranked = ranker.rank(instruments, tickers, DEFAULT_RANK_LIMIT);
        let ids: Vec<&str> = ranked.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["ETHUSDT", "BTCUSDT", "MEMEUSDT", "FOOUSDT"]);

        // Volume is non-increasing within each tier
        for window in ranked.windows(2) {
            let (a, b) = (&window[0], &window[1]);
            if ranker.is_major(&a.base_asset) == ranker.is_major(&b.base_asset) {
                assert!(a.total_volume >= b.total_volume);
            }
        }
    }

    #[test]
    fn test_limit_truncates() {
        let ranker = CatalogRanker::default();
        let instruments: Vec<Instrument> =
            (0..50).map(|i| usdt(&format!("TOK{i}"))).collect();
        let tickers: Vec<TickerSnapshot> = (0..50)
            .map(|i| ticker(&format!("TOK{i}USDT"), Decimal::from(i)))
            .collect();

        let ranked = ranker.rank(instruments, tickers, 10);
        assert_eq!(ranked.len(), 10);
        assert_eq!(ranked[0].id, "TOK49USDT");

        assert!(ranker.rank(vec![usdt("BTC")], Vec::new(), 0).is_empty());
    }

    #[test]
    fn test_missing_ticker_is_zeroed() {
        let ranker = CatalogRanker::default();
        let ranked = ranker.rank(vec![usdt("NEW")], Vec::new(), DEFAULT_RANK_LIMIT);

        assert_eq!(ranked.len(), 1);
        assert!(ranked[0].current_price.is_zero());
        assert_eq!(ranked[0].market_cap, Decimal::ZERO);
        assert_eq!(ranked[0].total_volume, Decimal::ZERO);
        assert_eq!(ranked[0].price_change_percentage_24h, Decimal::ZERO);
    }

    #[test]
    fn test_duplicate_ticker_last_wins() {
        let ranker = CatalogRanker::default();
        let tickers = vec![ticker("BTCUSDT", dec!(1)), ticker("BTCUSDT", dec!(7))];

        let ranked = ranker.rank(vec![usdt("BTC")], tickers, DEFAULT_RANK_LIMIT);
        assert_eq!(ranked[0].total_volume, dec!(7));
    }

    #[test]
    fn test_duplicate_catalog_symbols_are_unique() {
        let ranker = CatalogRanker::default();
        let ranked = ranker.rank(vec![usdt("BTC"), usdt("BTC")], Vec::new(), DEFAULT_RANK_LIMIT);
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn test_ranked_token_fields() {
        let ranker = CatalogRanker::default();
        let ranked = ranker.rank(
            vec![usdt("SOL")],
            vec![ticker("SOLUSDT", dec!(42))],
            DEFAULT_RANK_LIMIT,
        );
        let token = &ranked[0];

        assert_eq!(token.id, "SOLUSDT");
        assert_eq!(token.symbol, "SOL");
        assert_eq!(token.name, "SOL");
        assert_eq!(token.image, "https://assets.coincap.io/assets/icons/sol@2x.png");
        assert_eq!(token.current_price, Price::new(dec!(1.5)));
        assert_eq!(token.market_cap, dec!(84));
        assert_eq!(token.market_cap_rank, 0);
        assert_eq!(token.total_volume, dec!(42));
        assert_eq!(token.quote_asset, "USDT");
    }
}
