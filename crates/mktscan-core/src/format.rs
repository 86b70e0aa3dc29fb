//! Display formatting for prices, volumes and percentages.
//!
//! Precision depends on magnitude so that sub-cent tokens stay readable.
//! Rounding is half away from zero on the exact decimal value.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

const BILLION: Decimal = dec!(1000000000);
const MILLION: Decimal = dec!(1000000);
const THOUSAND: Decimal = dec!(1000);

fn fixed(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", dp as usize, rounded)
}

/// Format a price: 2 decimals from 1 up, 4 decimals from 0.01, else 8.
pub fn format_price(price: Decimal) -> String {
    if price >= Decimal::ONE {
        fixed(price, 2)
    } else if price >= dec!(0.01) {
        fixed(price, 4)
    } else {
        fixed(price, 8)
    }
}

/// Format a volume in dollars with a B/M/K suffix.
pub fn format_volume(volume: Decimal) -> String {
    if volume >= BILLION {
        format!("${}B", fixed(volume / BILLION, 2))
    } else if volume >= MILLION {
        format!("${}M", fixed(volume / MILLION, 2))
    } else if volume >= THOUSAND {
        format!("${}K", fixed(volume / THOUSAND, 2))
    } else {
        format!("${}", fixed(volume, 2))
    }
}

/// Format a percentage change with an explicit sign.
pub fn format_percentage(pct: Decimal) -> String {
    if pct.is_sign_negative() && !pct.is_zero() {
        format!("-{}%", fixed(pct.abs(), 2))
    } else {
        format!("+{}%", fixed(pct.abs(), 2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price_tiers() {
        assert_eq!(format_price(dec!(0.5)), "0.5000");
        assert_eq!(format_price(dec!(123.456)), "123.46");
        assert_eq!(format_price(dec!(0.00000123)), "0.00000123");
        assert_eq!(format_price(dec!(1)), "1.00");
        assert_eq!(format_price(dec!(0.01)), "0.0100");
    }

    #[test]
    fn test_format_price_rounds_half_away_from_zero() {
        assert_eq!(format_price(dec!(2.345)), "2.35");
        assert_eq!(format_price(dec!(65000.12)), "65000.12");
    }

    #[test]
    fn test_format_volume_suffixes() {
        assert_eq!(format_volume(dec!(2500000000)), "$2.50B");
        assert_eq!(format_volume(dec!(12340000)), "$12.34M");
        assert_eq!(format_volume(dec!(1500)), "$1.50K");
        assert_eq!(format_volume(dec!(999.999)), "$1000.00");
        assert_eq!(format_volume(Decimal::ZERO), "$0.00");
    }

    #[test]
    fn test_format_volume_tier_chosen_before_rounding() {
        // The tier comes from the raw value, so a rounded-up amount keeps
        // the lower suffix.
        assert_eq!(format_volume(dec!(999999.995)), "$1000.00K");
        assert_eq!(format_volume(dec!(999999999.995)), "$1000.00M");
        assert_eq!(format_volume(dec!(1000000)), "$1.00M");
        assert_eq!(format_volume(dec!(1000)), "$1.00K");
    }

    #[test]
    fn test_format_percentage_sign() {
        assert_eq!(format_percentage(dec!(3.14159)), "+3.14%");
        assert_eq!(format_percentage(dec!(-1.2)), "-1.20%");
        assert_eq!(format_percentage(Decimal::ZERO), "+0.00%");
    }
}
