//! Currency conversion and formatting utilities for Bitcoin and satoshi values
//!
//! This module provides standardised formatting for displaying Bitcoin amounts
//! in both BTC and satoshi units, plus the decimal-precision check used by the
//! precise-amount heuristic.

use bitcoin::Amount;

/// Satoshis per Bitcoin
pub const SATS_PER_BTC: u64 = 100_000_000;

/// Convert a satoshi amount to whole BTC
///
/// # Examples
/// ```
/// use chain_trace::utils::currency::sats_to_btc;
///
/// assert_eq!(sats_to_btc(12_345_678), 0.12345678);
/// assert_eq!(sats_to_btc(100_000_000), 1.0);
/// ```
pub fn sats_to_btc(sats: u64) -> f64 {
    Amount::from_sat(sats).to_btc()
}

/// Format a satoshi amount as dual BTC + sats display
///
/// # Examples
/// ```
/// use chain_trace::utils::currency::format_sats_as_btc;
///
/// assert_eq!(
///     format_sats_as_btc(28125351850),
///     "281.25351850 BTC (28125351850 sats)"
/// );
/// assert_eq!(
///     format_sats_as_btc(5471),
///     "0.00005471 BTC (5471 sats)"
/// );
/// ```
pub fn format_sats_as_btc(sats: u64) -> String {
    format!("{} BTC ({} sats)", format_btc(sats), sats)
}

/// Exact 8-decimal BTC rendering of a satoshi amount, without float rounding
pub fn format_btc(sats: u64) -> String {
    format!("{}.{:08}", sats / SATS_PER_BTC, sats % SATS_PER_BTC)
}

/// Number of significant fractional digits of the whole-BTC representation
///
/// Trailing zeros are not significant: `0.12000000` has 2 digits.
///
/// # Examples
/// ```
/// use chain_trace::utils::currency::fractional_digits;
///
/// assert_eq!(fractional_digits(12_345_678), 8);
/// assert_eq!(fractional_digits(12_000_000), 2);
/// assert_eq!(fractional_digits(500_000_000), 0);
/// ```
pub fn fractional_digits(sats: u64) -> usize {
    format!("{:08}", sats % SATS_PER_BTC)
        .trim_end_matches('0')
        .len()
}
