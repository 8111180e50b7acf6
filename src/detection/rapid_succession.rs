//! Rapid succession: confirmed transactions clustered in time
//!
//! Fires at most once per address, on the first pair of consecutive
//! confirmation times closer than [`RAPID_SUCCESSION_WINDOW_MINUTES`].

use crate::types::{PatternType, Severity, SuspiciousPattern, Transaction};
use crate::utils::time::format_gap;
use chrono::Duration;

pub const RAPID_SUCCESSION_WINDOW_MINUTES: i64 = 10;

pub fn detect(transactions: &[Transaction], _address: &str) -> Vec<SuspiciousPattern> {
    let mut times: Vec<_> = transactions.iter().filter_map(|t| t.confirmed).collect();
    times.sort();

    let window = Duration::minutes(RAPID_SUCCESSION_WINDOW_MINUTES);
    let first_close_gap = times
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .find(|gap| *gap < window);

    match first_close_gap {
        Some(gap) => vec![SuspiciousPattern::new(
            PatternType::RapidSuccession,
            Severity::Medium,
            format!(
                "Multiple transactions confirmed in rapid succession ({} apart, under {} minutes)",
                format_gap(gap),
                RAPID_SUCCESSION_WINDOW_MINUTES
            ),
        )],
        None => Vec::new(),
    }
}
