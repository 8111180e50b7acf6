//! Precise amounts: received values carrying more than 6 significant decimals
//!
//! Hand-entered payments tend to be round; amounts specified down to the last
//! satoshi suggest automated splitting. One finding per qualifying output.

use crate::types::{PatternType, Severity, SuspiciousPattern, Transaction};
use crate::utils::currency::{format_btc, fractional_digits, sats_to_btc};

pub const MAX_ROUTINE_DECIMALS: usize = 6;

pub fn detect(transactions: &[Transaction], address: &str) -> Vec<SuspiciousPattern> {
    transactions
        .iter()
        .flat_map(|t| &t.outputs)
        .filter(|o| o.has_address(address))
        .filter(|o| fractional_digits(o.value) > MAX_ROUTINE_DECIMALS)
        .map(|o| {
            SuspiciousPattern::new(
                PatternType::PreciseAmount,
                Severity::Low,
                format!("Unusually precise amount received: {} BTC", format_btc(o.value)),
            )
            .with_value(sats_to_btc(o.value))
        })
        .collect()
}
