//! Round trips: value flowing both ways between an address and a counterparty
//!
//! Per counterparty, compares what the address received from it (inputs) with
//! what it sent to it (outputs). Balanced two-way flows are flagged.

use crate::types::{PatternType, Severity, SuspiciousPattern, Transaction};
use crate::utils::currency::format_sats_as_btc;
use crate::utils::math::balance_ratio;
use std::collections::BTreeMap;

/// Flows closer than this (smaller / larger) are not flagged
pub const ROUND_TRIP_RATIO_THRESHOLD: f64 = 0.8;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Flow {
    received: u64,
    sent: u64,
}

pub fn detect(transactions: &[Transaction], address: &str) -> Vec<SuspiciousPattern> {
    // BTreeMap keeps findings ordered by counterparty
    let mut flows: BTreeMap<&str, Flow> = BTreeMap::new();

    for tx in transactions {
        for input in &tx.inputs {
            for counterparty in input.addresses.iter().filter(|a| *a != address) {
                let flow = flows.entry(counterparty.as_str()).or_default();
                flow.received = flow.received.saturating_add(input.value);
            }
        }
        for output in &tx.outputs {
            for counterparty in output.addresses.iter().filter(|a| *a != address) {
                let flow = flows.entry(counterparty.as_str()).or_default();
                flow.sent = flow.sent.saturating_add(output.value);
            }
        }
    }

    flows
        .into_iter()
        .filter(|(_, flow)| flow.received > 0 && flow.sent > 0)
        .filter(|(_, flow)| balance_ratio(flow.received, flow.sent) > ROUND_TRIP_RATIO_THRESHOLD)
        .map(|(counterparty, flow)| {
            SuspiciousPattern::new(
                PatternType::RoundTrip,
                Severity::High,
                format!(
                    "Funds cycled with {}: received {}, sent {}",
                    counterparty,
                    format_sats_as_btc(flow.received),
                    format_sats_as_btc(flow.sent)
                ),
            )
            .with_address(counterparty)
        })
        .collect()
}
