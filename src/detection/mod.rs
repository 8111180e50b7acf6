//! Suspicious activity detection
//!
//! Each heuristic lives in its own module and exposes a `detect` function of
//! shape [`DetectionRule`]. Rules are independent, perform no I/O and never see
//! each other's output; [`PatternDetector`] runs them in a fixed order and
//! concatenates their findings.

pub mod precise_amount;
pub mod rapid_succession;
pub mod round_trip;

use crate::errors::ValidationError;
use crate::types::{SuspiciousPattern, Transaction};
use tracing::debug;

// Re-export for convenience
pub use precise_amount::detect as detect_precise_amounts;
pub use rapid_succession::detect as detect_rapid_succession;
pub use round_trip::detect as detect_round_trips;

/// A heuristic over one address's transactions
pub type DetectionRule = fn(&[Transaction], &str) -> Vec<SuspiciousPattern>;

/// Built-in rules in evaluation order
pub const DEFAULT_RULES: [(&str, DetectionRule); 3] = [
    ("rapid-succession", rapid_succession::detect),
    ("precise-amount", precise_amount::detect),
    ("round-trip", round_trip::detect),
];

/// Ordered, extensible list of detection rules
#[derive(Clone)]
pub struct PatternDetector {
    rules: Vec<(&'static str, DetectionRule)>,
}

impl Default for PatternDetector {
    fn default() -> Self {
        Self {
            rules: DEFAULT_RULES.to_vec(),
        }
    }
}

impl PatternDetector {
    /// Detector with no rules
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule; it runs after all existing rules
    pub fn with_rule(mut self, name: &'static str, rule: DetectionRule) -> Self {
        self.rules.push((name, rule));
        self
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|(name, _)| *name).collect()
    }

    /// Run every rule over `transactions` on behalf of `address`
    pub fn detect(
        &self,
        transactions: &[Transaction],
        address: &str,
    ) -> Result<Vec<SuspiciousPattern>, ValidationError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(ValidationError::EmptyAddress);
        }

        let mut patterns = Vec::new();
        for (name, rule) in &self.rules {
            let found = rule(transactions, address);
            debug!(
                "Rule {} flagged {} pattern(s) for {}",
                name,
                found.len(),
                address
            );
            patterns.extend(found);
        }
        Ok(patterns)
    }
}

/// Run the built-in rules over an address's transactions
pub fn detect(
    transactions: &[Transaction],
    address: &str,
) -> Result<Vec<SuspiciousPattern>, ValidationError> {
    PatternDetector::default().detect(transactions, address)
}
