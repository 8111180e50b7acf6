use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatternType {
    RapidSuccession,
    PreciseAmount,
    RoundTrip,
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PatternType::RapidSuccession => "rapid-succession",
            PatternType::PreciseAmount => "precise-amount",
            PatternType::RoundTrip => "round-trip",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// A flagged activity pattern
///
/// `value` (whole BTC) is set for precise-amount findings, `address` (the
/// counterparty) for round-trip findings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuspiciousPattern {
    #[serde(rename = "type")]
    pub pattern_type: PatternType,
    pub description: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl SuspiciousPattern {
    pub fn new(pattern_type: PatternType, severity: Severity, description: impl Into<String>) -> Self {
        Self {
            pattern_type,
            description: description.into(),
            severity,
            value: None,
            address: None,
        }
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}
