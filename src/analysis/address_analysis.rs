use crate::detection::PatternDetector;
use crate::errors::{AppResult, ValidationError};
use crate::provider::LedgerProvider;
use crate::types::{AddressSummary, SuspiciousPattern};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Detection results for one address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressReport {
    pub summary: AddressSummary,
    /// Transactions the patterns were computed over
    pub transaction_count: usize,
    pub patterns: Vec<SuspiciousPattern>,
}

/// Fetches an address's activity from the provider and runs the detector on it
pub struct AddressAnalyser {
    provider: Arc<dyn LedgerProvider>,
    detector: PatternDetector,
}

impl AddressAnalyser {
    pub fn new(provider: Arc<dyn LedgerProvider>) -> Self {
        Self {
            provider,
            detector: PatternDetector::default(),
        }
    }

    pub fn with_detector(mut self, detector: PatternDetector) -> Self {
        self.detector = detector;
        self
    }

    /// Analyse up to `limit` of the address's most recent transactions
    ///
    /// An address the provider does not know yields an empty report.
    pub async fn analyse(&self, address: &str, limit: usize) -> AppResult<AddressReport> {
        let address = address.trim();
        if address.is_empty() {
            return Err(ValidationError::EmptyAddress.into());
        }

        let Some(activity) = self.provider.get_address_activity(address, limit).await? else {
            info!("No activity found for {}", address);
            return Ok(AddressReport {
                summary: AddressSummary {
                    address: address.to_string(),
                    ..AddressSummary::default()
                },
                transaction_count: 0,
                patterns: Vec::new(),
            });
        };

        let patterns = self.detector.detect(&activity.transactions, address)?;
        info!(
            "{}: {} pattern(s) across {} transaction(s)",
            address,
            patterns.len(),
            activity.transactions.len()
        );

        Ok(AddressReport {
            summary: activity.summary,
            transaction_count: activity.transactions.len(),
            patterns,
        })
    }
}
