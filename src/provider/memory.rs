//! Fixture-backed ledger provider
//!
//! Serves transactions and address references from memory. Used for offline
//! runs (`--fixture`) and as the provider double in tests, with per-hash and
//! per-address failure injection and call counters.

use crate::errors::{AppResult, ProviderError, ProviderResult};
use crate::provider::LedgerProvider;
use crate::types::{AddressActivity, AddressReference, AddressSummary, Transaction};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tracing::debug;

/// On-disk fixture format
///
/// Addresses without an explicit `references` entry get references derived
/// from the fixture transactions that involve them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerFixture {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub references: BTreeMap<String, Vec<AddressReference>>,
}

#[derive(Default)]
pub struct InMemoryProvider {
    transactions: Vec<Transaction>,
    references: BTreeMap<String, Vec<AddressReference>>,
    failing_hashes: HashSet<String>,
    failing_addresses: HashSet<String>,
    transaction_calls: AtomicUsize,
    reference_calls: AtomicUsize,
    requested_hashes: Mutex<Vec<String>>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fixture(fixture: LedgerFixture) -> Self {
        Self {
            transactions: fixture.transactions,
            references: fixture.references,
            ..Self::default()
        }
    }

    /// Load a JSON fixture file
    pub fn load_fixture(path: &Path) -> AppResult<Self> {
        let data = std::fs::read_to_string(path)?;
        let fixture: LedgerFixture = serde_json::from_str(&data)?;
        debug!(
            "Loaded fixture {} ({} transactions, {} reference lists)",
            path.display(),
            fixture.transactions.len(),
            fixture.references.len()
        );
        Ok(Self::from_fixture(fixture))
    }

    pub fn with_transaction(mut self, tx: Transaction) -> Self {
        self.transactions.retain(|t| t.hash != tx.hash);
        self.transactions.push(tx);
        self
    }

    pub fn with_references(mut self, address: &str, references: Vec<AddressReference>) -> Self {
        self.references.insert(address.to_string(), references);
        self
    }

    /// Make every lookup of `hash` fail with a transport error
    pub fn fail_transaction(mut self, hash: &str) -> Self {
        self.failing_hashes.insert(hash.to_string());
        self
    }

    /// Make every reference lookup of `address` fail with a transport error
    pub fn fail_address(mut self, address: &str) -> Self {
        self.failing_addresses.insert(address.to_string());
        self
    }

    pub fn transaction_calls(&self) -> usize {
        self.transaction_calls.load(Ordering::Relaxed)
    }

    pub fn reference_calls(&self) -> usize {
        self.reference_calls.load(Ordering::Relaxed)
    }

    /// Hashes passed to `get_transaction`, in call order
    pub fn requested_hashes(&self) -> Vec<String> {
        self.requested_hashes
            .lock()
            .map(|hashes| hashes.clone())
            .unwrap_or_default()
    }

    fn find(&self, hash: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.hash == hash)
    }

    fn involving<'a>(&'a self, address: &'a str) -> impl Iterator<Item = &'a Transaction> + 'a {
        self.transactions.iter().filter(move |t| t.involves(address))
    }

    fn injected_failure(endpoint: String) -> ProviderError {
        ProviderError::RequestFailed {
            endpoint,
            message: "injected failure".to_string(),
        }
    }
}

#[async_trait]
impl LedgerProvider for InMemoryProvider {
    async fn get_transaction(&self, hash: &str) -> ProviderResult<Option<Transaction>> {
        self.transaction_calls.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut hashes) = self.requested_hashes.lock() {
            hashes.push(hash.to_string());
        }

        if self.failing_hashes.contains(hash) {
            return Err(Self::injected_failure(format!("/txs/{}", hash)));
        }
        Ok(self.find(hash).cloned())
    }

    async fn get_address_references(&self, address: &str) -> ProviderResult<Vec<AddressReference>> {
        self.reference_calls.fetch_add(1, Ordering::Relaxed);

        if self.failing_addresses.contains(address) {
            return Err(Self::injected_failure(format!("/addrs/{}", address)));
        }
        if let Some(references) = self.references.get(address) {
            return Ok(references.clone());
        }
        Ok(self
            .involving(address)
            .map(|t| AddressReference {
                tx_hash: t.hash.clone(),
                block_height: t.block_height,
            })
            .collect())
    }

    async fn get_address_activity(
        &self,
        address: &str,
        limit: usize,
    ) -> ProviderResult<Option<AddressActivity>> {
        if self.failing_addresses.contains(address) {
            return Err(Self::injected_failure(format!("/addrs/{}/full", address)));
        }

        let all: Vec<&Transaction> = self.involving(address).collect();
        if all.is_empty() {
            return Ok(None);
        }

        let total_received: u64 = all
            .iter()
            .flat_map(|t| &t.outputs)
            .filter(|o| o.has_address(address))
            .map(|o| o.value)
            .sum();
        let total_sent: u64 = all
            .iter()
            .flat_map(|t| &t.inputs)
            .filter(|i| i.has_address(address))
            .map(|i| i.value)
            .sum();

        Ok(Some(AddressActivity {
            summary: AddressSummary {
                address: address.to_string(),
                total_received,
                total_sent,
                balance: total_received.saturating_sub(total_sent),
                n_tx: all.len() as u64,
            },
            transactions: all.into_iter().take(limit).cloned().collect(),
        }))
    }
}
