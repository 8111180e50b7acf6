//! Ledger data provider integration module
//!
//! This module provides everything the core needs from the outside world:
//! - **LedgerProvider** - The provider contract consumed by the tracer and analyser
//! - **BlockCypherClient** - Async HTTP client for the BlockCypher REST API
//! - **InMemoryProvider** - Fixture-backed provider for offline runs and tests
//! - **Cache** - Response caching shared by the HTTP worker
//! - **Retry** - Exponential backoff utilities and timeout wrappers
//!
//! The HTTP client uses `reqwest` and implements an async worker pattern with
//! channel-based request/response handling.

pub mod blockcypher;
pub mod cache;
pub mod memory;
pub mod retry;

use crate::errors::ProviderResult;
use crate::types::{AddressActivity, AddressReference, Transaction};
use async_trait::async_trait;

// Re-export main types
pub use blockcypher::{BlockCypherClient, ChainInfo, ProviderRequest};
pub use cache::{CacheStats, ProviderCache};
pub use memory::{InMemoryProvider, LedgerFixture};
pub use retry::{calculate_next_backoff, execute_with_timeout, is_retryable};

/// Contract of a ledger data provider
///
/// "Not found" is data, not an error: `get_transaction` yields `Ok(None)` and an
/// unknown address yields an empty reference list. `Err` is reserved for
/// transport and provider failures.
#[async_trait]
pub trait LedgerProvider: Send + Sync {
    /// Fetch a transaction by hash
    async fn get_transaction(&self, hash: &str) -> ProviderResult<Option<Transaction>>;

    /// List the transactions that touch `address`, confirmed and unconfirmed
    async fn get_address_references(&self, address: &str) -> ProviderResult<Vec<AddressReference>>;

    /// Fetch an address summary with up to `limit` of its full transactions
    async fn get_address_activity(
        &self,
        address: &str,
        limit: usize,
    ) -> ProviderResult<Option<AddressActivity>>;
}
