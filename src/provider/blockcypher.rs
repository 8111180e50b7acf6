use crate::config::ProviderConfig;
use crate::errors::{ProviderError, ProviderResult};
use crate::provider::{
    calculate_next_backoff, execute_with_timeout, is_retryable, CacheStats, LedgerProvider,
    ProviderCache,
};
use crate::types::{
    AddressActivity, AddressReference, AddressSummary, Transaction, TxInput, TxOutput,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, Semaphore};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// Provider request types for the async worker pattern
#[derive(Debug)]
pub enum ProviderRequest {
    GetTransaction {
        hash: String,
        tx: oneshot::Sender<ProviderResult<Option<Transaction>>>,
    },
    GetAddressReferences {
        address: String,
        tx: oneshot::Sender<ProviderResult<Vec<AddressReference>>>,
    },
    GetAddressActivity {
        address: String,
        limit: usize,
        tx: oneshot::Sender<ProviderResult<Option<AddressActivity>>>,
    },
    TestConnection {
        tx: oneshot::Sender<ProviderResult<ChainInfo>>,
    },
}

/// Chain tip information returned by the chain root endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainInfo {
    pub name: String,
    pub height: u64,
    #[serde(default)]
    pub hash: String,
}

/// BlockCypher REST client with rate-limit backoff and async worker pattern
pub struct BlockCypherClient {
    request_tx: mpsc::Sender<ProviderRequest>,
    error_count: Arc<AtomicU64>,
    tx_cache: ProviderCache<Transaction>,
    ref_cache: ProviderCache<Vec<AddressReference>>,
    concurrent_requests: usize,
}

impl BlockCypherClient {
    /// Create a new client and spawn the worker task
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(config: ProviderConfig) -> ProviderResult<Self> {
        let (request_tx, request_rx) = mpsc::channel(100);
        let error_count = Arc::new(AtomicU64::new(0));

        let http = reqwest::Client::builder()
            .user_agent(concat!("chain-trace/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                ProviderError::ConnectionFailed(format!("Failed to build HTTP client: {}", e))
            })?;

        let tx_cache = ProviderCache::new("transaction");
        let ref_cache = ProviderCache::new("address references");

        let concurrent_requests = config.concurrent_requests;
        info!(
            "BlockCypher client targeting {}/{}",
            config.base_url, config.chain
        );

        let worker = ProviderWorker::new(
            config,
            http,
            Arc::clone(&error_count),
            tx_cache.clone(),
            ref_cache.clone(),
        );
        tokio::spawn(worker.run(request_rx));

        Ok(Self {
            request_tx,
            error_count,
            tx_cache,
            ref_cache,
            concurrent_requests,
        })
    }

    /// Query the chain root to verify connectivity
    pub async fn test_connection(&self) -> ProviderResult<ChainInfo> {
        self.dispatch(|tx| ProviderRequest::TestConnection { tx })
            .await
    }

    /// Get the number of failed provider calls so far
    pub fn get_error_count(&self) -> u64 {
        self.error_count.load(Ordering::Relaxed)
    }

    /// Combined statistics of the transaction and address-reference caches
    pub fn get_cache_stats(&self) -> CacheStats {
        self.tx_cache.get_stats() + self.ref_cache.get_stats()
    }

    /// Get the configured concurrent request limit
    pub fn get_concurrent_limit(&self) -> usize {
        self.concurrent_requests
    }

    async fn dispatch<T>(
        &self,
        make_request: impl FnOnce(oneshot::Sender<ProviderResult<T>>) -> ProviderRequest,
    ) -> ProviderResult<T> {
        let (tx, rx) = oneshot::channel();

        self.request_tx
            .send(make_request(tx))
            .await
            .map_err(|_| ProviderError::ConnectionFailed("Failed to send provider request".to_string()))?;

        rx.await.map_err(|_| {
            ProviderError::ConnectionFailed("Provider worker channel closed".to_string())
        })?
    }
}

#[async_trait]
impl LedgerProvider for BlockCypherClient {
    async fn get_transaction(&self, hash: &str) -> ProviderResult<Option<Transaction>> {
        if let Some(cached) = self.tx_cache.get(hash) {
            return Ok(Some(cached));
        }
        self.dispatch(|tx| ProviderRequest::GetTransaction {
            hash: hash.to_string(),
            tx,
        })
        .await
    }

    async fn get_address_references(&self, address: &str) -> ProviderResult<Vec<AddressReference>> {
        if let Some(cached) = self.ref_cache.get(address) {
            return Ok(cached);
        }
        self.dispatch(|tx| ProviderRequest::GetAddressReferences {
            address: address.to_string(),
            tx,
        })
        .await
    }

    async fn get_address_activity(
        &self,
        address: &str,
        limit: usize,
    ) -> ProviderResult<Option<AddressActivity>> {
        self.dispatch(|tx| ProviderRequest::GetAddressActivity {
            address: address.to_string(),
            limit,
            tx,
        })
        .await
    }
}

/// Worker that handles all BlockCypher communication in a dedicated task
#[derive(Clone)]
struct ProviderWorker {
    http: reqwest::Client,
    config: Arc<ProviderConfig>,
    semaphore: Arc<Semaphore>,
    error_count: Arc<AtomicU64>,
    tx_cache: ProviderCache<Transaction>,
    ref_cache: ProviderCache<Vec<AddressReference>>,
}

impl ProviderWorker {
    fn new(
        config: ProviderConfig,
        http: reqwest::Client,
        error_count: Arc<AtomicU64>,
        tx_cache: ProviderCache<Transaction>,
        ref_cache: ProviderCache<Vec<AddressReference>>,
    ) -> Self {
        let semaphore = Arc::new(Semaphore::new(config.concurrent_requests));
        Self {
            http,
            config: Arc::new(config),
            semaphore,
            error_count,
            tx_cache,
            ref_cache,
        }
    }

    async fn run(self, mut request_rx: mpsc::Receiver<ProviderRequest>) {
        info!(
            "Provider worker started with {} concurrent request limit",
            self.config.concurrent_requests
        );

        while let Some(request) = request_rx.recv().await {
            let worker = self.clone();

            // Spawn each request in its own task for parallel processing
            tokio::spawn(async move {
                worker.handle_request(request).await;
            });
        }

        info!("Provider worker shutting down");
    }

    async fn handle_request(&self, request: ProviderRequest) {
        match request {
            ProviderRequest::GetTransaction { hash, tx } => {
                let _ = tx.send(self.fetch_transaction(&hash).await);
            }
            ProviderRequest::GetAddressReferences { address, tx } => {
                let _ = tx.send(self.fetch_address_references(&address).await);
            }
            ProviderRequest::GetAddressActivity { address, limit, tx } => {
                let _ = tx.send(self.fetch_address_activity(&address, limit).await);
            }
            ProviderRequest::TestConnection { tx } => {
                let _ = tx.send(self.test_connection_impl().await);
            }
        }
    }

    async fn fetch_transaction(&self, hash: &str) -> ProviderResult<Option<Transaction>> {
        let path = format!("/txs/{}", hash);
        let wire: Option<WireTransaction> = self
            .get_json(&path, &transaction_query(&self.config))
            .await?;

        match wire {
            Some(wire) => {
                let transaction = wire.into_transaction();
                self.tx_cache.put(hash.to_string(), transaction.clone());
                Ok(Some(transaction))
            }
            None => {
                debug!("Transaction {} not found", hash);
                Ok(None)
            }
        }
    }

    async fn fetch_address_references(&self, address: &str) -> ProviderResult<Vec<AddressReference>> {
        let path = format!("/addrs/{}", address);
        let limit = self.config.address_reference_limit.to_string();
        let wire: Option<WireAddress> = self.get_json(&path, &[("limit", limit)]).await?;

        let references = match wire {
            Some(wire) => wire.into_references(),
            None => {
                debug!("Address {} not found, treating as no references", address);
                Vec::new()
            }
        };
        self.ref_cache.put(address.to_string(), references.clone());
        Ok(references)
    }

    async fn fetch_address_activity(
        &self,
        address: &str,
        limit: usize,
    ) -> ProviderResult<Option<AddressActivity>> {
        let path = format!("/addrs/{}/full", address);
        let wire: Option<WireFullAddress> = self
            .get_json(&path, &[("limit", limit.to_string())])
            .await?;
        Ok(wire.map(WireFullAddress::into_activity))
    }

    async fn test_connection_impl(&self) -> ProviderResult<ChainInfo> {
        let info: Option<ChainInfo> = self.get_json("", &[]).await?;
        let info = info.ok_or_else(|| {
            ProviderError::InvalidResponse(format!(
                "chain endpoint {} not found",
                endpoint_url(&self.config, "")
            ))
        })?;
        debug!(
            "BlockCypher connection test successful - chain: {}, height: {}",
            info.name, info.height
        );
        Ok(info)
    }

    /// GET a JSON document, retrying only while the provider rate-limits us
    ///
    /// HTTP 404 maps to `Ok(None)`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ProviderResult<Option<T>> {
        let _permit = self.semaphore.acquire().await.map_err(|e| {
            ProviderError::ConnectionFailed(format!("Failed to acquire semaphore: {}", e))
        })?;
        let operation = format!("GET {}", path);
        let mut attempts = 0;
        let mut backoff = Duration::from_millis(self.config.initial_backoff_ms);

        loop {
            let result = match execute_with_timeout(
                self.config.timeout_seconds,
                self.request_once::<T>(path, query),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(ProviderError::Timeout {
                    timeout_seconds: self.config.timeout_seconds,
                    operation: operation.clone(),
                }),
            };

            let e = match result {
                Ok(value) => {
                    if attempts > 0 {
                        debug!("{} succeeded after {} attempts", operation, attempts + 1);
                    }
                    return Ok(value);
                }
                Err(e) => e,
            };

            self.error_count.fetch_add(1, Ordering::Relaxed);

            if !is_retryable(&e) {
                warn!("{} failed: {}", operation, e);
                return Err(e);
            }

            attempts += 1;
            if attempts > self.config.max_retries {
                error!("{} still rate limited after {} attempts", operation, attempts);
                return Err(ProviderError::MaxRetriesExceeded { operation });
            }

            warn!(
                "{} rate limited on attempt {}, retrying in {:?}",
                operation, attempts, backoff
            );
            sleep(backoff).await;

            backoff = calculate_next_backoff(
                backoff,
                self.config.backoff_multiplier,
                self.config.max_backoff_seconds,
            );
        }
    }

    async fn request_once<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ProviderResult<Option<T>> {
        let mut request = self.http.get(endpoint_url(&self.config, path)).query(query);
        if let Some(token) = &self.config.api_token {
            request = request.query(&[("token", token)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed {
                endpoint: path.to_string(),
                message: e.to_string(),
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => return Ok(None),
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(ProviderError::RateLimited {
                    endpoint: path.to_string(),
                })
            }
            status if !status.is_success() => {
                return Err(ProviderError::HttpStatus {
                    status: status.as_u16(),
                    endpoint: path.to_string(),
                })
            }
            _ => {}
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::RequestFailed {
                endpoint: path.to_string(),
                message: e.to_string(),
            })?;

        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| ProviderError::DeserialisationFailed(format!("{}: {}", path, e)))
    }
}

fn transaction_query(config: &ProviderConfig) -> [(&'static str, String); 1] {
    [("limit", config.transaction_io_limit.to_string())]
}

fn endpoint_url(config: &ProviderConfig, path: &str) -> String {
    format!(
        "{}/{}{}",
        config.base_url.trim_end_matches('/'),
        config.chain.trim_matches('/'),
        path
    )
}

/// BlockCypher reports unconfirmed transactions with height -1
fn height_from_wire(height: i64) -> Option<u64> {
    u64::try_from(height).ok()
}

fn unconfirmed_height() -> i64 {
    -1
}

#[derive(Debug, Deserialize)]
struct WireTransaction {
    hash: String,
    #[serde(default = "unconfirmed_height")]
    block_height: i64,
    #[serde(default)]
    confirmed: Option<DateTime<Utc>>,
    #[serde(default)]
    total: u64,
    #[serde(default)]
    fees: u64,
    #[serde(default)]
    inputs: Vec<WireInput>,
    #[serde(default)]
    outputs: Vec<WireOutput>,
}

#[derive(Debug, Deserialize)]
struct WireInput {
    #[serde(default)]
    addresses: Option<Vec<String>>,
    #[serde(default)]
    output_value: u64,
    #[serde(default)]
    prev_hash: Option<String>,
    #[serde(default)]
    output_index: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct WireOutput {
    #[serde(default)]
    value: u64,
    #[serde(default)]
    addresses: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct WireTxRef {
    tx_hash: String,
    #[serde(default = "unconfirmed_height")]
    block_height: i64,
}

#[derive(Debug, Deserialize)]
struct WireAddress {
    #[serde(default)]
    txrefs: Vec<WireTxRef>,
    #[serde(default)]
    unconfirmed_txrefs: Vec<WireTxRef>,
}

#[derive(Debug, Deserialize)]
struct WireFullAddress {
    address: String,
    #[serde(default)]
    total_received: u64,
    #[serde(default)]
    total_sent: u64,
    #[serde(default)]
    balance: u64,
    #[serde(default)]
    n_tx: u64,
    #[serde(default)]
    txs: Vec<WireTransaction>,
}

impl WireTransaction {
    fn into_transaction(self) -> Transaction {
        let block_height = height_from_wire(self.block_height);
        Transaction {
            hash: self.hash,
            block_height,
            confirmed: block_height.and(self.confirmed),
            total: self.total,
            fees: self.fees,
            inputs: self
                .inputs
                .into_iter()
                .map(|i| TxInput {
                    addresses: i.addresses.unwrap_or_default(),
                    value: i.output_value,
                    prev_hash: i.prev_hash,
                    output_index: i.output_index.and_then(|n| u32::try_from(n).ok()),
                })
                .collect(),
            outputs: self
                .outputs
                .into_iter()
                .map(|o| TxOutput {
                    addresses: o.addresses.unwrap_or_default(),
                    value: o.value,
                })
                .collect(),
        }
    }
}

impl WireAddress {
    fn into_references(self) -> Vec<AddressReference> {
        self.txrefs
            .into_iter()
            .chain(self.unconfirmed_txrefs)
            .map(|r| AddressReference {
                tx_hash: r.tx_hash,
                block_height: height_from_wire(r.block_height),
            })
            .collect()
    }
}

impl WireFullAddress {
    fn into_activity(self) -> AddressActivity {
        AddressActivity {
            summary: AddressSummary {
                address: self.address,
                total_received: self.total_received,
                total_sent: self.total_sent,
                balance: self.balance,
                n_tx: self.n_tx,
            },
            transactions: self
                .txs
                .into_iter()
                .map(WireTransaction::into_transaction)
                .collect(),
        }
    }
}
