//! Forward transaction tracer
//!
//! Reconstructs where the funds of a seed transaction went next. The ledger
//! exposes no "spent-by" link, so forward edges are discovered by listing the
//! transactions that touch each output address and keeping those that happened
//! after the current one.
//!
//! Traversal is bounded by depth and by a per-path [`VisitedSet`], which is
//! copied into each child call so that sibling branches never block each other.
//! Provider failures are absorbed where they happen: a failed node lookup
//! becomes a node carrying `error`, a failed forward-edge lookup yields no
//! children for that output. `trace` only fails on invalid input.

use crate::errors::{ProviderResult, ValidationError};
use crate::provider::LedgerProvider;
use crate::types::{AddressReference, Transaction, TraceChild, TraceNode};
use bitcoin::Txid;
use futures::future::{BoxFuture, FutureExt};
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Depth used when the caller does not specify one
pub const DEFAULT_MAX_DEPTH: u32 = 3;

/// Forward candidates expanded per output address
pub const MAX_CHILDREN_PER_OUTPUT: usize = 2;

/// Hashes on the path from the root to the current node
///
/// Passed by value; each recursive call owns its own copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitedSet(HashSet<String>);

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, hash: &str) -> bool {
        self.0.contains(hash)
    }

    /// Copy of this set extended with `hash`
    pub fn with(&self, hash: &str) -> Self {
        let mut next = self.clone();
        next.0.insert(hash.to_string());
        next
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Validate a caller-supplied transaction hash
///
/// Accepts 64 hex digits (either case) surrounded by optional whitespace and
/// returns the trimmed hash in lowercase, the form the ledger uses.
pub fn validate_tx_hash(tx_hash: &str) -> Result<String, ValidationError> {
    let hash = tx_hash.trim();
    if hash.is_empty() {
        return Err(ValidationError::EmptyHash);
    }
    Txid::from_str(hash).map_err(|_| ValidationError::InvalidHash {
        hash: hash.to_string(),
    })?;
    Ok(hash.to_ascii_lowercase())
}

/// Pick the transactions that spend forward from a transaction at `current_height`
///
/// Keeps references strictly above a confirmed height, or only unconfirmed
/// references when the current transaction is itself unconfirmed. Duplicates
/// are dropped (first occurrence wins), survivors are ordered by height with
/// unconfirmed last, and at most [`MAX_CHILDREN_PER_OUTPUT`] are returned.
pub fn select_forward_candidates(
    current_height: Option<u64>,
    references: Vec<AddressReference>,
) -> Vec<AddressReference> {
    let mut seen = HashSet::new();
    let mut candidates: Vec<AddressReference> = references
        .into_iter()
        .filter(|r| match (current_height, r.block_height) {
            (Some(current), Some(height)) => height > current,
            // Unconfirmed followed by confirmed is not linked forward
            (None, None) => true,
            _ => false,
        })
        .filter(|r| seen.insert(r.tx_hash.clone()))
        .collect();

    // Stable sort: equal heights keep provider order
    candidates.sort_by_key(|r| r.block_height.unwrap_or(u64::MAX));
    candidates.truncate(MAX_CHILDREN_PER_OUTPUT);
    candidates
}

/// Builds forward trace trees over a ledger provider
pub struct ChainTracer {
    provider: Arc<dyn LedgerProvider>,
}

impl ChainTracer {
    pub fn new(provider: Arc<dyn LedgerProvider>) -> Self {
        Self { provider }
    }

    /// Trace where the funds of `tx_hash` went, up to `max_depth` transactions deep
    ///
    /// No root-to-leaf path in the result is longer than `max_depth` nodes, and
    /// no hash repeats along a path.
    pub async fn trace(&self, tx_hash: &str, max_depth: u32) -> Result<TraceNode, ValidationError> {
        let hash = validate_tx_hash(tx_hash)?;
        if max_depth == 0 {
            return Err(ValidationError::InvalidDepth { depth: max_depth });
        }

        info!("Tracing {} to depth {}", hash, max_depth);
        let root = self
            .trace_node(hash.clone(), 0, max_depth, VisitedSet::new())
            .await;
        debug!("Trace of {} finished ({} levels)", hash, root.depth());
        Ok(root)
    }

    /// Trace with [`DEFAULT_MAX_DEPTH`]
    pub async fn trace_default(&self, tx_hash: &str) -> Result<TraceNode, ValidationError> {
        self.trace(tx_hash, DEFAULT_MAX_DEPTH).await
    }

    fn trace_node(
        &self,
        hash: String,
        current_depth: u32,
        max_depth: u32,
        visited: VisitedSet,
    ) -> BoxFuture<'_, TraceNode> {
        async move {
            let already_visited = visited.contains(&hash);
            if current_depth >= max_depth || already_visited {
                return TraceNode::leaf(hash, already_visited);
            }

            let visited = visited.with(&hash);

            let tx = match self.provider.get_transaction(&hash).await {
                Ok(Some(tx)) => tx,
                Ok(None) => {
                    debug!("Transaction {} not found", hash);
                    return TraceNode::failed(hash, "Transaction not found");
                }
                Err(e) => {
                    warn!("Failed to fetch transaction {}: {}", hash, e);
                    return TraceNode::failed(hash, format!("Failed to fetch transaction: {}", e));
                }
            };

            let mut node = TraceNode::from_transaction(&tx);

            // Children would sit at max_depth and exceed the path bound
            if current_depth + 1 >= max_depth {
                return node;
            }

            for output in tx.outputs.iter().filter(|o| o.is_resolved()) {
                let address = output.address();

                let candidates = match self.forward_candidates(&tx, address).await {
                    Ok(candidates) => candidates,
                    Err(e) => {
                        warn!(
                            "Failed to resolve forward edges of {} via {}: {}",
                            tx.hash, address, e
                        );
                        continue;
                    }
                };

                for candidate in candidates {
                    if visited.contains(&candidate.tx_hash) {
                        debug!("Skipping {}: already on path", candidate.tx_hash);
                        continue;
                    }

                    let child = self
                        .trace_node(
                            candidate.tx_hash,
                            current_depth + 1,
                            max_depth,
                            visited.clone(),
                        )
                        .await;

                    node.children.push(TraceChild {
                        value: output.value,
                        address: address.to_string(),
                        node: child,
                    });
                }
            }

            node
        }
        .boxed()
    }

    async fn forward_candidates(
        &self,
        tx: &Transaction,
        address: &str,
    ) -> ProviderResult<Vec<AddressReference>> {
        let references = self.provider.get_address_references(address).await?;
        let candidates = select_forward_candidates(tx.block_height, references);
        debug!(
            "{} -> {}: {} forward candidate(s)",
            tx.hash,
            address,
            candidates.len()
        );
        Ok(candidates)
    }
}
