use super::ledger::Transaction;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Resolved `(address, value)` pair of a transaction input or output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub address: String,
    pub value: u64,
}

/// Node of a forward trace tree
///
/// Leaves cut off by the depth bound or by the per-path visited set carry only
/// the hash. Nodes whose lookup failed carry `error` and no children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceNode {
    pub hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_height: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fees: Option<u64>,
    #[serde(default)]
    pub inputs: Vec<Endpoint>,
    #[serde(default)]
    pub outputs: Vec<Endpoint>,
    #[serde(default)]
    pub already_visited: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub children: Vec<TraceChild>,
}

/// Child of a trace node, annotated with the output edge that links it to its parent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceChild {
    pub value: u64,
    pub address: String,
    #[serde(flatten)]
    pub node: TraceNode,
}

impl TraceNode {
    /// Leaf produced without any provider call
    pub fn leaf(hash: impl Into<String>, already_visited: bool) -> Self {
        Self {
            hash: hash.into(),
            block_height: None,
            confirmed: None,
            total: None,
            fees: None,
            inputs: Vec::new(),
            outputs: Vec::new(),
            already_visited,
            error: None,
            children: Vec::new(),
        }
    }

    /// Node for a transaction that could not be fetched
    pub fn failed(hash: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::leaf(hash, false)
        }
    }

    /// Node populated from a fetched transaction, without children
    pub fn from_transaction(tx: &Transaction) -> Self {
        Self {
            hash: tx.hash.clone(),
            block_height: tx.block_height,
            confirmed: tx.confirmed,
            total: Some(tx.total),
            fees: Some(tx.fees),
            inputs: tx
                .inputs
                .iter()
                .map(|i| Endpoint {
                    address: i.address().to_string(),
                    value: i.value,
                })
                .collect(),
            outputs: tx
                .outputs
                .iter()
                .map(|o| Endpoint {
                    address: o.address().to_string(),
                    value: o.value,
                })
                .collect(),
            already_visited: false,
            error: None,
            children: Vec::new(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Number of nodes on the longest root-to-leaf path
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|c| c.node.depth())
            .max()
            .unwrap_or(0)
    }

    /// Every root-to-leaf path as a list of hashes
    pub fn paths(&self) -> Vec<Vec<&str>> {
        if self.children.is_empty() {
            return vec![vec![self.hash.as_str()]];
        }
        self.children
            .iter()
            .flat_map(|c| c.node.paths())
            .map(|mut path| {
                path.insert(0, self.hash.as_str());
                path
            })
            .collect()
    }
}
