use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder reported when the provider cannot resolve an address
pub const UNKNOWN_ADDRESS: &str = "Unknown";

/// Immutable transaction snapshot as returned by the ledger data provider
///
/// Values are in satoshis. `block_height` is `None` while the transaction is
/// unconfirmed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub hash: String,
    #[serde(default)]
    pub block_height: Option<u64>,
    #[serde(default)]
    pub confirmed: Option<DateTime<Utc>>,
    pub total: u64,
    pub fees: u64,
    #[serde(default)]
    pub inputs: Vec<TxInput>,
    #[serde(default)]
    pub outputs: Vec<TxOutput>,
}

impl Transaction {
    pub fn is_confirmed(&self) -> bool {
        self.block_height.is_some()
    }

    /// Whether any input or output of this transaction involves `address`
    pub fn involves(&self, address: &str) -> bool {
        self.inputs.iter().any(|i| i.has_address(address))
            || self.outputs.iter().any(|o| o.has_address(address))
    }
}

/// A spent output referenced by a transaction, with its resolved source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxInput {
    #[serde(default)]
    pub addresses: Vec<String>,
    pub value: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_index: Option<u32>,
}

impl TxInput {
    /// First resolved source address, or "Unknown"
    pub fn address(&self) -> &str {
        primary_address(&self.addresses)
    }

    pub fn has_address(&self, address: &str) -> bool {
        self.addresses.iter().any(|a| a == address)
    }
}

/// Newly created value and its destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxOutput {
    #[serde(default)]
    pub addresses: Vec<String>,
    pub value: u64,
}

impl TxOutput {
    /// First resolved destination address, or "Unknown"
    pub fn address(&self) -> &str {
        primary_address(&self.addresses)
    }

    pub fn has_address(&self, address: &str) -> bool {
        self.addresses.iter().any(|a| a == address)
    }

    pub fn is_resolved(&self) -> bool {
        self.address() != UNKNOWN_ADDRESS
    }
}

fn primary_address(addresses: &[String]) -> &str {
    addresses
        .first()
        .map(String::as_str)
        .filter(|a| !a.is_empty())
        .unwrap_or(UNKNOWN_ADDRESS)
}

/// A transaction touching an address, as listed by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressReference {
    pub tx_hash: String,
    #[serde(default)]
    pub block_height: Option<u64>,
}

impl AddressReference {
    pub fn confirmed(tx_hash: impl Into<String>, block_height: u64) -> Self {
        Self {
            tx_hash: tx_hash.into(),
            block_height: Some(block_height),
        }
    }

    pub fn unconfirmed(tx_hash: impl Into<String>) -> Self {
        Self {
            tx_hash: tx_hash.into(),
            block_height: None,
        }
    }
}

/// Aggregate balance figures for an address (satoshis)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressSummary {
    pub address: String,
    pub total_received: u64,
    pub total_sent: u64,
    pub balance: u64,
    pub n_tx: u64,
}

/// Address summary together with its (most recent) full transactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressActivity {
    pub summary: AddressSummary,
    pub transactions: Vec<Transaction>,
}
