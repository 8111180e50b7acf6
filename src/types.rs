//! Chain Trace - Type System
//!
//! - `ledger`: Ledger snapshots fetched from the provider (Transaction, TxInput, TxOutput, references)
//! - `trace`: Forward trace tree (TraceNode, TraceChild, Endpoint)
//! - `patterns`: Suspicious pattern findings (SuspiciousPattern, PatternType, Severity)

mod ledger;
mod patterns;
mod trace;

pub use ledger::*;
pub use patterns::*;
pub use trace::*;
