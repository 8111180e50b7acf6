//! Bitcoin Forward Transaction Tracer and Suspicious Pattern Detector
//!
//! Follows the funds of a seed transaction forward through the ledger and
//! scores an address's recent activity with a small set of heuristics. Ledger
//! data comes from a [`provider::LedgerProvider`]: the BlockCypher REST API or
//! an in-memory fixture.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod detection;
pub mod errors;
pub mod provider;
pub mod tracer;
pub mod types;
pub mod utils;
