//! Analysis on top of the tracer and detector
//!
//! - **Trace Statistics** - Shape and value summary of a forward trace tree
//! - **Address Analysis** - Fetch an address's activity and score it for suspicious patterns
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use chain_trace::analysis::{AddressAnalyser, TraceStats};
//! use chain_trace::provider::InMemoryProvider;
//! use chain_trace::tracer::ChainTracer;
//! use chain_trace::errors::AppResult;
//!
//! async fn example() -> AppResult<()> {
//!     let provider = Arc::new(InMemoryProvider::new());
//!
//!     let tree = ChainTracer::new(provider.clone())
//!         .trace("f854aebae95150b379cc1187d848d58225f3c4157fe992bcd166f58bd5063449", 3)
//!         .await?;
//!     let stats = TraceStats::from_tree(&tree);
//!
//!     let report = AddressAnalyser::new(provider).analyse("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa", 50).await?;
//!     Ok(())
//! }
//! ```

pub mod address_analysis;
pub mod trace_stats;

// Re-export main types and interfaces
pub use address_analysis::{AddressAnalyser, AddressReport};
pub use trace_stats::TraceStats;
