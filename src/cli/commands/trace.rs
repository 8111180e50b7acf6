use super::{print_json, ProviderArgs};
use crate::analysis::TraceStats;
use crate::errors::AppResult;
use crate::tracer::ChainTracer;
use crate::types::TraceNode;
use clap::Args;
use serde::Serialize;
use tracing::info;

/// Trace where the funds of a transaction went next
#[derive(Args)]
pub struct TraceCommand {
    /// Seed transaction hash (64 hex characters)
    pub tx_hash: String,

    /// Maximum number of transactions on any path (defaults to config)
    #[arg(short, long)]
    pub depth: Option<u32>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,

    #[command(flatten)]
    pub provider: ProviderArgs,
}

/// JSON document printed by `trace`
#[derive(Debug, Serialize)]
pub struct TraceOutput {
    pub tree: TraceNode,
    pub stats: TraceStats,
}

impl TraceCommand {
    pub async fn run(&self) -> AppResult<()> {
        let config = self.provider.load_config()?;
        let depth = config.trace.resolve_depth(self.depth)?;
        let provider = self.provider.build_provider(&config)?;

        let tree = ChainTracer::new(provider)
            .trace(&self.tx_hash, depth)
            .await?;
        let stats = TraceStats::from_tree(&tree);

        info!(
            "Trace complete: {} node(s), {} unique transaction(s), {} error node(s)",
            stats.node_count, stats.unique_transactions, stats.error_nodes
        );

        print_json(&TraceOutput { tree, stats }, self.pretty)
    }
}
