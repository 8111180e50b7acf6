use super::{print_json, ProviderArgs};
use crate::analysis::AddressAnalyser;
use crate::errors::AppResult;
use clap::Args;
use tracing::info;

/// Score an address's recent transactions for suspicious patterns
#[derive(Args)]
pub struct DetectCommand {
    /// Address to analyse
    pub address: String,

    /// Most recent transactions to fetch (defaults to config)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,

    #[command(flatten)]
    pub provider: ProviderArgs,
}

impl DetectCommand {
    pub async fn run(&self) -> AppResult<()> {
        let config = self.provider.load_config()?;
        let limit = self
            .limit
            .unwrap_or(config.provider.address_transaction_limit);
        let provider = self.provider.build_provider(&config)?;

        let report = AddressAnalyser::new(provider)
            .analyse(&self.address, limit)
            .await?;

        if report.patterns.is_empty() {
            info!("No suspicious patterns for {}", report.summary.address);
        }

        print_json(&report, self.pretty)
    }
}
