use super::{config_error, ProviderArgs};
use crate::errors::AppResult;
use crate::provider::BlockCypherClient;
use clap::Args;
use tracing::{error, info};

/// Test ledger provider connectivity
#[derive(Args)]
pub struct TestProviderCommand {
    #[command(flatten)]
    pub provider: ProviderArgs,
}

impl TestProviderCommand {
    pub async fn run(&self) -> AppResult<()> {
        info!("=== Testing Ledger Provider Connection ===");

        let config = self.provider.load_config()?;
        let provider_config = self.provider.provider_config(config.provider);

        info!(
            "Testing connection to: {}/{}",
            provider_config.base_url, provider_config.chain
        );
        info!(
            "API token: {}",
            if provider_config.api_token.is_some() {
                "set"
            } else {
                "not set"
            }
        );

        let client = BlockCypherClient::new(provider_config).map_err(|e| {
            error!("Failed to create provider client: {}", e);
            config_error(format!("Provider client creation failed: {}", e))
        })?;

        match client.test_connection().await {
            Ok(chain) => {
                println!("Ledger provider connection test PASSED");
                println!("Chain: {} at height {}", chain.name, chain.height);
                if !chain.hash.is_empty() {
                    println!("Tip: {}", chain.hash);
                }
                Ok(())
            }
            Err(e) => {
                error!("Provider connection test failed: {}", e);
                println!("Ledger provider connection test FAILED");
                println!("Error: {}", e);
                println!("\nTroubleshooting tips:");
                println!("1. Check network access to the provider");
                println!("2. Verify the base URL and chain path are correct");
                println!("3. Set an API token if requests are being rate limited");

                Err(config_error(format!("Provider test failed: {}", e)))
            }
        }
    }
}
