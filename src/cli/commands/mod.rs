pub mod detect;
pub mod test_provider;
pub mod trace;

use crate::config::{AppConfig, ProviderConfig};
use crate::errors::{AppError, AppResult};
use crate::provider::{BlockCypherClient, InMemoryProvider, LedgerProvider};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Provider and configuration options shared by all commands
#[derive(Args, Debug, Clone, Default)]
pub struct ProviderArgs {
    /// Configuration file (defaults to ./config.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Serve ledger data from a JSON fixture instead of the network
    #[arg(long)]
    pub fixture: Option<PathBuf>,

    /// Provider API base URL (overrides config.toml)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Chain path, e.g. btc/main or btc/test3 (overrides config.toml)
    #[arg(long)]
    pub chain: Option<String>,

    /// Provider API token (overrides config.toml and BLOCKCYPHER_TOKEN)
    #[arg(long)]
    pub token: Option<String>,
}

impl ProviderArgs {
    /// Load configuration from file/environment, falling back to defaults
    pub fn load_config(&self) -> AppResult<AppConfig> {
        match &self.config {
            // An explicit file must load
            Some(path) => AppConfig::load(Some(path)),
            None => match AppConfig::load(None) {
                Ok(config) => {
                    info!("Configuration loaded successfully");
                    Ok(config)
                }
                Err(e) => {
                    warn!("Failed to load configuration: {}", e);
                    info!("Using defaults and CLI arguments");
                    Ok(AppConfig::get_defaults())
                }
            },
        }
    }

    /// Apply CLI overrides on top of the loaded provider config
    pub fn provider_config(&self, mut config: ProviderConfig) -> ProviderConfig {
        if let Some(url) = self.base_url.clone() {
            config.base_url = url;
        }
        if let Some(chain) = self.chain.clone() {
            config.chain = chain;
        }
        if let Some(token) = self.token.clone() {
            config.api_token = Some(token);
        }
        config
    }

    pub fn build_provider(&self, config: &AppConfig) -> AppResult<Arc<dyn LedgerProvider>> {
        if let Some(path) = &self.fixture {
            info!("Using fixture provider: {}", path.display());
            return Ok(Arc::new(InMemoryProvider::load_fixture(path)?));
        }

        let provider_config = self.provider_config(config.provider.clone());
        info!("Provider: {}/{}", provider_config.base_url, provider_config.chain);
        Ok(Arc::new(BlockCypherClient::new(provider_config)?))
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T, pretty: bool) -> AppResult<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", rendered);
    Ok(())
}

pub(crate) fn config_error(e: impl std::fmt::Display) -> AppError {
    AppError::Config(e.to_string())
}
