use crate::errors::{AppError, AppResult, ValidationError};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Application configuration loaded from config.toml or environment variables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub provider: ProviderConfig,
    pub trace: TraceConfig,
}

/// Ledger data provider (BlockCypher REST API) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub base_url: String,
    pub chain: String,
    pub api_token: Option<String>,
    pub timeout_seconds: u64,
    pub max_retries: usize,
    pub initial_backoff_ms: u64,
    pub backoff_multiplier: f64,
    pub max_backoff_seconds: u64,
    pub concurrent_requests: usize,
    pub address_reference_limit: usize,
    pub address_transaction_limit: usize,
    /// Inputs and outputs returned per transaction lookup
    pub transaction_io_limit: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.blockcypher.com/v1".to_string(),
            chain: "btc/main".to_string(),
            api_token: None,
            timeout_seconds: 30,
            max_retries: 3,
            initial_backoff_ms: 500,
            backoff_multiplier: 2.0,
            max_backoff_seconds: 10,
            concurrent_requests: 4,
            address_reference_limit: 50,
            address_transaction_limit: 50,
            transaction_io_limit: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceConfig {
    pub default_max_depth: u32,
    pub max_depth_limit: u32,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            default_max_depth: 3,
            max_depth_limit: 10,
        }
    }
}

impl TraceConfig {
    /// Resolve the depth for a trace request against the configured ceiling
    ///
    /// `None` selects `default_max_depth`.
    pub fn resolve_depth(&self, requested: Option<u32>) -> Result<u32, ValidationError> {
        let depth = requested.unwrap_or(self.default_max_depth);
        if depth > self.max_depth_limit {
            return Err(ValidationError::DepthLimitExceeded {
                depth,
                limit: self.max_depth_limit,
            });
        }
        Ok(depth)
    }
}

impl AppConfig {
    /// Load configuration from a TOML file and environment variables
    ///
    /// Without an explicit path, `config.toml` in the working directory is used
    /// if present. Environment variables take precedence over file configuration.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let provider = ProviderConfig::default();
        let trace = TraceConfig::default();

        let file_source = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name("config").required(false),
        };

        let config = Config::builder()
            .set_default("provider.base_url", provider.base_url)?
            .set_default("provider.chain", provider.chain)?
            .set_default("provider.timeout_seconds", provider.timeout_seconds)?
            .set_default("provider.max_retries", provider.max_retries as i64)?
            .set_default("provider.initial_backoff_ms", provider.initial_backoff_ms)?
            .set_default("provider.backoff_multiplier", provider.backoff_multiplier)?
            .set_default(
                "provider.max_backoff_seconds",
                provider.max_backoff_seconds,
            )?
            .set_default(
                "provider.concurrent_requests",
                provider.concurrent_requests as i64,
            )?
            .set_default(
                "provider.address_reference_limit",
                provider.address_reference_limit as i64,
            )?
            .set_default(
                "provider.address_transaction_limit",
                provider.address_transaction_limit as i64,
            )?
            .set_default(
                "provider.transaction_io_limit",
                provider.transaction_io_limit as i64,
            )?
            .set_default("trace.default_max_depth", trace.default_max_depth as i64)?
            .set_default("trace.max_depth_limit", trace.max_depth_limit as i64)?
            .add_source(file_source)
            // CHAINTRACE_PROVIDER__BASE_URL, CHAINTRACE_TRACE__DEFAULT_MAX_DEPTH, ...
            .add_source(
                Environment::with_prefix("CHAINTRACE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let mut app_config: AppConfig = config.try_deserialize()?;

        if let Ok(token) = env::var("BLOCKCYPHER_TOKEN") {
            if !token.is_empty() {
                app_config.provider.api_token = Some(token);
            }
        }

        app_config.validate()?;
        Ok(app_config)
    }

    /// Get default config values, falling back to built-in defaults
    pub fn get_defaults() -> Self {
        match Self::load(None) {
            Ok(config) => config,
            Err(_) => Self {
                provider: ProviderConfig::default(),
                trace: TraceConfig::default(),
            },
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.provider.timeout_seconds == 0 {
            return Err(AppError::Config(
                "provider.timeout_seconds must be greater than zero".to_string(),
            ));
        }
        if self.provider.concurrent_requests == 0 {
            return Err(AppError::Config(
                "provider.concurrent_requests must be greater than zero".to_string(),
            ));
        }
        if self.trace.max_depth_limit == 0
            || self.trace.default_max_depth == 0
            || self.trace.default_max_depth > self.trace.max_depth_limit
        {
            return Err(AppError::Config(format!(
                "trace.default_max_depth ({}) must be between 1 and trace.max_depth_limit ({})",
                self.trace.default_max_depth, self.trace.max_depth_limit
            )));
        }
        Ok(())
    }
}
