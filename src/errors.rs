use thiserror::Error;

/// Application-wide error type - single point of truth
#[derive(Error, Debug)]
pub enum AppError {
    /// Ledger data provider operations
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Caller input rejected before any work was done
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// File I/O operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration issues
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation/parsing
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Input validation errors surfaced to the caller as a distinct kind
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No transaction hash supplied
    #[error("Transaction hash is required")]
    EmptyHash,

    /// Hash is not a 64-digit hex transaction id
    #[error("Invalid transaction hash: {hash}")]
    InvalidHash { hash: String },

    /// Trace depth below one
    #[error("Invalid trace depth {depth}: must be at least 1")]
    InvalidDepth { depth: u32 },

    /// Requested depth above the configured ceiling
    #[error("Trace depth {depth} exceeds the configured limit of {limit}")]
    DepthLimitExceeded { depth: u32, limit: u32 },

    /// No address supplied
    #[error("Address is required")]
    EmptyAddress,
}

/// Ledger data provider error types
#[derive(Error, Debug, Clone)]
pub enum ProviderError {
    /// Failed to reach the provider or its worker
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP request could not be completed (DNS, TLS, reset, etc.)
    #[error("Request failed: {endpoint} - {message}")]
    RequestFailed { endpoint: String, message: String },

    /// Provider answered with an unexpected HTTP status
    #[error("HTTP {status} from {endpoint}")]
    HttpStatus { status: u16, endpoint: String },

    /// Provider throttled the request (HTTP 429)
    #[error("Rate limited: {endpoint}")]
    RateLimited { endpoint: String },

    /// Failed to deserialise provider response data
    #[error("Deserialisation failed: {0}")]
    DeserialisationFailed(String),

    /// Retry limit exceeded while the provider kept throttling
    #[error("Max retries exceeded: {operation}")]
    MaxRetriesExceeded { operation: String },

    /// Request timed out
    #[error("Request timeout: {timeout_seconds}s for {operation}")]
    Timeout {
        timeout_seconds: u64,
        operation: String,
    },

    /// Provider returned unexpected or malformed response data
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Application-wide result type - single point of truth
pub type AppResult<T> = Result<T, AppError>;

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidData(format!("JSON error: {}", err))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}
