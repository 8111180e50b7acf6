//! Retry logic utilities for provider operations
//!
//! Helpers for exponential backoff while the provider is throttling us, and a
//! timeout wrapper for individual HTTP calls. Only rate-limit responses are
//! retried; any other failure ends the call immediately.

use crate::errors::ProviderError;
use std::future::Future;
use std::time::Duration;
use tokio::time::error::Elapsed;
use tokio::time::timeout;

/// Calculate next backoff duration using exponential backoff with a maximum cap
///
/// `new_backoff = min(current_backoff * multiplier, max_backoff)`
///
/// # Example
/// ```
/// use std::time::Duration;
/// use chain_trace::provider::calculate_next_backoff;
///
/// let backoff = Duration::from_millis(100);
/// let next = calculate_next_backoff(backoff, 2.0, 30);
/// assert_eq!(next, Duration::from_millis(200));
/// ```
pub fn calculate_next_backoff(
    current_backoff: Duration,
    multiplier: f64,
    max_backoff_seconds: u64,
) -> Duration {
    Duration::from_millis((current_backoff.as_millis() as f64 * multiplier) as u64)
        .min(Duration::from_secs(max_backoff_seconds))
}

/// Whether a failed call may be attempted again after backing off
pub fn is_retryable(error: &ProviderError) -> bool {
    matches!(error, ProviderError::RateLimited { .. })
}

/// Execute a provider call with a timeout wrapper
///
/// # Returns
/// `Result<T, Elapsed>`
/// - Outer Result: timeout result (Err = timeout elapsed)
/// - `T`: the call's own result, untouched
///
/// # Example
/// ```no_run
/// use chain_trace::provider::execute_with_timeout;
/// use chain_trace::errors::{ProviderError, ProviderResult};
///
/// async fn example() -> ProviderResult<String> {
///     match execute_with_timeout(30, async { Ok::<_, ProviderError>("result".to_string()) }).await {
///         Ok(result) => result,
///         Err(_) => Err(ProviderError::Timeout {
///             timeout_seconds: 30,
///             operation: "example".to_string(),
///         }),
///     }
/// }
/// ```
pub async fn execute_with_timeout<T, F>(timeout_seconds: u64, operation: F) -> Result<T, Elapsed>
where
    F: Future<Output = T>,
{
    timeout(Duration::from_secs(timeout_seconds), operation).await
}
