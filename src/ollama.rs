//! Ollama HTTP client configuration with sensible defaults.

use crate::error::{AppsterError, Result};
use std::time::Duration;

/// Default timeout for Ollama API requests.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Create an HTTP client with a custom timeout.
///
/// A request that exceeds the timeout fails like any other transport error.
pub fn create_client_with_timeout(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AppsterError::Config(format!("Failed to create HTTP client: {}", e)))
}

/// Join an API path onto the configured base URL.
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
