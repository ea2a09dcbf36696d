//! HTTP plumbing shared by the Aptos API clients.

use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use std::time::Duration;

use crate::domain::ChainError;

// ============================================================================
// Constants
// ============================================================================

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Timeout for ANS lookups, which sit on the interactive path
pub const ANS_TIMEOUT_SECS: u64 = 5;

// ============================================================================
// Configuration
// ============================================================================

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout
    pub timeout: Duration,
    /// Optional API key sent as a bearer token to node and indexer
    pub api_key: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            api_key: None,
        }
    }
}

impl HttpConfig {
    /// Create config with custom timeout
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Build the HTTP client with connection pooling.
pub(crate) fn build_http_client(config: &HttpConfig) -> Result<Client, ChainError> {
    Client::builder()
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(30))
        .timeout(config.timeout)
        .build()
        .map_err(ChainError::from)
}

/// Sends a request and decodes the JSON body.
///
/// `404 Not Found` and `410 Gone` (pruned history) are reported as `Ok(None)`;
/// any other non-success status is an error.
pub(crate) async fn fetch_json(
    request: RequestBuilder,
    url: &str,
) -> Result<Option<Value>, ChainError> {
    let response = request.send().await?;
    let status = response.status();

    if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
        return Ok(None);
    }
    if !status.is_success() {
        return Err(ChainError::status(status.as_u16(), url));
    }

    Ok(Some(response.json().await?))
}
