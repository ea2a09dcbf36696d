//! Error types for chain lookups.
//!
//! Lookups report "not found" through their return value, so everything in
//! [`ChainError`] is either a transport problem, a malformed response or a
//! cancelled request.

use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for chain client and lookup probe operations.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Network-related errors from HTTP requests.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The endpoint answered with an unexpected status code.
    #[error("Request to {url} failed with status {status}")]
    Status {
        /// HTTP status code returned by the endpoint.
        status: u16,
        /// The URL that was requested.
        url: String,
    },

    /// JSON parsing or data structure errors.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of what failed to parse.
        message: String,
    },

    /// The request was abandoned because a newer query superseded it.
    #[error("lookup cancelled")]
    Cancelled,
}

impl ChainError {
    /// Create a new parse error with the given message.
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a new status error for the given URL.
    #[must_use]
    pub fn status(status: u16, url: impl Into<String>) -> Self {
        Self::Status {
            status,
            url: url.into(),
        }
    }

    /// Returns `true` if this error is the cancellation signal rather than a failure.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_error_display() {
        let parse_err = ChainError::parse("missing field");
        assert_eq!(format!("{}", parse_err), "Parse error: missing field");

        let status_err = ChainError::status(503, "https://node/v1/blocks/by_height/1");
        assert_eq!(
            format!("{}", status_err),
            "Request to https://node/v1/blocks/by_height/1 failed with status 503"
        );

        assert_eq!(format!("{}", ChainError::Cancelled), "lookup cancelled");
    }

    #[test]
    fn test_only_cancelled_is_cancelled() {
        assert!(ChainError::Cancelled.is_cancelled());
        assert!(!ChainError::parse("x").is_cancelled());
        assert!(!ChainError::status(500, "u").is_cancelled());
    }
}
