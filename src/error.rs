//! Crate-level error types.
//!
//! [`CoinboardError`] unifies every error source (configuration, HTTP, JSON,
//! API rejections) behind a single enum so callers can match on the variant
//! they care about while still using the `?` operator for easy propagation.
//!
//! The orchestration layer collapses all of them into [`RequestFailure`],
//! the only error a store slice ever records.

use serde::Serialize;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CoinboardError>;

/// Top-level error type returned by all public APIs.
#[derive(Debug, thiserror::Error)]
pub enum CoinboardError {
    /// A configuration value was missing or could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// The HTTP request could not be sent or its body could not be read.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The remote API answered with a non-success status.
    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Any other transport failure reported by a gateway.
    #[error("{0}")]
    Transport(String),
}

/// A failed remote request, as stored on a slice.
///
/// No distinction is made between network failures, malformed responses,
/// and server-side rejections: the original error text is kept for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{description}")]
pub struct RequestFailure {
    description: String,
}

impl RequestFailure {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }

    /// Human-readable description of what went wrong.
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl From<CoinboardError> for RequestFailure {
    fn from(err: CoinboardError) -> Self {
        Self::new(err.to_string())
    }
}
