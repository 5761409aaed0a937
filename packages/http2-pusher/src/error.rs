//! Typed errors for the push-decision engine.
//!
//! Unsupported extensions and malformed cache cookies are not errors: the
//! former are filtered by omission and the latter decode to "no cookie".

use thiserror::Error;

/// Errors that can occur while preparing a push.
#[derive(Debug, Error)]
pub enum PushError {
    /// A resource could not be read or fetched for hashing
    #[error("resource unavailable: {path}")]
    ResourceUnavailable {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A relative duration string could not be parsed
    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    /// A push could not be attached to the response
    #[error("invalid {name} header: {reason}")]
    InvalidHeader { name: String, reason: String },

    /// JSON serialization of the cache digest failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PushError {
    /// Wrap any error as a `ResourceUnavailable` for the given path.
    pub fn unavailable(
        path: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ResourceUnavailable {
            path: path.into(),
            source: source.into(),
        }
    }
}

/// Result type alias for push operations.
pub type Result<T> = std::result::Result<T, PushError>;
