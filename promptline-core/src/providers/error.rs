//! Provider error types and handling

use std::time::Duration;
use thiserror::Error;

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors that can occur when talking to the language model endpoint.
///
/// These are transport, authentication and protocol failures. They are
/// never retried at this layer and propagate to the caller unchanged.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// Rate limit exceeded, retry after specified duration
    #[error("Rate limit exceeded{}", .retry_after.map(|d| format!(", retry after {}s", d.as_secs())).unwrap_or_default())]
    RateLimit { retry_after: Option<Duration> },

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Server error (5xx)
    #[error("Server error ({status_code}): {message}")]
    ServerError { status_code: u16, message: String },

    /// Invalid request (4xx)
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// Authentication failure
    #[error("Authentication failed: {message}")]
    AuthenticationError { message: String },

    /// Model not available or unsupported
    #[error("Model '{model}' not available")]
    ModelNotAvailable { model: String },

    /// Connection-level failure
    #[error("Network error: {message}")]
    NetworkError { message: String },

    /// The endpoint answered with something that is not a chat completion
    #[error("Failed to parse response: {message}")]
    ParseError { message: String },

    /// The endpoint answered without any choices
    #[error("Response contained no choices")]
    EmptyResponse,

    /// Provider-specific error
    #[error("Error [{code}]: {message}")]
    Custom { code: String, message: String },
}

impl ProviderError {
    /// Whether a caller could reasonably try the same request again later.
    ///
    /// Informational only; nothing in this crate retries.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimit { .. } | Self::Timeout | Self::ServerError { .. } | Self::NetworkError { .. }
        )
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::ParseError {
            message: err.to_string(),
        }
    }
}
