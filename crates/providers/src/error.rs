//! Error types for provider clients

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur during provider operations.
///
/// Only [`GatewayTimeout`](ProviderError::GatewayTimeout) and
/// [`RateLimited`](ProviderError::RateLimited) are retryable; the pipeline
/// treats every other variant as fatal.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Failed to initialize the client (e.g. TLS or proxy misconfiguration)
    #[error("failed to initialize provider client: {0}")]
    Init(String),

    /// HTTP transport failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the JSON we expected
    #[error("JSON decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Provider answered 504; pause and retry
    #[error("provider gateway timeout")]
    GatewayTimeout,

    /// Provider answered 429; pause and retry
    #[error("provider rate limit exceeded")]
    RateLimited,

    /// Any status outside the recognized set
    #[error("unexpected provider status: {0}")]
    UnexpectedStatus(StatusCode),

    /// Request URL could not be built from the configured base
    #[error("invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Operation the provider does not offer
    #[error("unsupported provider operation: {0}")]
    Unsupported(&'static str),
}

impl ProviderError {
    /// True for the transient statuses that pause the pipeline instead of
    /// killing it.
    pub fn is_throttle(&self) -> bool {
        matches!(self, Self::GatewayTimeout | Self::RateLimited)
    }

    /// Map a non-success HTTP status to its error, if it is one.
    ///
    /// 2xx and 404 return `None`: success is parsed by the caller and 404 is
    /// the providers' way of saying "no results".
    pub(crate) fn from_status(status: StatusCode) -> Option<Self> {
        if status.is_success() || status == StatusCode::NOT_FOUND {
            return None;
        }
        Some(match status {
            StatusCode::GATEWAY_TIMEOUT => Self::GatewayTimeout,
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited,
            other => Self::UnexpectedStatus(other),
        })
    }
}
