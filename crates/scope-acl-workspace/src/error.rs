//! Error types for workspace API calls.

use thiserror::Error;

/// Errors returned by a [`SecretsApi`](crate::SecretsApi) implementation.
///
/// Retrying these is the caller's business; nothing in this workspace
/// retries a failed API call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The named secret scope does not exist.
    #[error("secret scope not found: {0}")]
    ScopeNotFound(String),

    /// The API rejected the request.
    #[error("request failed with status {status}: {message}")]
    Request { status: u16, message: String },

    /// The API could not be reached or is temporarily unavailable.
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

/// Result type for API calls.
pub type Result<T> = std::result::Result<T, ApiError>;
