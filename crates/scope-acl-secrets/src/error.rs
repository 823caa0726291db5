//! Error types for secret scope crawl and apply.

use scope_acl_core::{AclPermission, CoreError};
use scope_acl_workspace::ApiError;
use thiserror::Error;

/// Errors that can occur while crawling or applying secret scope ACLs.
#[derive(Debug, Error)]
pub enum SecretsError {
    /// The workspace API call failed.
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    /// The permission record could not be encoded, decoded, or routed.
    #[error("record error: {0}")]
    Core(#[from] CoreError),

    /// The backend reports a different permission than the one written.
    ///
    /// Not retried: this is a wrong value, not a stale read.
    #[error(
        "applied permission {observed} for {principal} on scope {scope} \
         is not equal to expected permission {expected}"
    )]
    PermissionMismatch {
        scope: String,
        principal: String,
        expected: AclPermission,
        observed: AclPermission,
    },

    /// The write never became visible within the allowed read-backs.
    #[error(
        "failed to apply permission {expected} for {principal} on scope {scope} \
         in {attempts} retries"
    )]
    RetriesExhausted {
        scope: String,
        principal: String,
        expected: AclPermission,
        attempts: u32,
    },

    /// The rate limiter was shut down.
    #[error("rate limiter closed")]
    RateLimiterClosed(#[from] tokio::sync::AcquireError),
}

/// Result type for secret scope operations.
pub type Result<T> = std::result::Result<T, SecretsError>;
