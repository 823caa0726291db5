//! Error types for the Scope ACL Core.

use thiserror::Error;

/// Errors raised while encoding, decoding, or routing permission records.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The record's raw payload is not a list of ACL entries.
    ///
    /// Persistence is expected to hand back exactly what the crawler wrote,
    /// so this indicates corrupted state rather than a skippable item.
    #[error("malformed permission record for {object_id}: {source}")]
    MalformedRecord {
        object_id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("unsupported object type: expected {expected}, got {actual}")]
    UnsupportedObjectType { expected: String, actual: String },
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
