//! Permission records: the durable snapshot of one object's ACL.
//!
//! A record is produced by a crawler task, handed to external persistence,
//! and later loaded back and given to an apply task. The `raw` payload is the
//! only part with a bit-exact contract: a compact JSON array of
//! `{"principal": .., "permission": ..}` objects in the order the API
//! returned them.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::types::AclEntry;

/// A captured ACL for one object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRecord {
    /// Object identifier (the scope name for secret scopes).
    pub object_id: String,
    /// Object type tag used to route the record back to its support.
    pub object_type: String,
    /// JSON-encoded list of [`AclEntry`].
    pub raw: String,
}

impl PermissionRecord {
    /// Capture `acls` for an object.
    pub fn capture(
        object_id: impl Into<String>,
        object_type: impl Into<String>,
        acls: &[AclEntry],
    ) -> Result<Self> {
        Ok(Self {
            object_id: object_id.into(),
            object_type: object_type.into(),
            raw: encode_acls(acls)?,
        })
    }

    /// Decode the captured ACL entries.
    ///
    /// Fails with [`CoreError::MalformedRecord`] if the payload was corrupted.
    pub fn acls(&self) -> Result<Vec<AclEntry>> {
        decode_acls(&self.raw).map_err(|source| CoreError::MalformedRecord {
            object_id: self.object_id.clone(),
            source,
        })
    }

    /// Reject the record unless it carries `expected` as its object type.
    pub fn ensure_type(&self, expected: &str) -> Result<()> {
        if self.object_type == expected {
            Ok(())
        } else {
            Err(CoreError::UnsupportedObjectType {
                expected: expected.to_string(),
                actual: self.object_type.clone(),
            })
        }
    }
}

/// Encode ACL entries into the persisted payload form.
pub fn encode_acls(acls: &[AclEntry]) -> Result<String> {
    Ok(serde_json::to_string(acls)?)
}

/// Decode a persisted payload back into ACL entries.
pub fn decode_acls(raw: &str) -> std::result::Result<Vec<AclEntry>, serde_json::Error> {
    serde_json::from_str(raw)
}
