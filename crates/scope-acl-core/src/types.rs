//! ACL value types shared by the crawl and apply phases.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Access level granted on a secret scope.
///
/// Serialized in upper case (`"READ"`, `"WRITE"`, `"MANAGE"`), which is also
/// the form the workspace API speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AclPermission {
    Read,
    Write,
    Manage,
}

impl AclPermission {
    /// All permission levels, lowest first.
    pub const ALL: [AclPermission; 3] = [Self::Read, Self::Write, Self::Manage];

    /// The wire name of this permission.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "READ",
            Self::Write => "WRITE",
            Self::Manage => "MANAGE",
        }
    }
}

impl fmt::Display for AclPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single ACL grant: `permission` for `principal`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AclEntry {
    /// User or group name.
    pub principal: String,
    /// Granted access level.
    pub permission: AclPermission,
}

impl AclEntry {
    /// Create a new entry.
    pub fn new(principal: impl Into<String>, permission: AclPermission) -> Self {
        Self {
            principal: principal.into(),
            permission,
        }
    }
}

/// A secret scope as listed by the workspace API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SecretScope {
    pub name: String,
}

impl SecretScope {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Which identity system a migrated group is moved into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    /// The temporary workspace-level backup group.
    Backup,
    /// The final account-level group.
    Account,
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backup => f.write_str("backup"),
            Self::Account => f.write_str("account"),
        }
    }
}
