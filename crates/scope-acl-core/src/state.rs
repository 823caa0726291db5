//! Group migration state.
//!
//! The decision of which groups migrate, and what they become, is made
//! elsewhere. This module defines the read-only view the apply phase
//! consumes, plus a list-backed implementation of it.

use serde::{Deserialize, Serialize};

use crate::types::Destination;

/// Read-only view of a group migration decision.
pub trait MigrationState: Send + Sync {
    /// Whether `principal` is one of the groups being migrated.
    fn is_in_scope(&self, principal: &str) -> bool;

    /// The principal that replaces `principal` at `destination`.
    ///
    /// `None` means the migration has no valid target for it.
    fn get_target_principal(&self, principal: &str, destination: Destination) -> Option<String>;
}

/// One workspace group and where it migrates to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigratedGroup {
    /// Name of the existing workspace-local group.
    pub workspace_name: String,
    /// Name of its temporary backup group, if one was created.
    pub backup_name: Option<String>,
    /// Name of the account-level group replacing it, if one exists.
    pub account_name: Option<String>,
}

impl MigratedGroup {
    /// A group with both a backup and an account target.
    pub fn new(
        workspace_name: impl Into<String>,
        backup_name: impl Into<String>,
        account_name: impl Into<String>,
    ) -> Self {
        Self {
            workspace_name: workspace_name.into(),
            backup_name: Some(backup_name.into()),
            account_name: Some(account_name.into()),
        }
    }

    /// The target name at `destination`.
    pub fn target(&self, destination: Destination) -> Option<&str> {
        match destination {
            Destination::Backup => self.backup_name.as_deref(),
            Destination::Account => self.account_name.as_deref(),
        }
    }
}

/// [`MigrationState`] backed by a list of [`MigratedGroup`]s.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupMigrationState {
    groups: Vec<MigratedGroup>,
}

impl GroupMigrationState {
    /// Create an empty state (nothing in scope).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a group to the migration.
    pub fn add(&mut self, group: MigratedGroup) {
        self.groups.push(group);
    }

    /// Builder form of [`add`](Self::add).
    pub fn with_group(mut self, group: MigratedGroup) -> Self {
        self.add(group);
        self
    }

    /// All groups in the migration.
    pub fn groups(&self) -> &[MigratedGroup] {
        &self.groups
    }

    fn find(&self, principal: &str) -> Option<&MigratedGroup> {
        self.groups.iter().find(|g| g.workspace_name == principal)
    }
}

impl FromIterator<MigratedGroup> for GroupMigrationState {
    fn from_iter<I: IntoIterator<Item = MigratedGroup>>(iter: I) -> Self {
        Self {
            groups: iter.into_iter().collect(),
        }
    }
}

impl MigrationState for GroupMigrationState {
    fn is_in_scope(&self, principal: &str) -> bool {
        self.find(principal).is_some()
    }

    fn get_target_principal(&self, principal: &str, destination: Destination) -> Option<String> {
        self.find(principal)
            .and_then(|g| g.target(destination))
            .map(str::to_string)
    }
}
