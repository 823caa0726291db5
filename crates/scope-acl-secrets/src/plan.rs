//! Remapping a captured ACL onto migrated principals.

use scope_acl_core::{AclEntry, Destination, MigrationState};

/// What happens to one captured ACL entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AclChange {
    /// Principal is not migrating; its grant is left as it is.
    Keep(AclEntry),
    /// Principal migrates; the same permission is granted to `to`.
    Remap { from: String, to: AclEntry },
    /// Principal migrates but has no target, so its grant is not recreated.
    Drop(AclEntry),
}

/// The new ACL for one object, in captured order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AclPlan {
    changes: Vec<AclChange>,
}

impl AclPlan {
    /// Classify every entry of `acls` against the migration.
    pub fn build(acls: Vec<AclEntry>, state: &dyn MigrationState, destination: Destination) -> Self {
        let changes = acls
            .into_iter()
            .map(|acl| {
                if !state.is_in_scope(&acl.principal) {
                    return AclChange::Keep(acl);
                }
                match state.get_target_principal(&acl.principal, destination) {
                    Some(target) => AclChange::Remap {
                        to: AclEntry::new(target, acl.permission),
                        from: acl.principal,
                    },
                    None => AclChange::Drop(acl),
                }
            })
            .collect();
        Self { changes }
    }

    /// Whether any principal in the ACL is part of the migration.
    pub fn is_relevant(&self) -> bool {
        self.changes
            .iter()
            .any(|c| !matches!(c, AclChange::Keep(_)))
    }

    /// Per-entry decisions.
    pub fn changes(&self) -> &[AclChange] {
        &self.changes
    }

    /// The ACL after migration: kept and remapped entries, dropped ones removed.
    pub fn new_acls(&self) -> Vec<AclEntry> {
        self.changes
            .iter()
            .filter_map(|c| match c {
                AclChange::Keep(acl) => Some(acl.clone()),
                AclChange::Remap { to, .. } => Some(to.clone()),
                AclChange::Drop(_) => None,
            })
            .collect()
    }

    /// Entries that must be written to reach [`new_acls`](Self::new_acls).
    pub fn writes(&self) -> Vec<AclEntry> {
        self.changes
            .iter()
            .filter_map(|c| match c {
                AclChange::Remap { to, .. } => Some(to.clone()),
                _ => None,
            })
            .collect()
    }

    /// Entries whose grant is not carried over.
    pub fn dropped(&self) -> impl Iterator<Item = &AclEntry> {
        self.changes.iter().filter_map(|c| match c {
            AclChange::Drop(acl) => Some(acl),
            _ => None,
        })
    }
}
