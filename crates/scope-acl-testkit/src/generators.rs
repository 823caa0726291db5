//! Proptest generators for property-based testing.

use proptest::prelude::*;

use scope_acl_core::{AclEntry, AclPermission, Destination, GroupMigrationState, MigratedGroup};

/// Generate a permission level.
pub fn permission() -> impl Strategy<Value = AclPermission> {
    prop_oneof![
        Just(AclPermission::Read),
        Just(AclPermission::Write),
        Just(AclPermission::Manage),
    ]
}

/// Generate a group or user principal name.
pub fn principal() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z][a-z0-9-]{0,23}".prop_map(String::from),
        "[a-z]{1,8}\\.[a-z]{1,8}@example\\.com".prop_map(String::from),
    ]
}

/// Generate an ACL entry.
pub fn acl_entry() -> impl Strategy<Value = AclEntry> {
    (principal(), permission()).prop_map(|(p, perm)| AclEntry::new(p, perm))
}

/// Generate an ACL with at most `max_len` entries and unique principals.
pub fn acl_list(max_len: usize) -> impl Strategy<Value = Vec<AclEntry>> {
    prop::collection::vec(acl_entry(), 0..=max_len).prop_map(|mut acls| {
        let mut seen = std::collections::HashSet::new();
        acls.retain(|acl| seen.insert(acl.principal.clone()));
        acls
    })
}

/// Generate a destination.
pub fn destination() -> impl Strategy<Value = Destination> {
    prop_oneof![Just(Destination::Backup), Just(Destination::Account)]
}

/// An ACL together with a migration over some of its principals.
#[derive(Debug, Clone)]
pub struct MigrationParams {
    pub acls: Vec<AclEntry>,
    /// Per entry: `None` if not migrating, `Some(target)` if migrating,
    /// where a `None` target means the migration has nowhere to put it.
    pub decisions: Vec<Option<Option<String>>>,
    pub destination: Destination,
}

impl MigrationParams {
    /// The migration state encoded by `decisions`.
    pub fn state(&self) -> GroupMigrationState {
        self.acls
            .iter()
            .zip(&self.decisions)
            .filter_map(|(acl, decision)| {
                decision.as_ref().map(|target| {
                    let target = target.clone();
                    MigratedGroup {
                        workspace_name: acl.principal.clone(),
                        backup_name: target.clone(),
                        account_name: target,
                    }
                })
            })
            .collect()
    }
}

impl Arbitrary for MigrationParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        acl_list(12)
            .prop_flat_map(|acls| {
                let len = acls.len();
                let decision = prop_oneof![
                    2 => Just(None),
                    2 => "[a-z]{1,12}-migrated".prop_map(|t| Some(Some(t))),
                    1 => Just(Some(None)),
                ];
                (
                    Just(acls),
                    prop::collection::vec(decision, len),
                    destination(),
                )
            })
            .prop_map(|(acls, decisions, destination)| MigrationParams {
                acls,
                decisions,
                destination,
            })
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scope_acl_core::{MigrationState, PermissionRecord};
    use scope_acl_secrets::AclPlan;

    proptest! {
        #[test]
        fn test_acl_list_principals_unique(acls in acl_list(20)) {
            let mut principals: Vec<_> = acls.iter().map(|a| &a.principal).collect();
            principals.sort();
            principals.dedup();
            prop_assert_eq!(principals.len(), acls.len());
        }

        #[test]
        fn test_record_roundtrip(acls in acl_list(20)) {
            let record = PermissionRecord::capture("scope", "secrets", &acls).unwrap();
            prop_assert_eq!(record.acls().unwrap(), acls);
        }

        #[test]
        fn test_plan_writes_exactly_resolved(params: MigrationParams) {
            let state = params.state();
            let plan = AclPlan::build(params.acls.clone(), &state, params.destination);

            let expected: Vec<AclEntry> = params
                .acls
                .iter()
                .zip(&params.decisions)
                .filter_map(|(acl, decision)| match decision {
                    Some(Some(target)) => Some(AclEntry::new(target.clone(), acl.permission)),
                    _ => None,
                })
                .collect();

            prop_assert_eq!(plan.writes(), expected);
            prop_assert_eq!(
                plan.is_relevant(),
                params.acls.iter().any(|a| state.is_in_scope(&a.principal))
            );
        }
    }
}
