//! Permission support for secret scopes.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use scope_acl_core::{
    AclEntry, AclPermission, Destination, MigrationState, PermissionRecord, PermissionSupport,
    SecretScope, Task,
};
use scope_acl_workspace::SecretsApi;
use tracing::{debug, info};

use crate::config::SecretsConfig;
use crate::error::{Result, SecretsError};
use crate::limiter::RateLimiter;
use crate::plan::AclPlan;
use crate::writer::AclWriter;

/// Object type tag of secret scope records.
pub const SECRETS_OBJECT_TYPE: &str = "secrets";

/// Crawls and re-applies secret scope ACLs.
pub struct SecretScopesSupport<C> {
    client: Arc<C>,
    writer: AclWriter<C>,
}

impl<C: SecretsApi + 'static> SecretScopesSupport<C> {
    /// Create a support using default settings and the process-wide rate limit.
    pub fn new(client: Arc<C>) -> Self {
        Self::with_config(client, SecretsConfig::default())
    }

    /// Create a support with custom consistency-check settings.
    pub fn with_config(client: Arc<C>, config: SecretsConfig) -> Self {
        let writer = AclWriter::new(Arc::clone(&client), RateLimiter::global(), config);
        Self { client, writer }
    }

    /// Draw writes from `limiter` instead of the process-wide budget.
    pub fn with_rate_limiter(self, limiter: RateLimiter) -> Self {
        let config = self.writer.config().clone();
        let writer = AclWriter::new(Arc::clone(&self.client), limiter, config);
        Self {
            client: self.client,
            writer,
        }
    }

    /// The writer apply tasks use.
    pub fn writer(&self) -> &AclWriter<C> {
        &self.writer
    }

    /// The permission currently reported for `principal` on `scope`.
    pub async fn secret_scope_permission(
        &self,
        scope: &str,
        principal: &str,
    ) -> Result<Option<AclPermission>> {
        self.writer.secret_scope_permission(scope, principal).await
    }

    fn crawler_task(&self, scope: SecretScope) -> Task<PermissionRecord, SecretsError> {
        let label = format!("{}:{}", SECRETS_OBJECT_TYPE, scope.name);
        Task::new(label, capture_scope(Arc::clone(&self.client), scope))
    }
}

/// Snapshot one scope's ACL.
async fn capture_scope<C: SecretsApi>(
    client: Arc<C>,
    scope: SecretScope,
) -> Result<PermissionRecord> {
    let acls = client.list_acls(&scope.name).await?;
    debug!(scope = %scope.name, entries = acls.len(), "captured secret scope acls");
    Ok(PermissionRecord::capture(scope.name, SECRETS_OBJECT_TYPE, &acls)?)
}

/// Write each entry in order, stopping at the first failure.
async fn apply_acls<C: SecretsApi>(
    writer: AclWriter<C>,
    scope: String,
    writes: Vec<AclEntry>,
) -> Result<bool> {
    for acl in &writes {
        writer
            .put_and_verify(&scope, &acl.principal, acl.permission)
            .await?;
    }
    info!(scope = %scope, applied = writes.len(), "secret scope acls applied");
    Ok(true)
}

#[async_trait]
impl<C: SecretsApi + 'static> PermissionSupport for SecretScopesSupport<C> {
    type Error = SecretsError;

    fn object_types(&self) -> BTreeSet<&'static str> {
        BTreeSet::from([SECRETS_OBJECT_TYPE])
    }

    async fn crawler_tasks(&self) -> Result<Vec<Task<PermissionRecord, SecretsError>>> {
        let scopes = self.client.list_scopes().await?;
        debug!(count = scopes.len(), "listed secret scopes");

        Ok(scopes
            .into_iter()
            .map(|scope| self.crawler_task(scope))
            .collect())
    }

    fn apply_task(
        &self,
        item: &PermissionRecord,
        state: &dyn MigrationState,
        destination: Destination,
    ) -> Result<Option<Task<bool, SecretsError>>> {
        item.ensure_type(SECRETS_OBJECT_TYPE)?;
        let plan = AclPlan::build(item.acls()?, state, destination);

        if !plan.is_relevant() {
            debug!(scope = %item.object_id, "no migrated principals, skipping");
            return Ok(None);
        }

        for acl in plan.dropped() {
            debug!(
                scope = %item.object_id,
                principal = %acl.principal,
                %destination,
                "skipping principal without a target principal"
            );
        }

        let label = format!("{}:{}", SECRETS_OBJECT_TYPE, item.object_id);
        let task = apply_acls(self.writer.clone(), item.object_id.clone(), plan.writes());

        Ok(Some(Task::new(label, task)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scope_acl_core::{CoreError, GroupMigrationState, MigratedGroup};
    use scope_acl_workspace::{ApiError, MemoryWorkspace, PutRecord};

    fn support(
        ws: MemoryWorkspace,
    ) -> (Arc<MemoryWorkspace>, SecretScopesSupport<MemoryWorkspace>) {
        let ws = Arc::new(ws);
        let support =
            SecretScopesSupport::new(Arc::clone(&ws)).with_rate_limiter(RateLimiter::new(8));
        (ws, support)
    }

    fn migration() -> GroupMigrationState {
        GroupMigrationState::new()
            .with_group(MigratedGroup::new("A", "A2", "A-account"))
            .with_group(MigratedGroup {
                workspace_name: "orphan".into(),
                backup_name: None,
                account_name: None,
            })
    }

    fn record(scope: &str, acls: &[AclEntry]) -> PermissionRecord {
        PermissionRecord::capture(scope, SECRETS_OBJECT_TYPE, acls).unwrap()
    }

    struct NothingInScope;

    impl MigrationState for NothingInScope {
        fn is_in_scope(&self, _principal: &str) -> bool {
            false
        }

        fn get_target_principal(&self, _principal: &str, _destination: Destination) -> Option<String> {
            None
        }
    }

    #[test]
    fn test_object_types() {
        let (_ws, support) = support(MemoryWorkspace::new());
        assert_eq!(support.object_types(), BTreeSet::from(["secrets"]));
        assert!(support.supports("secrets"));
        assert!(!support.supports("clusters"));
    }

    #[tokio::test]
    async fn test_crawler_records_match_live_acls() {
        let ws = MemoryWorkspace::new();
        let prod = vec![
            AclEntry::new("admins", AclPermission::Manage),
            AclEntry::new("A", AclPermission::Write),
        ];
        ws.seed_scope("prod", prod.clone());
        ws.create_scope("dev");
        let (_ws, support) = support(ws);

        let tasks = support.crawler_tasks().await.unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].label(), "secrets:dev");

        let mut records = Vec::new();
        for task in tasks {
            records.push(task.run().await.unwrap());
        }

        assert!(records.iter().all(|r| r.object_type == "secrets"));
        assert_eq!(records[0].object_id, "dev");
        assert!(records[0].acls().unwrap().is_empty());
        assert_eq!(records[1].object_id, "prod");
        assert_eq!(records[1].acls().unwrap(), prod);
    }

    #[tokio::test]
    async fn test_crawler_fetch_is_deferred() {
        let ws = MemoryWorkspace::new();
        ws.create_scope("prod");
        let (ws, support) = support(ws);

        let tasks = support.crawler_tasks().await.unwrap();
        assert_eq!(ws.acl_reads("prod"), 0);

        for task in tasks {
            task.run().await.unwrap();
        }
        assert_eq!(ws.acl_reads("prod"), 1);
    }

    #[tokio::test]
    async fn test_crawler_listing_failure_propagates() {
        let ws = MemoryWorkspace::new();
        ws.fail_listing();
        let (_ws, support) = support(ws);

        let err = support.crawler_tasks().await.unwrap_err();
        assert!(matches!(err, SecretsError::Api(ApiError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_crawler_task_failure_surfaces_on_run() {
        let (ws, support) = support(MemoryWorkspace::new());
        ws.create_scope("prod");

        let task = support.crawler_task(SecretScope::new("gone"));
        let err = task.run().await.unwrap_err();
        assert!(matches!(err, SecretsError::Api(ApiError::ScopeNotFound(_))));
    }

    #[test]
    fn test_irrelevant_record_yields_no_task() {
        let (_ws, support) = support(MemoryWorkspace::new());
        let item = record(
            "prod",
            &[
                AclEntry::new("A", AclPermission::Write),
                AclEntry::new("B", AclPermission::Read),
            ],
        );

        let task = support
            .apply_task(&item, &NothingInScope, Destination::Backup)
            .unwrap();
        assert!(task.is_none());
    }

    #[test]
    fn test_malformed_record_is_an_error() {
        let (_ws, support) = support(MemoryWorkspace::new());
        let item = PermissionRecord {
            object_id: "prod".into(),
            object_type: SECRETS_OBJECT_TYPE.into(),
            raw: "not json".into(),
        };

        let err = support
            .apply_task(&item, &migration(), Destination::Backup)
            .unwrap_err();
        assert!(matches!(err, SecretsError::Core(CoreError::MalformedRecord { .. })));
    }

    #[test]
    fn test_foreign_record_is_rejected() {
        let (_ws, support) = support(MemoryWorkspace::new());
        let item = PermissionRecord::capture("c-1", "clusters", &[]).unwrap();

        let err = support
            .apply_task(&item, &migration(), Destination::Backup)
            .unwrap_err();
        assert!(matches!(
            err,
            SecretsError::Core(CoreError::UnsupportedObjectType { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_apply_writes_only_remapped() {
        let ws = MemoryWorkspace::new();
        let acls = vec![
            AclEntry::new("A", AclPermission::Write),
            AclEntry::new("B", AclPermission::Read),
        ];
        ws.seed_scope("prod", acls.clone());
        let (ws, support) = support(ws);

        let task = support
            .apply_task(&record("prod", &acls), &migration(), Destination::Backup)
            .unwrap()
            .expect("record is relevant");

        // Building the task issues nothing.
        assert!(ws.put_log().is_empty());
        assert!(task.run().await.unwrap());

        assert_eq!(
            ws.put_log(),
            vec![PutRecord {
                scope: "prod".into(),
                principal: "A2".into(),
                permission: AclPermission::Write,
            }]
        );
        assert!(ws
            .acls("prod")
            .unwrap()
            .contains(&AclEntry::new("B", AclPermission::Read)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_apply_drops_principal_without_target() {
        let ws = MemoryWorkspace::new();
        let acls = vec![
            AclEntry::new("orphan", AclPermission::Manage),
            AclEntry::new("A", AclPermission::Read),
        ];
        ws.seed_scope("prod", acls.clone());
        let (ws, support) = support(ws);

        let task = support
            .apply_task(&record("prod", &acls), &migration(), Destination::Account)
            .unwrap()
            .expect("record is relevant");
        assert!(task.run().await.unwrap());

        let principals: Vec<_> = ws.put_log().into_iter().map(|p| p.principal).collect();
        assert_eq!(principals, vec!["A-account"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_apply_with_only_dropped_principals_writes_nothing() {
        let ws = MemoryWorkspace::new();
        let acls = vec![AclEntry::new("orphan", AclPermission::Manage)];
        ws.seed_scope("prod", acls.clone());
        let (ws, support) = support(ws);

        let task = support
            .apply_task(&record("prod", &acls), &migration(), Destination::Backup)
            .unwrap()
            .expect("orphan is in scope");
        assert!(task.run().await.unwrap());
        assert!(ws.put_log().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_apply_stops_at_first_failure() {
        let state = GroupMigrationState::new()
            .with_group(MigratedGroup::new("g1", "g1-new", "g1-acct"))
            .with_group(MigratedGroup::new("g2", "g2-new", "g2-acct"))
            .with_group(MigratedGroup::new("g3", "g3-new", "g3-acct"));
        let acls = vec![
            AclEntry::new("g1", AclPermission::Read),
            AclEntry::new("g2", AclPermission::Write),
            AclEntry::new("g3", AclPermission::Manage),
        ];
        let ws = MemoryWorkspace::new();
        ws.seed_scope("prod", acls.clone());
        ws.override_permission("g2-new", AclPermission::Read);
        let (ws, support) = support(ws);

        let task = support
            .apply_task(&record("prod", &acls), &state, Destination::Backup)
            .unwrap()
            .expect("record is relevant");
        let err = task.run().await.unwrap_err();

        assert!(matches!(err, SecretsError::PermissionMismatch { ref principal, .. } if principal == "g2-new"));
        let principals: Vec<_> = ws.put_log().into_iter().map(|p| p.principal).collect();
        assert_eq!(principals, vec!["g1-new", "g2-new"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_apply_is_rerunnable() {
        let ws = MemoryWorkspace::new().with_read_lag(1);
        let acls = vec![AclEntry::new("A", AclPermission::Write)];
        ws.seed_scope("prod", acls.clone());
        let (ws, support) = support(ws);
        let item = record("prod", &acls);

        for _ in 0..2 {
            let task = support
                .apply_task(&item, &migration(), Destination::Backup)
                .unwrap()
                .expect("record is relevant");
            assert!(task.run().await.unwrap());
        }

        let acls = ws.acls("prod").unwrap();
        assert_eq!(
            acls.iter().filter(|a| a.principal == "A2").count(),
            1
        );
    }

    #[tokio::test]
    async fn test_secret_scope_permission_delegates() {
        let ws = MemoryWorkspace::new();
        ws.seed_scope("prod", vec![AclEntry::new("admins", AclPermission::Manage)]);
        let (_ws, support) = support(ws);

        assert_eq!(
            support.secret_scope_permission("prod", "admins").await.unwrap(),
            Some(AclPermission::Manage)
        );
    }
}
