//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;
use std::time::Duration;

use scope_acl_core::{
    AclEntry, Destination, GroupMigrationState, MigratedGroup, MigrationState, PermissionRecord,
    PermissionSupport,
};
use scope_acl_secrets::{RateLimiter, SecretScopesSupport, SecretsConfig, SecretsError};
use scope_acl_workspace::MemoryWorkspace;

/// An in-memory workspace and a support wired to it.
///
/// The support never sleeps between read-backs and draws from a private
/// rate limit, so fixtures do not interfere with each other.
pub struct TestFixture {
    pub workspace: Arc<MemoryWorkspace>,
    pub support: SecretScopesSupport<MemoryWorkspace>,
}

impl TestFixture {
    /// Create a fixture over an immediately consistent workspace.
    pub fn new() -> Self {
        Self::with_workspace(MemoryWorkspace::new())
    }

    /// Create a fixture whose writes stay hidden for `listings` reads.
    pub fn with_read_lag(listings: u32) -> Self {
        Self::with_workspace(MemoryWorkspace::new().with_read_lag(listings))
    }

    /// Create a fixture over a preconfigured workspace.
    pub fn with_workspace(workspace: MemoryWorkspace) -> Self {
        let workspace = Arc::new(workspace);
        let config = SecretsConfig::default().with_max_jitter(Duration::ZERO);
        let support = SecretScopesSupport::with_config(Arc::clone(&workspace), config)
            .with_rate_limiter(RateLimiter::new(8));
        Self { workspace, support }
    }

    /// Seed a scope with an ACL.
    pub fn seed(&self, scope: &str, acls: Vec<AclEntry>) {
        self.workspace.seed_scope(scope, acls);
    }

    /// Run every crawler task in order.
    pub async fn crawl(&self) -> Result<Vec<PermissionRecord>, SecretsError> {
        let mut records = Vec::new();
        for task in self.support.crawler_tasks().await? {
            records.push(task.run().await?);
        }
        Ok(records)
    }

    /// Build and run the apply task of every record.
    ///
    /// Returns one entry per record: `None` when the record was not
    /// relevant, otherwise the task's outcome.
    pub async fn apply(
        &self,
        records: &[PermissionRecord],
        state: &dyn MigrationState,
        destination: Destination,
    ) -> Vec<Option<Result<bool, SecretsError>>> {
        let mut outcomes = Vec::with_capacity(records.len());
        for record in records {
            let outcome = match self.support.apply_task(record, state, destination) {
                Ok(Some(task)) => Some(task.run().await),
                Ok(None) => None,
                Err(e) => Some(Err(e)),
            };
            outcomes.push(outcome);
        }
        outcomes
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a migration state from `(workspace, backup, account)` triples.
pub fn migration_state(groups: &[(&str, &str, &str)]) -> GroupMigrationState {
    groups
        .iter()
        .map(|(workspace, backup, account)| MigratedGroup::new(*workspace, *backup, *account))
        .collect()
}
