//! # Scope ACL
//!
//! Capture secret scope ACLs before a workspace group migration and
//! re-apply them to the migrated groups afterwards.
//!
//! ## Overview
//!
//! The work is split into two phases driven by an external pipeline:
//!
//! - **Crawl**: [`SecretScopesSupport`] lists scopes and returns one deferred
//!   task per scope. Each task snapshots the scope's ACL as a
//!   [`PermissionRecord`], which the pipeline persists.
//! - **Apply**: once a [`MigrationState`] exists, each persisted record is
//!   turned into a task that grants every migrated principal's permission to
//!   its replacement, waiting for each write to become visible.
//!
//! ## Key Concepts
//!
//! - **Relevance**: records with no migrating principal produce no task.
//! - **Implicit revoke**: a migrating principal without a target is dropped.
//! - **Shared budget**: all writes in the process share one
//!   [`RateLimiter`] of [`MAX_INFLIGHT_REQUESTS`] slots.
//! - **In-flight check**: after each write the ACL is re-read with jitter
//!   until it shows the written value, a different value, or attempts run out.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use scope_acl::{
//!     Destination, GroupMigrationState, MemoryWorkspace, MigratedGroup, PermissionSupport,
//!     SecretScopesSupport,
//! };
//!
//! async fn example() {
//!     let support = SecretScopesSupport::new(Arc::new(MemoryWorkspace::new()));
//!
//!     // Crawl phase
//!     let mut records = Vec::new();
//!     for task in support.crawler_tasks().await.unwrap() {
//!         records.push(task.run().await.unwrap());
//!     }
//!
//!     // Apply phase
//!     let state = GroupMigrationState::new()
//!         .with_group(MigratedGroup::new("analysts", "db-temp-analysts", "analysts"));
//!     for record in &records {
//!         if let Some(task) = support.apply_task(record, &state, Destination::Backup).unwrap() {
//!             task.run().await.unwrap();
//!         }
//!     }
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `scope_acl::core` - Data model and contracts
//! - `scope_acl::workspace` - Workspace API seam and in-memory workspace
//! - `scope_acl::secrets` - Secret scope support

// Re-export component crates
pub use scope_acl_core as core;
pub use scope_acl_secrets as secrets;
pub use scope_acl_workspace as workspace;

// Re-export main types for convenience
pub use scope_acl_core::{
    AclEntry, AclPermission, CoreError, Destination, GroupMigrationState, MigratedGroup,
    MigrationState, PermissionRecord, PermissionSupport, SecretScope, Task,
};
pub use scope_acl_secrets::{
    AclChange, AclPlan, AclWriter, RateLimiter, SecretScopesSupport, SecretsConfig, SecretsError,
    MAX_INFLIGHT_REQUESTS, SECRETS_OBJECT_TYPE,
};
pub use scope_acl_workspace::{ApiError, MemoryWorkspace, SecretsApi};
