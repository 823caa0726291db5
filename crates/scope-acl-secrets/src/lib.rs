//! # Scope ACL Secrets
//!
//! Capture and re-apply of secret scope ACLs.
//!
//! ## Overview
//!
//! [`SecretScopesSupport`] implements the
//! [`PermissionSupport`](scope_acl_core::PermissionSupport) contract for the
//! `"secrets"` object type:
//!
//! - **Crawl**: one task per scope that snapshots its ACL into a
//!   [`PermissionRecord`](scope_acl_core::PermissionRecord).
//! - **Apply**: one task per record that writes the remapped grants back.
//!
//! Every write goes through [`AclWriter::put_and_verify`], which shares a
//! process-wide [`RateLimiter`] and then polls until the backend reports the
//! written value.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use scope_acl_core::{Destination, GroupMigrationState, MigratedGroup, PermissionSupport};
//! use scope_acl_secrets::SecretScopesSupport;
//! use scope_acl_workspace::MemoryWorkspace;
//!
//! async fn example() {
//!     let support = SecretScopesSupport::new(Arc::new(MemoryWorkspace::new()));
//!
//!     let mut records = Vec::new();
//!     for task in support.crawler_tasks().await.unwrap() {
//!         records.push(task.run().await.unwrap());
//!     }
//!
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
//! ## Design Notes
//!
//! - **Implicit revoke**: a migrated principal with no target is dropped from
//!   the new ACL rather than kept under its old name.
//! - **No rollback**: an apply task stops at the first failed write; writes
//!   before it stay applied. Re-running the task is safe because writes are
//!   overwrites.

pub mod config;
pub mod error;
pub mod limiter;
pub mod plan;
pub mod support;
pub mod writer;

pub use config::SecretsConfig;
pub use error::{Result, SecretsError};
pub use limiter::{RateLimiter, MAX_INFLIGHT_REQUESTS};
pub use plan::{AclChange, AclPlan};
pub use support::{SecretScopesSupport, SECRETS_OBJECT_TYPE};
pub use writer::AclWriter;
