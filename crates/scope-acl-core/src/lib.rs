//! # Scope ACL Core
//!
//! Pure types for capturing and re-applying secret-scope ACLs during a
//! workspace group migration.
//!
//! This crate contains no I/O. It defines the data that flows between the
//! crawl and apply phases and the contracts the rest of the workspace plugs
//! into.
//!
//! ## Key Types
//!
//! - [`AclEntry`] - One grant of an [`AclPermission`] to a principal
//! - [`PermissionRecord`] - A captured ACL snapshot for one object
//! - [`MigrationState`] - Decides which principals move and where to
//! - [`PermissionSupport`] - Produces crawl and apply [`Task`]s for one object type
//!
//! ## Persisted Format
//!
//! [`PermissionRecord::raw`] holds a compact JSON array of
//! `{"principal": .., "permission": ..}` objects. See [`record`].

pub mod error;
pub mod record;
pub mod state;
pub mod support;
pub mod types;

pub use error::{CoreError, Result};
pub use record::PermissionRecord;
pub use state::{GroupMigrationState, MigratedGroup, MigrationState};
pub use support::{PermissionSupport, Task};
pub use types::{AclEntry, AclPermission, Destination, SecretScope};
