//! # Scope ACL Workspace
//!
//! The seam between the migration code and the workspace secrets API.
//!
//! ## Overview
//!
//! Everything that talks to the workspace goes through the [`SecretsApi`]
//! trait, so the crawl and apply logic is independent of the HTTP client.
//! [`MemoryWorkspace`] implements the trait in memory, including the
//! read-after-write lag of the real backend, for tests.
//!
//! ## Key Types
//!
//! - [`SecretsApi`] - The async trait for listing scopes and reading/writing ACLs
//! - [`MemoryWorkspace`] - In-memory implementation with fault injection
//! - [`ApiError`] - Errors surfaced by an API implementation
//!
//! ## Usage
//!
//! ```rust,no_run
//! use scope_acl_core::AclPermission;
//! use scope_acl_workspace::{MemoryWorkspace, SecretsApi};
//!
//! async fn example() {
//!     let ws = MemoryWorkspace::new();
//!     ws.create_scope("prod");
//!     ws.put_acl("prod", "admins", AclPermission::Manage).await.unwrap();
//!
//!     let acls = ws.list_acls("prod").await.unwrap();
//!     assert_eq!(acls.len(), 1);
//! }
//! ```

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{ApiError, Result};
pub use memory::{MemoryWorkspace, PutRecord};
pub use traits::SecretsApi;
