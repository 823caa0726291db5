//! # Scope ACL Testkit
//!
//! Testing utilities for scope ACL migration.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Exact persisted payloads that must never change
//! - **Generators**: Proptest strategies for ACLs and migrations
//! - **Fixtures**: A seeded in-memory workspace wired to a fast support
//!
//! ## Golden Vectors
//!
//! The `raw` payload of a permission record is stored outside this process,
//! so its bytes are pinned:
//!
//! ```rust
//! use scope_acl_testkit::vectors::verify_all_vectors;
//!
//! verify_all_vectors().unwrap();
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use scope_acl_testkit::generators::acl_list;
//!
//! proptest! {
//!     #[test]
//!     fn payload_roundtrips(acls in acl_list(16)) {
//!         // ...
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use scope_acl_core::{AclEntry, AclPermission};
//! use scope_acl_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! fixture.seed("prod", vec![AclEntry::new("admins", AclPermission::Manage)]);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{migration_state, TestFixture};
pub use generators::{acl_entry, acl_list, permission, principal, MigrationParams};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
