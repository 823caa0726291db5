//! SecretsApi trait: the workspace calls the migration depends on.

use std::sync::Arc;

use async_trait::async_trait;
use scope_acl_core::{AclEntry, AclPermission, SecretScope};

use crate::error::Result;

/// Secret scope and ACL operations of the workspace API.
///
/// Writes are full overwrites of one principal's grant, so repeating a
/// `put_acl` is idempotent. Reads may lag behind writes.
#[async_trait]
pub trait SecretsApi: Send + Sync {
    /// List all secret scopes.
    async fn list_scopes(&self) -> Result<Vec<SecretScope>>;

    /// List the ACL of a scope, in the order the backend reports it.
    async fn list_acls(&self, scope: &str) -> Result<Vec<AclEntry>>;

    /// Set `principal`'s permission on `scope`, replacing any previous grant.
    async fn put_acl(&self, scope: &str, principal: &str, permission: AclPermission) -> Result<()>;
}

#[async_trait]
impl<T: SecretsApi + ?Sized> SecretsApi for Arc<T> {
    async fn list_scopes(&self) -> Result<Vec<SecretScope>> {
        (**self).list_scopes().await
    }

    async fn list_acls(&self, scope: &str) -> Result<Vec<AclEntry>> {
        (**self).list_acls(scope).await
    }

    async fn put_acl(&self, scope: &str, principal: &str, permission: AclPermission) -> Result<()> {
        (**self).put_acl(scope, principal, permission).await
    }
}
