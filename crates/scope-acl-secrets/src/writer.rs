//! Rate-limited ACL writes with read-back verification.
//!
//! The secrets ACL endpoint is eventually consistent: a write can return
//! before reads reflect it. After each write the writer polls the scope's
//! ACL, sleeping a random interval before every read, until it sees the
//! written value, sees a different value (fatal), or runs out of attempts.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use scope_acl_core::AclPermission;
use scope_acl_workspace::SecretsApi;
use tracing::{debug, warn};

use crate::config::SecretsConfig;
use crate::error::{Result, SecretsError};
use crate::limiter::RateLimiter;

/// Writes single ACL grants and confirms they landed.
pub struct AclWriter<C> {
    client: Arc<C>,
    limiter: RateLimiter,
    config: SecretsConfig,
}

impl<C> Clone for AclWriter<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            limiter: self.limiter.clone(),
            config: self.config.clone(),
        }
    }
}

impl<C: SecretsApi> AclWriter<C> {
    /// Create a writer drawing from `limiter`.
    pub fn new(client: Arc<C>, limiter: RateLimiter, config: SecretsConfig) -> Self {
        Self {
            client,
            limiter,
            config,
        }
    }

    /// The budget this writer draws from.
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// The consistency-check settings.
    pub fn config(&self) -> &SecretsConfig {
        &self.config
    }

    /// The permission currently reported for `principal` on `scope`.
    pub async fn secret_scope_permission(
        &self,
        scope: &str,
        principal: &str,
    ) -> Result<Option<AclPermission>> {
        let acls = self.client.list_acls(scope).await?;
        Ok(acls
            .into_iter()
            .find(|acl| acl.principal == principal)
            .map(|acl| acl.permission))
    }

    /// Grant `permission` to `principal` on `scope` and wait until it is
    /// visible.
    ///
    /// Holds one rate-limit slot for the write and all read-backs.
    pub async fn put_and_verify(
        &self,
        scope: &str,
        principal: &str,
        permission: AclPermission,
    ) -> Result<()> {
        let _permit = self.limiter.acquire().await?;

        debug!(scope, principal, %permission, "putting acl");
        self.client.put_acl(scope, principal, permission).await?;

        self.verify_applied(scope, principal, permission).await
    }

    async fn verify_applied(
        &self,
        scope: &str,
        principal: &str,
        expected: AclPermission,
    ) -> Result<()> {
        let attempts = self.config.verify_attempts;

        for attempt in 1..=attempts {
            tokio::time::sleep(jitter(self.config.max_jitter)).await;

            match self.secret_scope_permission(scope, principal).await? {
                Some(observed) if observed == expected => return Ok(()),
                Some(observed) => {
                    warn!(scope, principal, %expected, %observed, "applied permission differs");
                    return Err(SecretsError::PermissionMismatch {
                        scope: scope.to_string(),
                        principal: principal.to_string(),
                        expected,
                        observed,
                    });
                }
                None => debug!(scope, principal, attempt, "acl not visible yet"),
            }
        }

        warn!(scope, principal, attempts, "acl never became visible");
        Err(SecretsError::RetriesExhausted {
            scope: scope.to_string(),
            principal: principal.to_string(),
            expected,
            attempts,
        })
    }
}

/// A uniform random duration in `[0, max)`.
fn jitter(max: Duration) -> Duration {
    if max.is_zero() {
        return Duration::ZERO;
    }
    rand::thread_rng().gen_range(Duration::ZERO..max)
}
