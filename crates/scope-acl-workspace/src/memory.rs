//! In-memory implementation of the SecretsApi trait.
//!
//! This is primarily for testing. Scopes and ACLs live in a map, and the
//! backend's read-after-write lag is simulated: with a read lag of `n`, a
//! freshly written principal stays invisible for the next `n` ACL listings
//! of its scope. Faults can be injected per principal, and every call is
//! counted so tests can assert exactly what was issued.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use async_trait::async_trait;
use scope_acl_core::{AclEntry, AclPermission, SecretScope};
use tracing::trace;

use crate::error::{ApiError, Result};
use crate::traits::SecretsApi;

/// One `put_acl` call as received by the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutRecord {
    pub scope: String,
    pub principal: String,
    pub permission: AclPermission,
}

/// In-memory workspace.
///
/// Thread-safe via RwLock. All data is lost when dropped.
pub struct MemoryWorkspace {
    inner: RwLock<MemoryWorkspaceInner>,
    /// Simulated latency of each `put_acl`.
    put_delay: Duration,
    /// `put_acl` calls currently executing.
    puts_in_flight: AtomicUsize,
    /// High-water mark of `puts_in_flight`.
    max_puts_in_flight: AtomicUsize,
}

#[derive(Default)]
struct MemoryWorkspaceInner {
    /// Scope name -> ACL in backend order.
    scopes: BTreeMap<String, Vec<AclEntry>>,

    /// (scope, principal) -> listings left before the write shows up.
    pending: HashMap<(String, String), u32>,

    /// Listings a new write stays hidden for.
    read_lag: u32,

    /// Principal -> permission its writes actually land with.
    overrides: HashMap<String, AclPermission>,

    /// Principals whose writes are rejected.
    failing_puts: HashSet<String>,

    /// Whether `list_scopes` fails.
    fail_listing: bool,

    /// Every accepted write, in order.
    put_log: Vec<PutRecord>,

    /// Scope -> number of `list_acls` calls.
    acl_reads: HashMap<String, usize>,
}

/// Decrements the in-flight counter on every exit path.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MemoryWorkspace {
    /// Create an empty, immediately consistent workspace.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryWorkspaceInner::default()),
            put_delay: Duration::ZERO,
            puts_in_flight: AtomicUsize::new(0),
            max_puts_in_flight: AtomicUsize::new(0),
        }
    }

    /// Hide each write for the next `listings` ACL listings of its scope.
    pub fn with_read_lag(self, listings: u32) -> Self {
        self.write().read_lag = listings;
        self
    }

    /// Make every `put_acl` take `delay` before it lands.
    pub fn with_put_delay(mut self, delay: Duration) -> Self {
        self.put_delay = delay;
        self
    }

    /// Create an empty scope (no-op if it exists).
    pub fn create_scope(&self, name: &str) {
        self.write().scopes.entry(name.to_string()).or_default();
    }

    /// Seed a scope with ACLs, bypassing lag and the write log.
    pub fn seed_scope(&self, name: &str, acls: Vec<AclEntry>) {
        self.write().scopes.insert(name.to_string(), acls);
    }

    /// Make writes for `principal` land as `permission` regardless of the
    /// requested value.
    pub fn override_permission(&self, principal: &str, permission: AclPermission) {
        self.write()
            .overrides
            .insert(principal.to_string(), permission);
    }

    /// Reject every write for `principal`.
    pub fn fail_puts_for(&self, principal: &str) {
        self.write().failing_puts.insert(principal.to_string());
    }

    /// Make `list_scopes` fail.
    pub fn fail_listing(&self) {
        self.write().fail_listing = true;
    }

    /// The current ACL of a scope, ignoring read lag.
    pub fn acls(&self, scope: &str) -> Option<Vec<AclEntry>> {
        self.read().scopes.get(scope).cloned()
    }

    /// All accepted writes, in arrival order.
    pub fn put_log(&self) -> Vec<PutRecord> {
        self.read().put_log.clone()
    }

    /// Number of `list_acls` calls made for `scope`.
    pub fn acl_reads(&self, scope: &str) -> usize {
        self.read().acl_reads.get(scope).copied().unwrap_or(0)
    }

    /// Highest number of `put_acl` calls observed executing at once.
    pub fn max_concurrent_puts(&self) -> usize {
        self.max_puts_in_flight.load(Ordering::SeqCst)
    }

    fn read(&self) -> RwLockReadGuard<'_, MemoryWorkspaceInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemoryWorkspaceInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn enter_put(&self) -> InFlight<'_> {
        let now = self.puts_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_puts_in_flight.fetch_max(now, Ordering::SeqCst);
        InFlight(&self.puts_in_flight)
    }
}

impl Default for MemoryWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SecretsApi for MemoryWorkspace {
    async fn list_scopes(&self) -> Result<Vec<SecretScope>> {
        let inner = self.read();
        if inner.fail_listing {
            return Err(ApiError::Unavailable("scope listing failed".into()));
        }
        Ok(inner.scopes.keys().map(SecretScope::new).collect())
    }

    async fn list_acls(&self, scope: &str) -> Result<Vec<AclEntry>> {
        let mut inner = self.write();
        *inner.acl_reads.entry(scope.to_string()).or_default() += 1;

        let acls = inner
            .scopes
            .get(scope)
            .cloned()
            .ok_or_else(|| ApiError::ScopeNotFound(scope.to_string()))?;

        // Each listing consumes one unit of lag for every pending write.
        let mut hidden = HashSet::new();
        inner.pending.retain(|(s, principal), remaining| {
            if s != scope {
                return true;
            }
            hidden.insert(principal.clone());
            *remaining -= 1;
            *remaining > 0
        });

        Ok(acls
            .into_iter()
            .filter(|acl| !hidden.contains(&acl.principal))
            .collect())
    }

    async fn put_acl(&self, scope: &str, principal: &str, permission: AclPermission) -> Result<()> {
        let _in_flight = self.enter_put();
        if !self.put_delay.is_zero() {
            tokio::time::sleep(self.put_delay).await;
        }

        let mut inner = self.write();
        if inner.failing_puts.contains(principal) {
            return Err(ApiError::Request {
                status: 400,
                message: format!("cannot grant {} to {}", permission, principal),
            });
        }

        let landed = inner.overrides.get(principal).copied().unwrap_or(permission);
        let read_lag = inner.read_lag;

        let acls = inner
            .scopes
            .get_mut(scope)
            .ok_or_else(|| ApiError::ScopeNotFound(scope.to_string()))?;

        match acls.iter_mut().find(|acl| acl.principal == principal) {
            Some(existing) => existing.permission = landed,
            None => acls.push(AclEntry::new(principal, landed)),
        }

        if read_lag > 0 {
            inner
                .pending
                .insert((scope.to_string(), principal.to_string()), read_lag);
        }
        inner.put_log.push(PutRecord {
            scope: scope.to_string(),
            principal: principal.to_string(),
            permission,
        });
        trace!(scope, principal, %permission, "acl written");

        Ok(())
    }
}
