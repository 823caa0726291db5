//! The permission support contract.
//!
//! A crawl/apply pipeline drives one [`PermissionSupport`] per object type.
//! Supports never execute work themselves: they hand back [`Task`]s so the
//! pipeline decides how many run at once and in which order.

use std::collections::BTreeSet;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;

use crate::record::PermissionRecord;
use crate::state::MigrationState;
use crate::types::Destination;

type BoxedFuture<T, E> = Pin<Box<dyn Future<Output = std::result::Result<T, E>> + Send + 'static>>;

/// A deferred unit of work.
///
/// Nothing happens until [`run`](Task::run) is awaited. Tasks are `Send +
/// 'static`, so a scheduler may `tokio::spawn` them.
pub struct Task<T, E> {
    label: String,
    future: BoxedFuture<T, E>,
}

impl<T, E> Task<T, E> {
    /// Wrap a future as a task. The future must not have been polled.
    pub fn new<F>(label: impl Into<String>, future: F) -> Self
    where
        F: Future<Output = std::result::Result<T, E>> + Send + 'static,
    {
        Self {
            label: label.into(),
            future: Box::pin(future),
        }
    }

    /// Human-readable description for scheduler logs.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Execute the task.
    pub async fn run(self) -> std::result::Result<T, E> {
        self.future.await
    }
}

impl<T, E> fmt::Debug for Task<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task").field("label", &self.label).finish_non_exhaustive()
    }
}

/// Crawl and apply support for one family of object types.
#[async_trait]
pub trait PermissionSupport: Send + Sync {
    /// Error produced by listing, crawler tasks, and apply tasks.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The `object_type` tags this support owns.
    fn object_types(&self) -> BTreeSet<&'static str>;

    /// Whether records tagged `object_type` should be routed here.
    fn supports(&self, object_type: &str) -> bool {
        self.object_types().contains(object_type)
    }

    /// Enumerate objects and return one capture task per object.
    ///
    /// Enumeration failures are returned directly. Per-object failures only
    /// surface when the corresponding task runs.
    async fn crawler_tasks(
        &self,
    ) -> std::result::Result<Vec<Task<PermissionRecord, Self::Error>>, Self::Error>;

    /// Build the task that re-applies `item` after migration.
    ///
    /// Returns `Ok(None)` when nothing in the record is affected by the
    /// migration.
    fn apply_task(
        &self,
        item: &PermissionRecord,
        state: &dyn MigrationState,
        destination: Destination,
    ) -> std::result::Result<Option<Task<bool, Self::Error>>, Self::Error>;
}
