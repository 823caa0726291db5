//! Process-wide concurrency budget for ACL writes.
//!
//! The workspace API throttles aggressively, so every put-and-verify call in
//! the process draws from one shared counting semaphore. A permit is held for
//! the whole write plus its read-back and released when the guard drops,
//! whichever way the call ends.

use std::sync::{Arc, OnceLock};

use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};
use tracing::debug;

/// Maximum put-and-verify calls in flight across the process.
pub const MAX_INFLIGHT_REQUESTS: usize = 30;

static GLOBAL: OnceLock<RateLimiter> = OnceLock::new();

/// A cloneable handle to a shared concurrency budget.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    semaphore: Arc<Semaphore>,
    permits: usize,
}

impl RateLimiter {
    /// Create a private budget of `permits` concurrent calls (at least one).
    pub fn new(permits: usize) -> Self {
        let permits = permits.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(permits)),
            permits,
        }
    }

    /// The process-wide budget of [`MAX_INFLIGHT_REQUESTS`].
    pub fn global() -> Self {
        GLOBAL
            .get_or_init(|| Self::new(MAX_INFLIGHT_REQUESTS))
            .clone()
    }

    /// Total size of the budget.
    pub fn permits(&self) -> usize {
        self.permits
    }

    /// Permits not currently held.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Wait for a slot. The slot is returned when the permit is dropped.
    pub async fn acquire(&self) -> Result<OwnedSemaphorePermit, AcquireError> {
        if self.semaphore.available_permits() == 0 {
            debug!(permits = self.permits, "rate limit reached, waiting for a slot");
        }
        Arc::clone(&self.semaphore).acquire_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn test_global_is_shared() {
        let a = RateLimiter::global();
        let b = RateLimiter::global();
        assert!(Arc::ptr_eq(&a.semaphore, &b.semaphore));
        assert_eq!(a.permits(), MAX_INFLIGHT_REQUESTS);
    }

    #[test]
    fn test_zero_permits_clamped() {
        assert_eq!(RateLimiter::new(0).permits(), 1);
    }

    #[tokio::test]
    async fn test_permit_released_on_drop() {
        let limiter = RateLimiter::new(2);
        let permit = limiter.acquire().await.unwrap();
        assert_eq!(limiter.available(), 1);
        drop(permit);
        assert_eq!(limiter.available(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_caps_concurrency() {
        let limiter = RateLimiter::new(MAX_INFLIGHT_REQUESTS);
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..100 {
            let limiter = limiter.clone();
            let active = Arc::clone(&active);
            let peak = Arc::clone(&peak);
            handles.push(tokio::spawn(async move {
                let _permit = limiter.acquire().await.unwrap();
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(50)).await;
                active.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(peak.load(Ordering::SeqCst), MAX_INFLIGHT_REQUESTS);
        assert_eq!(limiter.available(), MAX_INFLIGHT_REQUESTS);
    }
}
