use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Serializes work per driver id across concurrent ingest streams.
#[derive(Debug, Clone, Default)]
pub struct DriverLocks {
    inner: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl DriverLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `driver_id`. Access is released when the
    /// guard drops.
    pub async fn lock(&self, driver_id: &str) -> DriverGuard {
        let lock = self
            .inner
            .entry(driver_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = lock.lock_owned().await;
        DriverGuard {
            driver_id: driver_id.to_string(),
            locks: Arc::clone(&self.inner),
            guard: Some(guard),
        }
    }

    /// Number of drivers with a lock currently allocated.
    #[must_use]
    pub fn active(&self) -> usize {
        self.inner.len()
    }
}

pub struct DriverGuard {
    driver_id: String,
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for DriverGuard {
    fn drop(&mut self) {
        self.guard.take();

        // drop the lock entry once nobody else holds or awaits it
        self.locks.remove_if(&self.driver_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn released_on_drop() {
        let locks = DriverLocks::new();
        {
            let _guard = locks.lock("d-1").await;
            assert_eq!(locks.active(), 1);
        }
        assert_eq!(locks.active(), 0);
    }

    #[tokio::test]
    async fn same_driver_waits() {
        let locks = DriverLocks::new();
        let guard = locks.lock("d-1").await;

        let contended = tokio::time::timeout(Duration::from_millis(20), locks.lock("d-1")).await;
        assert!(contended.is_err());

        let other = tokio::time::timeout(Duration::from_millis(20), locks.lock("d-2")).await;
        assert!(other.is_ok());

        drop(guard);
        let reacquired = tokio::time::timeout(Duration::from_millis(20), locks.lock("d-1")).await;
        assert!(reacquired.is_ok());
    }
}
