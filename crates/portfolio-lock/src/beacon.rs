//! Fire-and-forget lock release
//!
//! Used when the editing surface is going away (hidden, unloading, dropped)
//! and cannot wait for a round-trip. Dispatch must return immediately; the
//! release is best-effort and, if it never lands, the lock simply expires.

use std::sync::Arc;

use crate::store::LockStore;
use crate::LockId;

/// Non-blocking release transport
pub trait ReleaseBeacon: Send + Sync {
    /// Queue a release of `lock_id` without waiting for it
    fn dispatch(&self, lock_id: LockId);
}

/// Spawns the delete on the ambient tokio runtime
pub struct StoreReleaseBeacon {
    store: Arc<dyn LockStore>,
}

impl StoreReleaseBeacon {
    pub fn new(store: Arc<dyn LockStore>) -> Self {
        Self { store }
    }
}

impl ReleaseBeacon for StoreReleaseBeacon {
    fn dispatch(&self, lock_id: LockId) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(%lock_id, "no runtime for release beacon; lock will expire instead");
            return;
        };
        let store = Arc::clone(&self.store);
        handle.spawn(async move {
            match store.delete(&lock_id).await {
                Ok(()) => tracing::debug!(%lock_id, "beacon released edit lock"),
                Err(err) => tracing::warn!(%lock_id, %err, "beacon release failed"),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EditLock, InMemoryLockStore, UserContext};

    #[tokio::test]
    async fn dispatch_deletes_in_background() {
        let store = Arc::new(InMemoryLockStore::new());
        let lock = store
            .insert(EditLock::new(
                "p-1",
                &UserContext::new("u-1", "Ana"),
                chrono::Utc::now(),
                chrono::Duration::minutes(10),
            ))
            .await
            .unwrap();

        let beacon = StoreReleaseBeacon::new(store.clone());
        beacon.dispatch(lock.id);
        assert_eq!(store.rows().await.len(), 1, "dispatch must not wait");

        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
        assert!(store.rows().await.is_empty());
    }

    #[test]
    fn dispatch_without_runtime_is_a_no_op() {
        let store = Arc::new(InMemoryLockStore::new());
        StoreReleaseBeacon::new(store).dispatch(LockId::new());
    }
}
