//! In-memory store implementations
//!
//! Backed by `tokio::sync::RwLock<HashMap<..>>`. Each store has an
//! availability switch so callers can exercise backend outages.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use portfolio_core::{Project, ProjectId};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::store::{LockStore, ProjectStore, StoreError};
use crate::{EditLock, LockId};

fn check_available(offline: &AtomicBool) -> Result<(), StoreError> {
    if offline.load(Ordering::SeqCst) {
        Err(StoreError::Unavailable("store is offline".into()))
    } else {
        Ok(())
    }
}

// ============================================================================
// Lock Store
// ============================================================================

/// Lock table keyed by project id
#[derive(Debug, Default)]
pub struct InMemoryLockStore {
    rows: RwLock<HashMap<ProjectId, EditLock>>,
    offline: AtomicBool,
}

impl InMemoryLockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `Unavailable` (or stop doing so)
    pub fn set_available(&self, available: bool) {
        self.offline.store(!available, Ordering::SeqCst);
    }

    /// Snapshot of all rows, expired ones included
    pub async fn rows(&self) -> Vec<EditLock> {
        self.rows.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl LockStore for InMemoryLockStore {
    async fn select_by_project(&self, project_id: &str) -> Result<Option<EditLock>, StoreError> {
        check_available(&self.offline)?;
        Ok(self.rows.read().await.get(project_id).cloned())
    }

    async fn insert(&self, lock: EditLock) -> Result<EditLock, StoreError> {
        check_available(&self.offline)?;
        let mut rows = self.rows.write().await;
        if rows.contains_key(&lock.project_id) {
            return Err(StoreError::UniqueViolation {
                key: lock.project_id,
            });
        }
        rows.insert(lock.project_id.clone(), lock.clone());
        Ok(lock)
    }

    async fn update_expiry(
        &self,
        lock_id: &LockId,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        check_available(&self.offline)?;
        let mut rows = self.rows.write().await;
        match rows.values_mut().find(|lock| lock.id == *lock_id) {
            Some(lock) => {
                lock.expires_at = expires_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, lock_id: &LockId) -> Result<(), StoreError> {
        check_available(&self.offline)?;
        self.rows.write().await.retain(|_, lock| lock.id != *lock_id);
        Ok(())
    }

    async fn cleanup_expired(&self, now: DateTime<Utc>) -> Result<usize, StoreError> {
        check_available(&self.offline)?;
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|_, lock| !lock.is_expired(now));
        Ok(before - rows.len())
    }
}

// ============================================================================
// Project Store
// ============================================================================

/// Project table, kept in insertion order
#[derive(Debug, Default)]
pub struct InMemoryProjectStore {
    rows: RwLock<Vec<Project>>,
    offline: AtomicBool,
}

impl InMemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `Unavailable` (or stop doing so)
    pub fn set_available(&self, available: bool) {
        self.offline.store(!available, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProjectStore for InMemoryProjectStore {
    async fn list(&self) -> Result<Vec<Project>, StoreError> {
        check_available(&self.offline)?;
        Ok(self.rows.read().await.clone())
    }

    async fn get(&self, id: &str) -> Result<Option<Project>, StoreError> {
        check_available(&self.offline)?;
        Ok(self.rows.read().await.iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, mut project: Project) -> Result<Project, StoreError> {
        check_available(&self.offline)?;
        let mut rows = self.rows.write().await;
        if project.id.is_empty() {
            project.id = Uuid::new_v4().to_string();
        } else if rows.iter().any(|p| p.id == project.id) {
            return Err(StoreError::UniqueViolation { key: project.id });
        }
        rows.push(project.clone());
        Ok(project)
    }

    async fn update(&self, project: &Project) -> Result<(), StoreError> {
        check_available(&self.offline)?;
        let mut rows = self.rows.write().await;
        let row = rows
            .iter_mut()
            .find(|p| p.id == project.id)
            .ok_or_else(|| StoreError::NotFound(project.id.clone()))?;
        *row = project.clone();
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        check_available(&self.offline)?;
        self.rows.write().await.retain(|p| p.id != id);
        Ok(())
    }
}
