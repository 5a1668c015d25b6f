//! Store traits for projects and lock rows
//!
//! Both stores are external collaborators (a hosted row store in
//! production). Implementations must enforce uniqueness of lock rows per
//! project id; the lock protocol relies on it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use portfolio_core::Project;
use thiserror::Error;

use crate::{EditLock, LockId};

/// Store-level failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Insert rejected by a unique constraint
    #[error("unique constraint violated for {key}")]
    UniqueViolation { key: String },

    #[error("not found: {0}")]
    NotFound(String),

    /// Network or backend failure
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// Project rows
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// All projects, in insertion order
    async fn list(&self) -> Result<Vec<Project>, StoreError>;

    /// One project by id
    async fn get(&self, id: &str) -> Result<Option<Project>, StoreError>;

    /// Insert a project; an empty id is assigned by the store
    async fn insert(&self, project: Project) -> Result<Project, StoreError>;

    /// Replace a project in one write
    async fn update(&self, project: &Project) -> Result<(), StoreError>;

    /// Delete a project by id
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// Lock rows, unique per project id
#[async_trait]
pub trait LockStore: Send + Sync {
    /// The lock row for a project, expired or not
    async fn select_by_project(&self, project_id: &str) -> Result<Option<EditLock>, StoreError>;

    /// Insert a lock row; fails with `UniqueViolation` if the project already has one
    async fn insert(&self, lock: EditLock) -> Result<EditLock, StoreError>;

    /// Move a lock's expiry; returns false if the row no longer exists
    async fn update_expiry(
        &self,
        lock_id: &LockId,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, StoreError>;

    /// Delete a lock row; deleting a missing row succeeds
    async fn delete(&self, lock_id: &LockId) -> Result<(), StoreError>;

    /// Delete every row expired at `now`; returns how many were removed
    async fn cleanup_expired(&self, now: DateTime<Utc>) -> Result<usize, StoreError>;
}
