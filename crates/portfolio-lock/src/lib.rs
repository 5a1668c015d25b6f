//! # portfolio-lock
//!
//! Project stores and the collaborative edit lock protocol.
//!
//! At most one user edits a project at a time. The lock lives in a shared
//! row store whose unique constraint on the project id is the only
//! concurrency control; locks expire after a TTL unless renewed, which is
//! what recovers abandoned editing sessions.
//!
//! This crate provides:
//! - Store traits: `ProjectStore`, `LockStore`, with in-memory implementations
//! - `LockManager`: check / acquire / renew / release
//! - `EditSession`: a held lock plus its renewal task and release paths
//! - Seams for the surroundings: `Clock`, `Notifier`, `ReleaseBeacon`
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use portfolio_lock::{EditAccess, InMemoryLockStore, LockManager, UserContext};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), portfolio_lock::LockError> {
//! let manager = LockManager::new(Arc::new(InMemoryLockStore::new()));
//! let ana = UserContext::new("u-ana", "Ana");
//! let bo = UserContext::new("u-bo", "Bo");
//!
//! let EditAccess::Editable(session) = manager.begin_edit("p-1", &ana).await? else {
//!     unreachable!("nobody else holds the lock");
//! };
//! match manager.begin_edit("p-1", &bo).await? {
//!     EditAccess::ReadOnly(view) => assert_eq!(view.holder_name, "Ana"),
//!     EditAccess::Editable(_) => unreachable!("Ana holds the lock"),
//! }
//! session.finish(portfolio_lock::ReleaseNotice::Silent).await;
//! # Ok(())
//! # }
//! ```

pub mod beacon;
pub mod clock;
pub mod config;
pub mod error;
pub mod manager;
pub mod memory;
pub mod notify;
pub mod session;
pub mod store;

use chrono::{DateTime, Utc};
use portfolio_core::{ProjectId, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use beacon::{ReleaseBeacon, StoreReleaseBeacon};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, LockConfig};
pub use error::LockError;
pub use manager::{LockManager, ReleaseNotice};
pub use memory::{InMemoryLockStore, InMemoryProjectStore};
pub use notify::{Notice, NoticeLevel, Notifier, RecordingNotifier, TracingNotifier};
pub use session::{EditAccess, EditSession, ReadOnlyView};
pub use store::{LockStore, ProjectStore, StoreError};

// ============================================================================
// Lock Types
// ============================================================================

/// Identifier of a lock row
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LockId(Uuid);

impl LockId {
    /// Fresh random id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LockId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The acting user, supplied by the surrounding application
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    pub user_id: UserId,
    pub display_name: String,
}

impl UserContext {
    pub fn new(user_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
        }
    }
}

/// A row in the lock table. At most one exists per project.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditLock {
    pub id: LockId,
    pub project_id: ProjectId,
    pub user_id: UserId,
    pub user_name: String,
    pub locked_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl EditLock {
    /// New lock for `user` on `project_id`, expiring `ttl` after `now`
    pub fn new(
        project_id: impl Into<String>,
        user: &UserContext,
        now: DateTime<Utc>,
        ttl: chrono::Duration,
    ) -> Self {
        Self {
            id: LockId::new(),
            project_id: project_id.into(),
            user_id: user.user_id.clone(),
            user_name: user.display_name.clone(),
            locked_at: now,
            expires_at: now + ttl,
        }
    }

    /// Whether the lock has lapsed at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Whether `user_id` holds this lock
    pub fn is_held_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}
