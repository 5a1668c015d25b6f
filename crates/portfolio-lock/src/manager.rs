//! Edit lock manager
//!
//! Per project: `Unlocked -> Locked(user) -> Unlocked`.
//!
//! # Protocol
//!
//! - `check_lock`: sweep expired rows, then read the live holder
//! - `acquire_lock`: idempotent for the holder, `AlreadyLocked` for anyone
//!   else, otherwise insert. A unique-constraint violation on insert means a
//!   concurrent acquirer won; it is read back once and reported. The one
//!   retry is for an expired row a failed sweep left behind: it is deleted
//!   by id and the insert tried again.
//! - `renew_lock`: push expiry forward by the TTL; failures are logged only
//! - `release_lock`: delete the row; deleting a missing row succeeds
//! - `release_on_unload`: hand the release to the `ReleaseBeacon` and return

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use portfolio_core::ProjectId;

use crate::beacon::{ReleaseBeacon, StoreReleaseBeacon};
use crate::clock::{Clock, SystemClock};
use crate::config::LockConfig;
use crate::error::LockError;
use crate::notify::{Notice, Notifier, TracingNotifier};
use crate::session::{EditAccess, EditSession, ReadOnlyView};
use crate::store::{LockStore, StoreError};
use crate::{EditLock, LockId, UserContext};

/// Whether a release should produce a user-facing notice
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReleaseNotice {
    /// The user asked to stop editing
    Announce,
    /// Automatic or background release
    Silent,
}

/// Coordinates edit locks over a shared `LockStore`
#[derive(Clone)]
pub struct LockManager {
    store: Arc<dyn LockStore>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
    beacon: Arc<dyn ReleaseBeacon>,
    config: LockConfig,
    /// Live editing sessions per lock row, shared by clones
    sessions: Arc<Mutex<HashMap<LockId, usize>>>,
}

impl LockManager {
    /// Manager with the system clock, tracing notices, a store-backed
    /// release beacon and default timing
    pub fn new(store: Arc<dyn LockStore>) -> Self {
        Self {
            beacon: Arc::new(StoreReleaseBeacon::new(Arc::clone(&store))),
            store,
            clock: Arc::new(SystemClock),
            notifier: Arc::new(TracingNotifier),
            config: LockConfig::default(),
            sessions: Arc::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_beacon(mut self, beacon: Arc<dyn ReleaseBeacon>) -> Self {
        self.beacon = beacon;
        self
    }

    pub fn with_config(mut self, config: LockConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &LockConfig {
        &self.config
    }

    /// Current live lock on `project_id`, if any.
    ///
    /// Sweeps expired rows across all projects first. A failed sweep is
    /// logged and does not fail the check; an expired row that survived it
    /// is still treated as absent.
    pub async fn check_lock(&self, project_id: &str) -> Result<Option<EditLock>, LockError> {
        let now = self.clock.now();
        match self.store.cleanup_expired(now).await {
            Ok(0) => {}
            Ok(swept) => tracing::debug!(swept, "removed expired edit locks"),
            Err(err) => tracing::warn!(%err, "expired lock sweep failed"),
        }

        let lock = self.store.select_by_project(project_id).await?;
        Ok(lock.filter(|lock| !lock.is_expired(now)))
    }

    /// Take the edit lock on `project_id` for `user`
    pub async fn acquire_lock(
        &self,
        project_id: &str,
        user: &UserContext,
    ) -> Result<EditLock, LockError> {
        let result = self.try_acquire(project_id, user).await;
        match &result {
            Ok(lock) => self.notifier.notify(Notice::success(format!(
                "You are editing this project; lock held until {}",
                lock.expires_at.format("%H:%M")
            ))),
            Err(LockError::AlreadyLocked(holder)) => self.notifier.notify(Notice::error(format!(
                "This project is being edited by {} until {}",
                holder.user_name,
                holder.expires_at.format("%H:%M")
            ))),
            Err(err) => self
                .notifier
                .notify(Notice::error(format!("Could not lock the project for editing: {err}"))),
        }
        result
    }

    async fn try_acquire(&self, project_id: &str, user: &UserContext) -> Result<EditLock, LockError> {
        if let Some(existing) = self.check_lock(project_id).await? {
            if existing.is_held_by(&user.user_id) {
                tracing::debug!(project_id, user = %user.user_id, "lock already held by caller");
                return Ok(existing);
            }
            return Err(LockError::AlreadyLocked(Box::new(existing)));
        }

        match self.insert_lock(project_id, user).await {
            Err(LockError::Contended { .. }) => {}
            other => return other,
        }

        tracing::debug!(project_id, "lost lock insert race");
        if let Some(winner) = self.check_lock(project_id).await? {
            if winner.is_held_by(&user.user_id) {
                return Ok(winner);
            }
            return Err(LockError::AlreadyLocked(Box::new(winner)));
        }

        // No live holder, so the conflicting row is stale or already gone
        let now = self.clock.now();
        match self.store.select_by_project(project_id).await? {
            Some(stale) if stale.is_expired(now) => {
                tracing::info!(project_id, lock_id = %stale.id, "clearing expired edit lock");
                self.store.delete(&stale.id).await?;
                self.insert_lock(project_id, user).await
            }
            Some(live) if live.is_held_by(&user.user_id) => Ok(live),
            Some(live) => Err(LockError::AlreadyLocked(Box::new(live))),
            None => Err(LockError::Contended {
                project_id: ProjectId::from(project_id),
            }),
        }
    }

    /// Insert a fresh row; a unique violation comes back as `Contended`
    async fn insert_lock(&self, project_id: &str, user: &UserContext) -> Result<EditLock, LockError> {
        let candidate = EditLock::new(project_id, user, self.clock.now(), self.config.ttl());
        match self.store.insert(candidate).await {
            Ok(lock) => {
                tracing::info!(project_id, user = %user.user_id, lock_id = %lock.id, "edit lock acquired");
                Ok(lock)
            }
            Err(StoreError::UniqueViolation { .. }) => Err(LockError::Contended {
                project_id: ProjectId::from(project_id),
            }),
            Err(err) => Err(err.into()),
        }
    }

    /// Extend a held lock by the TTL from now.
    ///
    /// Never surfaces an error; returns whether the lock was extended.
    pub async fn renew_lock(&self, lock_id: &LockId) -> bool {
        let expires_at = self.clock.now() + self.config.ttl();
        match self.store.update_expiry(lock_id, expires_at).await {
            Ok(true) => {
                tracing::debug!(%lock_id, %expires_at, "edit lock renewed");
                true
            }
            Ok(false) => {
                tracing::warn!(%lock_id, "edit lock vanished before renewal");
                false
            }
            Err(err) => {
                tracing::warn!(%lock_id, %err, "edit lock renewal failed");
                false
            }
        }
    }

    /// Delete a lock row. Releasing a lock that is already gone succeeds.
    pub async fn release_lock(&self, lock_id: &LockId, notice: ReleaseNotice) -> bool {
        let released = match self.store.delete(lock_id).await {
            Ok(()) => {
                tracing::info!(%lock_id, "edit lock released");
                true
            }
            Err(err) => {
                tracing::warn!(%lock_id, %err, "edit lock release failed");
                false
            }
        };

        if notice == ReleaseNotice::Announce {
            self.notifier.notify(if released {
                Notice::info("Editing finished; the project is unlocked")
            } else {
                Notice::error("Could not release the edit lock")
            });
        }
        released
    }

    /// Best-effort release for a surface that is going away; returns immediately
    pub fn release_on_unload(&self, lock_id: LockId) {
        tracing::debug!(%lock_id, "dispatching release beacon");
        self.beacon.dispatch(lock_id);
    }

    /// Open a project for editing.
    ///
    /// Returns an editing session when the lock is obtained, or a read-only
    /// view naming the current holder when someone else has it.
    pub async fn begin_edit(
        &self,
        project_id: &str,
        user: &UserContext,
    ) -> Result<EditAccess, LockError> {
        match self.acquire_lock(project_id, user).await {
            Ok(lock) => {
                self.enter_session(lock.id);
                Ok(EditAccess::Editable(EditSession::start(self.clone(), lock)))
            }
            Err(LockError::AlreadyLocked(holder)) => {
                Ok(EditAccess::ReadOnly(ReadOnlyView::from(*holder)))
            }
            Err(err) => Err(err),
        }
    }

    /// Register a session on `lock_id`; the holder may have several open
    fn enter_session(&self, lock_id: LockId) {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        *sessions.entry(lock_id).or_insert(0) += 1;
    }

    /// Unregister a session; returns true when it was the last one on the row
    pub(crate) fn leave_session(&self, lock_id: LockId) -> bool {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        match sessions.get_mut(&lock_id) {
            Some(count) if *count > 1 => {
                *count -= 1;
                tracing::debug!(%lock_id, remaining = *count, "edit session closed; lock still in use");
                false
            }
            _ => {
                sessions.remove(&lock_id);
                true
            }
        }
    }
}
