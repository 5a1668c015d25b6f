//! Editing sessions
//!
//! An `EditSession` is a held lock plus the background task that renews it.
//! The task belongs to the session: it is aborted on every exit path,
//! including drop, so no renewal outlives the session.
//!
//! Exit paths:
//! - `finish`: awaited release (navigation away, explicit stop)
//! - `on_hidden`: fire-and-forget release through the beacon
//! - drop without either: same as `on_hidden`
//!
//! The same user may open several sessions on one lock row (re-entrant
//! acquire). The row is released only when the last of them exits.

use chrono::{DateTime, NaiveDate, Utc};
use portfolio_core::{Project, ProjectId};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::LockError;
use crate::manager::{LockManager, ReleaseNotice};
use crate::store::ProjectStore;
use crate::{EditLock, LockId};

/// Outcome of opening a project for editing
pub enum EditAccess {
    /// The caller holds the lock
    Editable(EditSession),
    /// Someone else holds the lock; show the project read-only
    ReadOnly(ReadOnlyView),
}

impl std::fmt::Debug for EditAccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditAccess::Editable(session) => f.debug_tuple("Editable").field(session.lock()).finish(),
            EditAccess::ReadOnly(view) => f.debug_tuple("ReadOnly").field(view).finish(),
        }
    }
}

/// What a blocked user sees about the current holder
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadOnlyView {
    pub project_id: ProjectId,
    pub holder_id: String,
    pub holder_name: String,
    pub expires_at: DateTime<Utc>,
}

impl ReadOnlyView {
    /// Banner text for the read-only view
    pub fn banner(&self) -> String {
        format!(
            "Read only: {} is editing this project (lock expires at {})",
            self.holder_name,
            self.expires_at.format("%H:%M")
        )
    }
}

impl From<EditLock> for ReadOnlyView {
    fn from(lock: EditLock) -> Self {
        Self {
            project_id: lock.project_id,
            holder_id: lock.user_id,
            holder_name: lock.user_name,
            expires_at: lock.expires_at,
        }
    }
}

/// A held edit lock and its renewal task
pub struct EditSession {
    manager: LockManager,
    lock: EditLock,
    renewal: Option<JoinHandle<()>>,
    released: bool,
}

impl EditSession {
    /// Wrap a freshly acquired lock and start renewing it.
    ///
    /// Must be called inside a tokio runtime.
    pub(crate) fn start(manager: LockManager, lock: EditLock) -> Self {
        let renewal = spawn_renewal(manager.clone(), lock.id);
        Self {
            manager,
            lock,
            renewal: Some(renewal),
            released: false,
        }
    }

    /// The lock as acquired
    pub fn lock(&self) -> &EditLock {
        &self.lock
    }

    pub fn project_id(&self) -> &str {
        &self.lock.project_id
    }

    /// Write the edited project back in one update.
    ///
    /// Fails with `LockLost` if this session's lock has expired or been
    /// replaced. Stored planned percentages are refreshed for `as_of`; the
    /// caller's copy changes only once the write succeeds.
    pub async fn save(
        &self,
        projects: &dyn ProjectStore,
        project: &mut Project,
        as_of: NaiveDate,
    ) -> Result<(), LockError> {
        let lost = || LockError::LockLost {
            project_id: self.lock.project_id.clone(),
        };
        if project.id != self.lock.project_id {
            return Err(lost());
        }
        match self.manager.check_lock(&project.id).await? {
            Some(current) if current.id == self.lock.id => {}
            _ => return Err(lost()),
        }

        let mut refreshed = project.clone();
        refreshed.refresh_planned(as_of);
        projects.update(&refreshed).await?;
        *project = refreshed;
        tracing::info!(project_id = %project.id, "project saved");
        Ok(())
    }

    /// End the session with an awaited release
    pub async fn finish(mut self, notice: ReleaseNotice) -> bool {
        self.stop_renewal();
        self.released = true;
        if !self.manager.leave_session(self.lock.id) {
            return true;
        }
        self.manager.release_lock(&self.lock.id, notice).await
    }

    /// The editing surface was hidden or is unloading: release without waiting
    pub fn on_hidden(mut self) {
        self.stop_renewal();
        self.released = true;
        if self.manager.leave_session(self.lock.id) {
            self.manager.release_on_unload(self.lock.id);
        }
    }

    fn stop_renewal(&mut self) {
        if let Some(task) = self.renewal.take() {
            task.abort();
        }
    }
}

impl Drop for EditSession {
    fn drop(&mut self) {
        self.stop_renewal();
        if !self.released && self.manager.leave_session(self.lock.id) {
            self.manager.release_on_unload(self.lock.id);
        }
    }
}

fn spawn_renewal(manager: LockManager, lock_id: LockId) -> JoinHandle<()> {
    let period = manager.config().renew_interval();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        // The first tick completes immediately; the lock is fresh
        interval.tick().await;

        loop {
            interval.tick().await;
            manager.renew_lock(&lock_id).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn read_only_banner_names_holder() {
        let expires_at = Utc.with_ymd_and_hms(2026, 3, 2, 9, 40, 0).unwrap();
        let view = ReadOnlyView {
            project_id: "p-1".into(),
            holder_id: "u-ana".into(),
            holder_name: "Ana".into(),
            expires_at,
        };
        assert_eq!(
            view.banner(),
            "Read only: Ana is editing this project (lock expires at 09:40)"
        );
    }
}
