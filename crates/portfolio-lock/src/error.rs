//! Lock protocol errors

use portfolio_core::ProjectId;
use thiserror::Error;

use crate::store::StoreError;
use crate::EditLock;

/// Failure of a lock operation
#[derive(Debug, Error)]
pub enum LockError {
    /// Another user holds a live lock; carries the holder's row
    #[error("Project {} is being edited by {} until {}", .0.project_id, .0.user_name, .0.expires_at)]
    AlreadyLocked(Box<EditLock>),

    /// Lost the insert race but the winning lock was gone before it could be read
    #[error("Lock on project {project_id} was taken concurrently")]
    Contended { project_id: ProjectId },

    /// The session's lock expired or was taken over
    #[error("Edit lock on project {project_id} is no longer held")]
    LockLost { project_id: ProjectId },

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<StoreError> for LockError {
    fn from(err: StoreError) -> Self {
        LockError::StoreUnavailable(err.to_string())
    }
}
