//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by the simulated wizard actions.
///
/// Every variant except `Rejected` and `Cancelled` is raised before any
/// simulated latency, so the stored progress is untouched.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ActionError {
    #[error("{0}")]
    InvalidInput(&'static str),
    #[error("invalid JSON in request body: {0}")]
    InvalidJson(String),
    #[error("{0}")]
    MissingPrerequisite(&'static str),
    #[error("{0}")]
    Rejected(&'static str),
    #[error("action cancelled")]
    Cancelled,
    #[error("failed to export configuration: {0}")]
    Export(String),
    #[error(transparent)]
    Core(#[from] onboard_core::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ActionError {
    /// True for failures the user can fix by editing input or completing an
    /// earlier step.
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            ActionError::InvalidInput(_)
                | ActionError::InvalidJson(_)
                | ActionError::MissingPrerequisite(_)
        )
    }
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
