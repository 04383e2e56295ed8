use std::sync::Arc;

use onboard_core::model::ProgressRecord;
use onboard_core::steps::{self, StepDescriptor};
use storage::repository::{ProgressRepository, StorageError};
use tracing::info;

/// Read-side access to wizard progress plus the global reset.
#[derive(Clone)]
pub struct ProgressService {
    progress: Arc<dyn ProgressRepository>,
}

impl ProgressService {
    #[must_use]
    pub fn new(progress: Arc<dyn ProgressRepository>) -> Self {
        Self { progress }
    }

    /// Load the stored record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the repository cannot be read.
    pub async fn load(&self) -> Result<ProgressRecord, StorageError> {
        self.progress.load_progress().await
    }

    /// Derived step descriptors in wizard order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the repository cannot be read.
    pub async fn steps(&self) -> Result<[StepDescriptor; 4], StorageError> {
        let record = self.load().await?;
        Ok(steps::derive_steps(&record))
    }

    /// First incomplete step, `None` once all four are done.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the repository cannot be read.
    pub async fn next_step(&self) -> Result<Option<StepDescriptor>, StorageError> {
        let record = self.load().await?;
        Ok(steps::next_step(&record))
    }

    /// Clear every flag, the keys, and the session id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the repository cannot be written.
    pub async fn reset(&self) -> Result<(), StorageError> {
        self.progress.clear_progress().await?;
        info!("progress reset");
        Ok(())
    }
}
