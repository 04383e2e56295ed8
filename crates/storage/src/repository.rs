use async_trait::async_trait;
use onboard_core::model::ProgressRecord;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::flags::{self, FlagMap};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Typed access to the persisted wizard progress.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Load the current record; an empty store yields an empty record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn load_progress(&self) -> Result<ProgressRecord, StorageError>;

    /// Replace the stored record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn save_progress(&self, record: &ProgressRecord) -> Result<(), StorageError>;

    /// Remove every stored flag.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn clear_progress(&self) -> Result<(), StorageError>;
}

pub(crate) fn encode_flags(record: &ProgressRecord) -> Result<FlagMap, StorageError> {
    flags::encode(record).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    flags: Arc<Mutex<FlagMap>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            flags: Arc::new(Mutex::new(FlagMap::new())),
        }
    }

    /// Snapshot of the raw flags, for assertions and diagnostics.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn raw_flags(&self) -> Result<FlagMap, StorageError> {
        let guard = self
            .flags
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    /// Write a single raw flag, bypassing the typed record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn put_raw_flag(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .flags
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn load_progress(&self) -> Result<ProgressRecord, StorageError> {
        let guard = self
            .flags
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(flags::decode(&guard))
    }

    async fn save_progress(&self, record: &ProgressRecord) -> Result<(), StorageError> {
        let encoded = encode_flags(record)?;
        let mut guard = self
            .flags
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = encoded;
        Ok(())
    }

    async fn clear_progress(&self) -> Result<(), StorageError> {
        let mut guard = self
            .flags
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.clear();
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let progress: Arc<dyn ProgressRepository> = Arc::new(InMemoryRepository::new());
        Self { progress }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use onboard_core::model::{SessionId, SubscriberId};

    #[tokio::test]
    async fn empty_store_loads_empty_record() {
        let repo = InMemoryRepository::new();
        let record = repo.load_progress().await.unwrap();
        assert!(record.is_empty());
    }

    #[tokio::test]
    async fn save_then_load_returns_same_record() {
        let repo = InMemoryRepository::new();
        let mut record = ProgressRecord::new();
        record.mark_whitelisted(
            SubscriberId::new("buyer-app.ondc.org").unwrap(),
            SessionId::new(1_700_000_000_000, "k2j4h6g8f").unwrap(),
        );
        record.set_subscription_completed(true);
        repo.save_progress(&record).await.unwrap();

        let loaded = repo.load_progress().await.unwrap();
        assert_eq!(loaded, record);
        let raw = repo.raw_flags().unwrap();
        assert_eq!(raw.get(flags::SUBSCRIPTION_COMPLETED).map(String::as_str), Some("true"));
    }

    #[tokio::test]
    async fn raw_flag_written_out_of_order_is_visible() {
        let repo = InMemoryRepository::new();
        repo.put_raw_flag(flags::DEPLOYMENT_COMPLETED, "true").unwrap();
        let record = repo.load_progress().await.unwrap();
        assert!(record.deployment_completed());
        assert!(!record.has_keys());
    }

    #[tokio::test]
    async fn clear_removes_everything() {
        let repo = InMemoryRepository::new();
        repo.put_raw_flag(flags::WHITELIST_VERIFIED, "true").unwrap();
        repo.clear_progress().await.unwrap();
        assert!(repo.raw_flags().unwrap().is_empty());
    }
}
