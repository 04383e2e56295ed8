use chrono::Utc;
use onboard_core::model::ProgressRecord;
use sqlx::Row;

use super::SqliteRepository;
use crate::flags::{self, FlagMap};
use crate::repository::{ProgressRepository, StorageError, encode_flags};

fn conn_err(err: sqlx::Error) -> StorageError {
    StorageError::Connection(err.to_string())
}

impl SqliteRepository {
    /// Raw key/value view of the stored flags.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the query fails.
    pub async fn load_flags(&self) -> Result<FlagMap, StorageError> {
        let rows = sqlx::query("SELECT key, value FROM progress_flags")
            .fetch_all(&self.pool)
            .await
            .map_err(conn_err)?;

        let mut map = FlagMap::new();
        for row in rows {
            let key: String = row.try_get("key").map_err(conn_err)?;
            let value: String = row.try_get("value").map_err(conn_err)?;
            map.insert(key, value);
        }
        Ok(map)
    }
}

#[async_trait::async_trait]
impl ProgressRepository for SqliteRepository {
    async fn load_progress(&self) -> Result<ProgressRecord, StorageError> {
        let map = self.load_flags().await?;
        Ok(flags::decode(&map))
    }

    async fn save_progress(&self, record: &ProgressRecord) -> Result<(), StorageError> {
        let encoded = encode_flags(record)?;
        let now = Utc::now();

        let mut tx = self.pool.begin().await.map_err(conn_err)?;
        sqlx::query("DELETE FROM progress_flags")
            .execute(&mut *tx)
            .await
            .map_err(conn_err)?;
        for (key, value) in &encoded {
            sqlx::query(
                r"
                INSERT INTO progress_flags (key, value, updated_at)
                VALUES (?1, ?2, ?3)
                ",
            )
            .bind(key)
            .bind(value)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(conn_err)?;
        }
        tx.commit().await.map_err(conn_err)?;
        Ok(())
    }

    async fn clear_progress(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM progress_flags")
            .execute(&self.pool)
            .await
            .map_err(conn_err)?;
        Ok(())
    }
}
