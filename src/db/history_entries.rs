//! Database queries for history entries.
//!
//! Entries are append-only: there is no update method, only insert and
//! whole-row delete.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::entity::history_entry::{self, ActiveModel, Entity as HistoryEntry};
use crate::error::{AppError, AppResult};

use super::DbPool;

impl DbPool {
    /// Append an entry to a job's history.
    ///
    /// The creation timestamp is server-assigned and clamped to be
    /// non-decreasing within the job, so display and trend order can rely on
    /// `(created_at, id)` alone.
    pub async fn insert_entry(
        &self,
        job_id: Uuid,
        author_name: &str,
        fields: JsonValue,
    ) -> AppResult<history_entry::Model> {
        let mut created_at = Utc::now();
        if let Some(latest) = self.latest_entry(job_id).await?
            && latest.created_at > created_at
        {
            created_at = latest.created_at;
        }

        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            job_id: Set(job_id),
            author_name: Set(author_name.to_string()),
            fields: Set(fields),
            created_at: Set(created_at),
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert history entry: {}", e)))?;

        Ok(result)
    }

    /// All entries for a job, newest first (display order).
    pub async fn list_entries(&self, job_id: Uuid) -> AppResult<Vec<history_entry::Model>> {
        let result = HistoryEntry::find()
            .filter(history_entry::Column::JobId.eq(job_id))
            .order_by_desc(history_entry::Column::CreatedAt)
            .order_by_desc(history_entry::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list history entries: {}", e)))?;

        Ok(result)
    }

    /// The most recent entry for a job, if any.
    pub async fn latest_entry(&self, job_id: Uuid) -> AppResult<Option<history_entry::Model>> {
        let result = HistoryEntry::find()
            .filter(history_entry::Column::JobId.eq(job_id))
            .order_by_desc(history_entry::Column::CreatedAt)
            .order_by_desc(history_entry::Column::Id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get latest entry: {}", e)))?;

        Ok(result)
    }

    /// Get one entry scoped to its job.
    pub async fn get_entry(
        &self,
        job_id: Uuid,
        entry_id: Uuid,
    ) -> AppResult<Option<history_entry::Model>> {
        let result = HistoryEntry::find_by_id(entry_id)
            .filter(history_entry::Column::JobId.eq(job_id))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get history entry: {}", e)))?;

        Ok(result)
    }

    /// Delete one entry. Returns false when the entry did not exist.
    pub async fn delete_entry(&self, job_id: Uuid, entry_id: Uuid) -> AppResult<bool> {
        let result = HistoryEntry::delete_many()
            .filter(history_entry::Column::Id.eq(entry_id))
            .filter(history_entry::Column::JobId.eq(job_id))
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete history entry: {}", e)))?;

        Ok(result.rows_affected > 0)
    }
}
