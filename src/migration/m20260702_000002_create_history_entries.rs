//! Migration: Create history_entries table.
//!
//! Append-only log of form snapshots per job. Rows are never updated; the
//! only mutations are insert and whole-row delete.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE history_entries (
                    id UUID PRIMARY KEY, -- UUIDv7 for time-ordered sorting
                    job_id UUID NOT NULL REFERENCES jobs(id) ON DELETE CASCADE,

                    author_name VARCHAR(200) NOT NULL,

                    -- Kind-specific field map (field name -> value), normalized
                    -- against the field schema at append time
                    fields JSONB NOT NULL DEFAULT '{}'::jsonb,

                    -- Server-assigned, monotonically non-decreasing per job
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                -- Index for history listing (newest first)
                CREATE INDEX idx_history_entries_job_created
                    ON history_entries(job_id, created_at DESC, id DESC);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DROP TABLE IF EXISTS history_entries CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
