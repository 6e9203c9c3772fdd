//! Migration: Create jobs table.
//!
//! One row per tracked assembly/adjustment job. Progress is a cache of the
//! progress calculator's output over the latest history entry; status is
//! never stored.

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
                CREATE OR REPLACE FUNCTION update_updated_at_column()
                RETURNS TRIGGER AS $$
                BEGIN
                    NEW.updated_at = NOW();
                    RETURN NEW;
                END;
                $$ LANGUAGE plpgsql;

                CREATE TABLE jobs (
                    id UUID PRIMARY KEY, -- UUIDv7 for time-ordered sorting

                    kind VARCHAR(20) NOT NULL
                        CHECK (kind IN ('qc_assembly', 'teach_assembly', 'qc_hotpress', 'laser_hotpress')),

                    -- Owner identity from the external identity provider
                    owner_id VARCHAR(120) NOT NULL,
                    owner_name VARCHAR(200) NOT NULL,

                    machine VARCHAR(200) NOT NULL,
                    model VARCHAR(200) NOT NULL,
                    part_number VARCHAR(200) NOT NULL,

                    -- Date-only scheduling fields; time-of-day is never used
                    start_date DATE NOT NULL,
                    deadline DATE NOT NULL,
                    loan_date DATE,

                    -- QC kinds only; NULL falls back to the 97.0 default
                    target_percentage DOUBLE PRECISION,

                    -- Cached progress, rewritten on history append/delete
                    progress INTEGER NOT NULL DEFAULT 0
                        CHECK (progress >= 0 AND progress <= 100),

                    last_updated TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                -- Index for per-engineer dashboard queries
                CREATE INDEX idx_jobs_owner_id ON jobs(owner_id);

                -- Index for kind filters
                CREATE INDEX idx_jobs_kind ON jobs(kind);

                -- Trigger to update updated_at
                CREATE TRIGGER update_jobs_updated_at
                    BEFORE UPDATE ON jobs
                    FOR EACH ROW
                    EXECUTE FUNCTION update_updated_at_column();
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
                DROP TRIGGER IF EXISTS update_jobs_updated_at ON jobs;
                DROP TABLE IF EXISTS jobs CASCADE;
                DROP FUNCTION IF EXISTS update_updated_at_column();
                "#,
            )
            .await?;

        Ok(())
    }
}
