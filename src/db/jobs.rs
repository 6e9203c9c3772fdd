//! Database queries for jobs.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::entity::job::{self, ActiveModel, Entity as Job};
use crate::error::{AppError, AppResult};
use crate::models::{CreateJobRequest, QueryJobsParams, UpdateJobRequest};

use super::DbPool;

impl DbPool {
    /// Insert a new job owned by the given engineer.
    pub async fn insert_job(
        &self,
        id: Uuid,
        owner_id: &str,
        owner_name: &str,
        req: &CreateJobRequest,
    ) -> AppResult<job::Model> {
        let now = Utc::now();

        let model = ActiveModel {
            id: Set(id),
            kind: Set(req.kind.as_str().to_string()),
            owner_id: Set(owner_id.to_string()),
            owner_name: Set(owner_name.to_string()),
            machine: Set(req.machine.clone()),
            model: Set(req.model.clone()),
            part_number: Set(req.part_number.clone()),
            start_date: Set(req.start_date),
            deadline: Set(req.deadline),
            loan_date: Set(req.loan_date),
            target_percentage: Set(req.target_percentage),
            progress: Set(0),
            last_updated: Set(now),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert job: {}", e)))?;

        Ok(result)
    }

    /// Get a job by ID.
    pub async fn get_job_by_id(&self, id: Uuid) -> AppResult<Option<job::Model>> {
        let result = Job::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get job: {}", e)))?;

        Ok(result)
    }

    /// Get all jobs for one engineer, newest first.
    pub async fn list_jobs_by_owner(&self, owner_id: &str) -> AppResult<Vec<job::Model>> {
        let result = Job::find()
            .filter(job::Column::OwnerId.eq(owner_id))
            .order_by_desc(job::Column::CreatedAt)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list jobs for owner: {}", e)))?;

        Ok(result)
    }

    /// Get every job (fleet dashboard input).
    pub async fn list_all_jobs(&self) -> AppResult<Vec<job::Model>> {
        let result = Job::find()
            .order_by_desc(job::Column::CreatedAt)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list jobs: {}", e)))?;

        Ok(result)
    }

    /// Get the jobs with the given IDs (report assembly input).
    pub async fn list_jobs_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<job::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = Job::find()
            .filter(job::Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(job::Column::Id) // UUIDv7 is time-ordered
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list jobs by ids: {}", e)))?;

        Ok(result)
    }

    /// Query jobs with filtering and pagination.
    pub async fn query_jobs(&self, query: &QueryJobsParams) -> AppResult<(Vec<job::Model>, u64)> {
        let mut select = Job::find();

        if let Some(ref owner_id) = query.owner_id {
            select = select.filter(job::Column::OwnerId.eq(owner_id.as_str()));
        }

        if let Some(kind) = query.kind {
            select = select.filter(job::Column::Kind.eq(kind.as_str()));
        }

        // Count total before pagination
        let total = select
            .clone()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count jobs: {}", e)))?;

        let limit = query.limit.clamp(1, 100) as u64;
        let offset = query.offset.max(0) as u64;

        let jobs = select
            .order_by_desc(job::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to query jobs: {}", e)))?;

        Ok((jobs, total))
    }

    /// Patch the mutable job settings (deadline, loan date, target).
    pub async fn update_job_settings(
        &self,
        id: Uuid,
        patch: &UpdateJobRequest,
    ) -> AppResult<job::Model> {
        let job = self
            .get_job_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job {}", id)))?;

        let mut active: ActiveModel = job.into();
        if let Some(deadline) = patch.deadline {
            active.deadline = Set(deadline);
        }
        if let Some(loan_date) = patch.loan_date {
            active.loan_date = Set(Some(loan_date));
        }
        if let Some(target) = patch.target_percentage {
            active.target_percentage = Set(Some(target));
        }
        active.updated_at = Set(Utc::now());

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update job settings: {}", e)))?;

        Ok(result)
    }

    /// Persist the recomputed cached progress after a history change.
    pub async fn update_job_progress(
        &self,
        id: Uuid,
        progress: i32,
        last_updated: DateTime<Utc>,
    ) -> AppResult<job::Model> {
        let job = self
            .get_job_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job {}", id)))?;

        let mut active: ActiveModel = job.into();
        active.progress = Set(progress);
        active.last_updated = Set(last_updated);
        active.updated_at = Set(Utc::now());

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update job progress: {}", e)))?;

        Ok(result)
    }
}
