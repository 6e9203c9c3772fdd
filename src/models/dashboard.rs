//! Dashboard roll-up models.
//!
//! `JobSnapshot` is the read-model input for the aggregator: a plain-data
//! projection of a job row. Roll-ups are recomputed in full on every
//! dashboard load and never persisted.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::entity::job;

/// Minimal projection of a job used by the roll-up aggregator.
///
/// Deliberately excludes history: risk buckets and rates are derived from the
/// cached progress, deadline, and last-updated timestamp only.
#[derive(Debug, Clone)]
pub struct JobSnapshot {
    pub owner_id: String,
    pub owner_name: String,
    pub progress: i32,
    pub deadline: NaiveDate,
    pub last_updated: DateTime<Utc>,
}

impl From<&job::Model> for JobSnapshot {
    fn from(model: &job::Model) -> Self {
        JobSnapshot {
            owner_id: model.owner_id.clone(),
            owner_name: model.owner_name.clone(),
            progress: model.progress,
            deadline: model.deadline,
            last_updated: model.last_updated,
        }
    }
}

/// Per-engineer KPIs, recomputed on load.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct EngineerStats {
    pub engineer_id: String,
    pub engineer_name: String,
    pub total_jobs: usize,
    /// Jobs with progress < 100.
    pub active_jobs: usize,
    /// Jobs with progress == 100.
    pub completed_jobs: usize,
    /// Mean progress over active jobs, rounded; 0 when none are active.
    pub average_progress: i32,
    /// Active jobs due within the next 7 calendar days (inclusive).
    pub at_risk_count: usize,
    /// Active jobs already past their deadline.
    pub overdue_count: usize,
    /// round(100 * completed / total); 0 when there are no jobs.
    pub completion_rate: i32,
    /// Completed jobs whose last update falls in the trailing 7 days.
    pub completed_this_week: usize,
    /// Mean days-to-deadline over active jobs, rounded; negative when the
    /// overdue jobs dominate. 0 when none are active.
    pub avg_days_to_deadline: i64,
}

/// Fleet-wide KPIs.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FleetStats {
    pub total_jobs: usize,
    pub active_count: usize,
    /// Jobs completed (progress 100) with last update in the trailing 7 days.
    pub completed_last_7_days: usize,
    /// Mean progress over all active jobs, rounded; 0 when none are active.
    pub average_progress: i32,
}

/// Supervisor dashboard payload: fleet totals plus engineers ordered by
/// descending active-job count (ties broken by ascending engineer id).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub generated_at: DateTime<Utc>,
    pub fleet: FleetStats,
    pub engineers: Vec<EngineerStats>,
}
