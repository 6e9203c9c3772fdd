//! Job domain models and DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Job kind: which adjustment workflow a job follows.
///
/// Assembly jobs come in QC (percentage-improvement) and TEACH
/// (robot-calibration) variants; the hot-press line has its own QC and LASER
/// variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    /// QC assembly adjustment, tracked by obtained percentage vs target.
    QcAssembly,
    /// TEACH robot calibration, tracked by filled-field completeness.
    TeachAssembly,
    /// Hot-press QC adjustment, tracked by three sub-checks.
    QcHotpress,
    /// Hot-press laser adjustment, tracked by percentage + assembly test.
    LaserHotpress,
}

impl JobKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::QcAssembly => "qc_assembly",
            Self::TeachAssembly => "teach_assembly",
            Self::QcHotpress => "qc_hotpress",
            Self::LaserHotpress => "laser_hotpress",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "qc_assembly" => Some(Self::QcAssembly),
            "teach_assembly" => Some(Self::TeachAssembly),
            "qc_hotpress" => Some(Self::QcHotpress),
            "laser_hotpress" => Some(Self::LaserHotpress),
            _ => None,
        }
    }

    /// QC kinds carry a configurable target percentage.
    pub fn has_target(&self) -> bool {
        matches!(self, Self::QcAssembly | Self::QcHotpress)
    }
}

impl std::fmt::Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pass/fail classification of a job's latest entry.
///
/// Always derived on read from the latest history entry; never stored on the
/// job row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DerivedStatus {
    /// No entry yet, or the deciding field is absent/incomplete.
    Pending,
    /// Latest entry meets the kind's pass rule.
    Ok,
    /// Latest entry fails the kind's pass rule.
    Ng,
}

impl DerivedStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Ok => "ok",
            Self::Ng => "ng",
        }
    }
}

impl std::fmt::Display for DerivedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle state of a job, derived from its cached progress.
///
/// Transitions happen only on history append (forward) or history delete
/// (backward, possibly back to NoHistory). There is no cancel or archive
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// No history entries; progress is 0.
    NoHistory,
    /// 0 < progress < 100.
    InProgress,
    /// progress == 100.
    Complete,
}

impl JobState {
    pub fn from_progress(progress: i32, has_history: bool) -> Self {
        if !has_history {
            Self::NoHistory
        } else if progress >= 100 {
            Self::Complete
        } else {
            Self::InProgress
        }
    }
}

/// Request to create a new job. The owner is taken from the caller identity.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateJobRequest {
    pub kind: JobKind,
    pub machine: String,
    pub model: String,
    pub part_number: String,
    pub start_date: NaiveDate,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub loan_date: Option<NaiveDate>,
    /// Target percentage for QC kinds. Defaults to 97.0 at compute time.
    #[serde(default)]
    pub target_percentage: Option<f64>,
}

/// Patch for the mutable job settings.
///
/// Progress is deliberately absent: it is only ever written by the recompute
/// path on history append/delete.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateJobRequest {
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub loan_date: Option<NaiveDate>,
    #[serde(default)]
    pub target_percentage: Option<f64>,
}

/// Detailed job response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct JobDetailResponse {
    pub id: Uuid,
    pub kind: JobKind,
    pub owner_id: String,
    pub owner_name: String,
    pub machine: String,
    pub model: String,
    pub part_number: String,
    pub start_date: NaiveDate,
    pub deadline: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_percentage: Option<f64>,
    /// Cached progress, kept in sync with the latest history entry.
    pub progress: i32,
    /// Status recomputed from the latest entry on every read.
    pub status: DerivedStatus,
    pub state: JobState,
    pub last_updated: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Job summary for listings.
///
/// Carries the cached progress only; status is a view over the latest
/// history entry and is computed on the detail endpoint instead of forcing a
/// history read per listed row.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct JobSummaryResponse {
    pub id: Uuid,
    pub kind: JobKind,
    pub owner_id: String,
    pub owner_name: String,
    pub machine: String,
    pub model: String,
    pub part_number: String,
    pub start_date: NaiveDate,
    pub deadline: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_percentage: Option<f64>,
    pub progress: i32,
    pub last_updated: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Job list response with pagination.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct JobListResponse {
    pub jobs: Vec<JobSummaryResponse>,
    pub total: u64,
    pub limit: i32,
    pub offset: i32,
}

/// Query parameters for listing jobs.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct QueryJobsParams {
    /// Filter by owning engineer.
    #[serde(default)]
    pub owner_id: Option<String>,
    /// Filter by job kind.
    #[serde(default)]
    pub kind: Option<JobKind>,
    /// Maximum results to return.
    #[serde(default = "default_limit")]
    pub limit: i32,
    /// Offset for pagination.
    #[serde(default)]
    pub offset: i32,
}

fn default_limit() -> i32 {
    20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrip() {
        for kind in [
            JobKind::QcAssembly,
            JobKind::TeachAssembly,
            JobKind::QcHotpress,
            JobKind::LaserHotpress,
        ] {
            assert_eq!(JobKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(JobKind::parse("welding"), None);
    }

    #[test]
    fn test_state_from_progress() {
        assert_eq!(JobState::from_progress(0, false), JobState::NoHistory);
        assert_eq!(JobState::from_progress(0, true), JobState::InProgress);
        assert_eq!(JobState::from_progress(55, true), JobState::InProgress);
        assert_eq!(JobState::from_progress(100, true), JobState::Complete);
    }

    #[test]
    fn test_only_qc_kinds_have_targets() {
        assert!(JobKind::QcAssembly.has_target());
        assert!(JobKind::QcHotpress.has_target());
        assert!(!JobKind::TeachAssembly.has_target());
        assert!(!JobKind::LaserHotpress.has_target());
    }
}
