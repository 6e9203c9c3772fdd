//! History entry DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::services::analytics::VariationDelta;
use crate::services::progress::ProgressSummary;

/// Request to append a history entry to a job.
///
/// `fields` carries the full form state keyed by the job kind's field schema.
/// Unknown keys are dropped; absent input fields are stored as empty strings.
/// The author name is taken from the caller identity.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AppendEntryRequest {
    /// Kind-specific field map (field name -> number or string value).
    pub fields: JsonValue,
    /// Previous in-progress form state, used by hot-press QC so a single
    /// changed sub-check is evaluated together with the other two fields'
    /// last-known values.
    #[serde(default)]
    pub previous_fields: Option<JsonValue>,
}

/// One history entry as returned to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HistoryEntryResponse {
    pub id: Uuid,
    pub job_id: Uuid,
    pub author_name: String,
    pub fields: JsonValue,
    pub created_at: DateTime<Utc>,
    /// Percentage variation vs the previous entry (QC assembly only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variation: Option<VariationDelta>,
}

/// Response after appending an entry: the stored entry plus the job's
/// recomputed progress.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AppendEntryResponse {
    pub entry: HistoryEntryResponse,
    pub progress: ProgressSummary,
}

/// Response after deleting an entry: the job's recomputed progress.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeleteEntryResponse {
    pub job_id: Uuid,
    pub deleted_entry_id: Uuid,
    pub progress: ProgressSummary,
}

/// History listing, newest first.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HistoryListResponse {
    pub job_id: Uuid,
    pub entries: Vec<HistoryEntryResponse>,
    pub total: usize,
}
