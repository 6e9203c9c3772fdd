//! Domain models for the Assembly Adjustment Tracker.

pub mod dashboard;
pub mod field_schema;
pub mod history;
pub mod job;
pub mod ws_event;

// Re-export commonly used types
pub use dashboard::{DashboardResponse, EngineerStats, FleetStats, JobSnapshot};
pub use field_schema::{FieldSpec, FieldType, HOTPRESS_CHECKS, fields_for, input_field_count};
pub use history::{
    AppendEntryRequest, AppendEntryResponse, DeleteEntryResponse, HistoryEntryResponse,
    HistoryListResponse,
};
pub use job::{
    CreateJobRequest, DerivedStatus, JobDetailResponse, JobKind, JobListResponse, JobState,
    JobSummaryResponse, QueryJobsParams, UpdateJobRequest,
};
pub use ws_event::{WsEvent, WsEventMessage};
