//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, auth, error, models, services};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Assembly Adjustment Tracker",
        version = "0.3.0",
        description = "API server for tracking assembly adjustment jobs (QC, TEACH, hot-press) with append-only history, derived progress, and engineer dashboards"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Job endpoints
        api::jobs::create_job,
        api::jobs::list_jobs,
        api::jobs::get_job,
        api::jobs::update_job,
        // History endpoints
        api::history::append_entry,
        api::history::list_history,
        api::history::delete_entry,
        api::history::get_trend,
        // Dashboard endpoints
        api::dashboard::get_dashboard,
        api::dashboard::get_engineer_stats,
        // Field schema endpoint
        api::fields::get_fields,
        // Report endpoint
        api::reports::assemble_report,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            auth::UserRole,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Jobs
            models::job::JobKind,
            models::job::DerivedStatus,
            models::job::JobState,
            models::job::CreateJobRequest,
            models::job::UpdateJobRequest,
            models::job::JobSummaryResponse,
            models::job::JobDetailResponse,
            models::job::JobListResponse,
            models::job::QueryJobsParams,
            // History
            models::history::AppendEntryRequest,
            models::history::HistoryEntryResponse,
            models::history::AppendEntryResponse,
            models::history::DeleteEntryResponse,
            models::history::HistoryListResponse,
            services::progress::ProgressSummary,
            services::analytics::QcTrend,
            services::analytics::JigTrend,
            services::analytics::DestructiveTestSummary,
            services::analytics::TeachTrend,
            services::analytics::VariationDelta,
            api::history::TrendResponse,
            // Dashboard
            models::dashboard::EngineerStats,
            models::dashboard::FleetStats,
            models::dashboard::DashboardResponse,
            // Fields
            models::field_schema::FieldType,
            models::field_schema::FieldSpec,
            api::fields::FieldSchemaResponse,
            // Reports
            api::reports::AssembleReportRequest,
            services::report::JobReportSection,
            services::report::ReportDocument,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Jobs", description = "Job creation and settings"),
        (name = "History", description = "Append-only history and trend statistics"),
        (name = "Dashboard", description = "Engineer and fleet roll-ups"),
        (name = "Fields", description = "Per-kind field schema lookup"),
        (name = "Reports", description = "Printable report assembly")
    )
)]
pub struct ApiDoc;
