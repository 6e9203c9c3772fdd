//! Job API handlers.

use actix_web::{HttpResponse, web};
use serde_json::Value as JsonValue;
use tracing::info;
use uuid::Uuid;

use crate::auth::{AuthenticatedUser, UserRole};
use crate::db::DbPool;
use crate::entity::job;
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateJobRequest, JobDetailResponse, JobKind, JobListResponse, JobState, JobSummaryResponse,
    QueryJobsParams, UpdateJobRequest, WsEvent, WsEventMessage,
};
use crate::services::EventBroadcaster;
use crate::services::progress;

/// Parse the stored kind column; a row that fails this check violates the
/// schema constraint and is treated as store corruption.
pub(crate) fn job_kind(model: &job::Model) -> AppResult<JobKind> {
    JobKind::parse(&model.kind)
        .ok_or_else(|| AppError::Database(format!("Unknown job kind in store: {}", model.kind)))
}

pub(crate) fn to_summary(model: &job::Model) -> AppResult<JobSummaryResponse> {
    Ok(JobSummaryResponse {
        id: model.id,
        kind: job_kind(model)?,
        owner_id: model.owner_id.clone(),
        owner_name: model.owner_name.clone(),
        machine: model.machine.clone(),
        model: model.model.clone(),
        part_number: model.part_number.clone(),
        start_date: model.start_date,
        deadline: model.deadline,
        loan_date: model.loan_date,
        target_percentage: model.target_percentage,
        progress: model.progress,
        last_updated: model.last_updated,
        created_at: model.created_at,
    })
}

/// Build the detail view: status and state are recomputed from the latest
/// entry on every read, never trusted from storage.
pub(crate) fn to_detail(
    model: &job::Model,
    latest_fields: Option<&JsonValue>,
) -> AppResult<JobDetailResponse> {
    let kind = job_kind(model)?;
    let summary = progress::compute_job_progress(kind, latest_fields, model.target_percentage);

    Ok(JobDetailResponse {
        id: model.id,
        kind,
        owner_id: model.owner_id.clone(),
        owner_name: model.owner_name.clone(),
        machine: model.machine.clone(),
        model: model.model.clone(),
        part_number: model.part_number.clone(),
        start_date: model.start_date,
        deadline: model.deadline,
        loan_date: model.loan_date,
        target_percentage: model.target_percentage,
        progress: model.progress,
        status: summary.status,
        state: JobState::from_progress(model.progress, latest_fields.is_some()),
        last_updated: model.last_updated,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

fn validate_create(req: &CreateJobRequest) -> AppResult<()> {
    if req.deadline < req.start_date {
        return Err(AppError::InvalidInput(
            "deadline must not be before start_date".to_string(),
        ));
    }
    if req.target_percentage.is_some() && !req.kind.has_target() {
        return Err(AppError::InvalidInput(format!(
            "target_percentage is not applicable to {} jobs",
            req.kind
        )));
    }
    Ok(())
}

/// Create a new adjustment job owned by the calling engineer.
#[utoipa::path(
    post,
    path = "/api/v1/jobs",
    tag = "Jobs",
    request_body = CreateJobRequest,
    responses(
        (status = 201, description = "Job created", body = JobDetailResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    )
)]
pub async fn create_job(
    auth: AuthenticatedUser,
    pool: web::Data<DbPool>,
    broadcaster: web::Data<EventBroadcaster>,
    body: web::Json<CreateJobRequest>,
) -> AppResult<HttpResponse> {
    if auth.identity.role != UserRole::Engineer {
        return Err(AppError::Unauthorized(
            "Only engineers can create jobs".to_string(),
        ));
    }

    let req = body.into_inner();
    validate_create(&req)?;

    // UUIDv7 keeps job listings time-ordered
    let job_id = Uuid::now_v7();
    let model = pool
        .insert_job(
            job_id,
            &auth.identity.user_id,
            &auth.identity.display_name,
            &req,
        )
        .await?;

    info!(
        "Job created: id={}, kind={}, owner={}",
        job_id, req.kind, auth.identity.user_id
    );

    let event = WsEventMessage::new(WsEvent::job_created(
        job_id,
        req.kind,
        auth.identity.user_id.clone(),
    ));
    broadcaster.send(event);

    let response = to_detail(&model, None)?;
    Ok(HttpResponse::Created().json(response))
}

/// List jobs with filtering and pagination.
#[utoipa::path(
    get,
    path = "/api/v1/jobs",
    tag = "Jobs",
    params(
        ("owner_id" = Option<String>, Query, description = "Filter by owning engineer"),
        ("kind" = Option<JobKind>, Query, description = "Filter by job kind"),
        ("limit" = Option<i32>, Query, description = "Results per page (default 20, max 100)"),
        ("offset" = Option<i32>, Query, description = "Pagination offset"),
    ),
    responses(
        (status = 200, description = "Job list", body = JobListResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    )
)]
pub async fn list_jobs(
    _auth: AuthenticatedUser,
    pool: web::Data<DbPool>,
    query: web::Query<QueryJobsParams>,
) -> AppResult<HttpResponse> {
    let params = query.into_inner();
    let (models, total) = pool.query_jobs(&params).await?;

    let jobs = models
        .iter()
        .map(to_summary)
        .collect::<AppResult<Vec<_>>>()?;

    let response = JobListResponse {
        jobs,
        total,
        limit: params.limit.clamp(1, 100),
        offset: params.offset.max(0),
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Get one job with its freshly derived status.
#[utoipa::path(
    get,
    path = "/api/v1/jobs/{job_id}",
    tag = "Jobs",
    params(
        ("job_id" = Uuid, Path, description = "Job UUID")
    ),
    responses(
        (status = 200, description = "Job detail", body = JobDetailResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Job not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_job(
    _auth: AuthenticatedUser,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let job_id = path.into_inner();

    let model = pool
        .get_job_by_id(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {}", job_id)))?;

    let latest = pool.latest_entry(job_id).await?;
    let response = to_detail(&model, latest.as_ref().map(|e| &e.fields))?;

    Ok(HttpResponse::Ok().json(response))
}

/// Update a job's mutable settings (deadline, loan date, target percentage).
///
/// A changed target is not applied retroactively to stored entries; status is
/// recomputed against the new target on every read.
#[utoipa::path(
    put,
    path = "/api/v1/jobs/{job_id}",
    tag = "Jobs",
    params(
        ("job_id" = Uuid, Path, description = "Job UUID")
    ),
    request_body = UpdateJobRequest,
    responses(
        (status = 200, description = "Job updated", body = JobDetailResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Job not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn update_job(
    auth: AuthenticatedUser,
    pool: web::Data<DbPool>,
    broadcaster: web::Data<EventBroadcaster>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateJobRequest>,
) -> AppResult<HttpResponse> {
    let job_id = path.into_inner();
    let patch = body.into_inner();

    let existing = pool
        .get_job_by_id(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {}", job_id)))?;

    if !auth.can_view_owner(&existing.owner_id) {
        return Err(AppError::Unauthorized(
            "Only the owning engineer or a supervisor can update a job".to_string(),
        ));
    }

    if patch.target_percentage.is_some() {
        let kind = job_kind(&existing)?;
        if !kind.has_target() {
            return Err(AppError::InvalidInput(format!(
                "target_percentage is not applicable to {} jobs",
                kind
            )));
        }
    }

    let model = pool.update_job_settings(job_id, &patch).await?;

    info!("Job settings updated: id={}", job_id);

    broadcaster.send(WsEventMessage::new(WsEvent::job_updated(job_id)));

    let latest = pool.latest_entry(job_id).await?;
    let response = to_detail(&model, latest.as_ref().map(|e| &e.fields))?;

    Ok(HttpResponse::Ok().json(response))
}

/// Configure job routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/jobs")
            .route(web::post().to(create_job))
            .route(web::get().to(list_jobs)),
    )
    .service(
        web::resource("/jobs/{job_id}")
            .route(web::get().to(get_job))
            .route(web::put().to(update_job)),
    );
}
