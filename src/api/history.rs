//! History entry API handlers.
//!
//! The append and delete handlers are the reconciliation points for the
//! cached-progress invariant: every history change ends with
//! recompute-and-persist of the parent job's progress.

use actix_web::{HttpResponse, web};
use serde_json::Value as JsonValue;
use tracing::info;
use uuid::Uuid;

use crate::auth::{AuthenticatedUser, UserRole};
use crate::db::DbPool;
use crate::entity::{history_entry, job};
use crate::error::{AppError, AppResult};
use crate::models::{
    AppendEntryRequest, AppendEntryResponse, DeleteEntryResponse, HistoryEntryResponse,
    HistoryListResponse, JobKind, WsEvent, WsEventMessage,
};
use crate::services::EventBroadcaster;
use crate::services::analytics::{self, QcTrend, TeachTrend};
use crate::services::progress;

use super::jobs::job_kind;

/// Trend statistics for one job's full history.
#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct TrendResponse {
    pub job_id: Uuid,
    pub kind: JobKind,
    /// Percentage trend (QC assembly, hot-press kinds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qc: Option<QcTrend>,
    /// Per-jig improvement trend (TEACH).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teach: Option<TeachTrend>,
}

async fn load_job(pool: &DbPool, job_id: Uuid) -> AppResult<job::Model> {
    pool.get_job_by_id(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {}", job_id)))
}

fn require_engineer(auth: &AuthenticatedUser) -> AppResult<()> {
    if auth.identity.role != UserRole::Engineer {
        return Err(AppError::Unauthorized(
            "Only engineers can modify job history".to_string(),
        ));
    }
    Ok(())
}

fn entry_response(
    kind: JobKind,
    entry: &history_entry::Model,
    previous: Option<&history_entry::Model>,
) -> HistoryEntryResponse {
    HistoryEntryResponse {
        id: entry.id,
        job_id: entry.job_id,
        author_name: entry.author_name.clone(),
        fields: entry.fields.clone(),
        created_at: entry.created_at,
        variation: previous
            .and_then(|prev| analytics::consecutive_delta(kind, &entry.fields, &prev.fields)),
    }
}

/// Append a history entry and recompute the job's cached progress.
#[utoipa::path(
    post,
    path = "/api/v1/jobs/{job_id}/history",
    tag = "History",
    params(
        ("job_id" = Uuid, Path, description = "Job UUID")
    ),
    request_body = AppendEntryRequest,
    responses(
        (status = 201, description = "Entry appended", body = AppendEntryResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Job not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn append_entry(
    auth: AuthenticatedUser,
    pool: web::Data<DbPool>,
    broadcaster: web::Data<EventBroadcaster>,
    path: web::Path<Uuid>,
    body: web::Json<AppendEntryRequest>,
) -> AppResult<HttpResponse> {
    require_engineer(&auth)?;

    let job_id = path.into_inner();
    let req = body.into_inner();

    if !req.fields.is_object() {
        return Err(AppError::InvalidInput(
            "fields must be a JSON object".to_string(),
        ));
    }

    let model = load_job(&pool, job_id).await?;
    let kind = job_kind(&model)?;
    let target = model
        .target_percentage
        .unwrap_or(progress::DEFAULT_TARGET_PERCENTAGE);

    let fields =
        progress::derive_entry_fields(kind, &req.fields, req.previous_fields.as_ref(), target);

    let entry = pool
        .insert_entry(job_id, &auth.identity.display_name, fields)
        .await?;

    // The entry just appended is the latest by construction.
    let summary = progress::compute_job_progress(kind, Some(&entry.fields), model.target_percentage);
    pool.update_job_progress(job_id, summary.progress, entry.created_at)
        .await?;

    info!(
        "History appended: job={}, entry={}, progress={}, status={}",
        job_id, entry.id, summary.progress, summary.status
    );

    broadcaster.send(WsEventMessage::new(WsEvent::history_appended(
        job_id,
        entry.id,
        summary.progress,
        summary.status,
    )));

    let response = AppendEntryResponse {
        entry: entry_response(kind, &entry, None),
        progress: summary,
    };

    Ok(HttpResponse::Created().json(response))
}

/// List a job's history, newest first.
///
/// Each row carries the variation-vs-previous indicator where defined.
#[utoipa::path(
    get,
    path = "/api/v1/jobs/{job_id}/history",
    tag = "History",
    params(
        ("job_id" = Uuid, Path, description = "Job UUID")
    ),
    responses(
        (status = 200, description = "History entries", body = HistoryListResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Job not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn list_history(
    _auth: AuthenticatedUser,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let job_id = path.into_inner();
    let model = load_job(&pool, job_id).await?;
    let kind = job_kind(&model)?;

    let entries = pool.list_entries(job_id).await?;

    let responses: Vec<HistoryEntryResponse> = entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| entry_response(kind, entry, entries.get(idx + 1)))
        .collect();

    let response = HistoryListResponse {
        job_id,
        total: responses.len(),
        entries: responses,
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Delete a history entry and recompute the job's cached progress.
///
/// Deleting the only entry resets the job to its initial state (progress 0,
/// status pending).
#[utoipa::path(
    delete,
    path = "/api/v1/jobs/{job_id}/history/{entry_id}",
    tag = "History",
    params(
        ("job_id" = Uuid, Path, description = "Job UUID"),
        ("entry_id" = Uuid, Path, description = "History entry UUID"),
    ),
    responses(
        (status = 200, description = "Entry deleted", body = DeleteEntryResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Job or entry not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn delete_entry(
    auth: AuthenticatedUser,
    pool: web::Data<DbPool>,
    broadcaster: web::Data<EventBroadcaster>,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    require_engineer(&auth)?;

    let (job_id, entry_id) = path.into_inner();
    let model = load_job(&pool, job_id).await?;
    let kind = job_kind(&model)?;

    if !pool.delete_entry(job_id, entry_id).await? {
        return Err(AppError::NotFound(format!("History entry {}", entry_id)));
    }

    // Recompute from whatever is now the latest entry.
    let latest = pool.latest_entry(job_id).await?;
    let summary = progress::compute_job_progress(
        kind,
        latest.as_ref().map(|e| &e.fields),
        model.target_percentage,
    );
    let last_updated = latest
        .as_ref()
        .map(|e| e.created_at)
        .unwrap_or_else(chrono::Utc::now);
    pool.update_job_progress(job_id, summary.progress, last_updated)
        .await?;

    info!(
        "History entry deleted: job={}, entry={}, progress={}",
        job_id, entry_id, summary.progress
    );

    broadcaster.send(WsEventMessage::new(WsEvent::history_deleted(
        job_id,
        entry_id,
        summary.progress,
        summary.status,
    )));

    let response = DeleteEntryResponse {
        job_id,
        deleted_entry_id: entry_id,
        progress: summary,
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Trend statistics over a job's full history.
#[utoipa::path(
    get,
    path = "/api/v1/jobs/{job_id}/trend",
    tag = "History",
    params(
        ("job_id" = Uuid, Path, description = "Job UUID")
    ),
    responses(
        (status = 200, description = "Trend statistics", body = TrendResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Job not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_trend(
    _auth: AuthenticatedUser,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let job_id = path.into_inner();
    let model = load_job(&pool, job_id).await?;
    let kind = job_kind(&model)?;
    let target = model
        .target_percentage
        .unwrap_or(progress::DEFAULT_TARGET_PERCENTAGE);

    // Trend math runs oldest-to-newest.
    let mut fields_asc: Vec<JsonValue> = pool
        .list_entries(job_id)
        .await?
        .into_iter()
        .map(|entry| entry.fields)
        .collect();
    fields_asc.reverse();

    let response = match kind {
        JobKind::TeachAssembly => TrendResponse {
            job_id,
            kind,
            qc: None,
            teach: Some(analytics::analyze_teach(&fields_asc)),
        },
        _ => TrendResponse {
            job_id,
            kind,
            qc: Some(analytics::analyze_qc(&fields_asc, target)),
            teach: None,
        },
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Configure history routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/jobs/{job_id}/history")
            .route(web::post().to(append_entry))
            .route(web::get().to(list_history)),
    )
    .service(
        web::resource("/jobs/{job_id}/history/{entry_id}").route(web::delete().to(delete_entry)),
    )
    .service(web::resource("/jobs/{job_id}/trend").route(web::get().to(get_trend)));
}
