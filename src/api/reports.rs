//! Report assembly API handlers.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::services::report::{self, ReportDocument};

/// Maximum jobs per assembled report.
const MAX_REPORT_JOBS: usize = 50;

/// Request to assemble a printable report for selected jobs.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AssembleReportRequest {
    pub job_ids: Vec<Uuid>,
}

/// Assemble a report document for the selected jobs.
///
/// Engineers can report on their own jobs; supervisors on any. The result is
/// a plain data structure; rendering belongs to the client.
#[utoipa::path(
    post,
    path = "/api/v1/reports/assemble",
    tag = "Reports",
    request_body = AssembleReportRequest,
    responses(
        (status = 200, description = "Assembled report", body = ReportDocument),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Job not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn assemble_report(
    auth: AuthenticatedUser,
    pool: web::Data<DbPool>,
    body: web::Json<AssembleReportRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if req.job_ids.is_empty() {
        return Err(AppError::InvalidInput(
            "job_ids must not be empty".to_string(),
        ));
    }
    if req.job_ids.len() > MAX_REPORT_JOBS {
        return Err(AppError::InvalidInput(format!(
            "At most {} jobs per report",
            MAX_REPORT_JOBS
        )));
    }

    let mut ids = req.job_ids.clone();
    ids.sort_unstable();
    ids.dedup();

    let jobs = pool.list_jobs_by_ids(&ids).await?;
    if jobs.len() != ids.len() {
        return Err(AppError::NotFound("One or more jobs".to_string()));
    }

    for job in &jobs {
        if !auth.can_view_owner(&job.owner_id) {
            return Err(AppError::Unauthorized(
                "Engineers can only report on their own jobs".to_string(),
            ));
        }
    }

    let mut inputs = Vec::with_capacity(jobs.len());
    for job in jobs {
        let mut fields_asc: Vec<JsonValue> = pool
            .list_entries(job.id)
            .await?
            .into_iter()
            .map(|entry| entry.fields)
            .collect();
        fields_asc.reverse();
        inputs.push((job, fields_asc));
    }

    let document = report::assemble(inputs, auth.identity.display_name.clone(), Utc::now());

    info!(
        "Report assembled: jobs={}, by={}",
        document.jobs.len(),
        auth.identity.user_id
    );

    Ok(HttpResponse::Ok().json(document))
}

/// Configure report routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/reports/assemble").route(web::post().to(assemble_report)));
}
