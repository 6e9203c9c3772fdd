//! Dashboard API handlers.
//!
//! Roll-ups are recomputed in full on every request from the jobs' cached
//! progress; nothing here is persisted.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use crate::auth::AuthenticatedUser;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{DashboardResponse, EngineerStats, JobSnapshot};
use crate::services::rollup;

/// Supervisor dashboard: fleet KPIs plus every engineer's roll-up, ordered by
/// descending active-job count.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Fleet dashboard", body = DashboardResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_dashboard(
    auth: AuthenticatedUser,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    if !auth.identity.is_supervisor() {
        return Err(AppError::Unauthorized(
            "Only supervisors can view the fleet dashboard".to_string(),
        ));
    }

    let jobs = pool.list_all_jobs().await?;
    let snapshots: Vec<JobSnapshot> = jobs.iter().map(JobSnapshot::from).collect();

    let now = Utc::now();
    let response = DashboardResponse {
        generated_at: now,
        fleet: rollup::rollup_fleet(&snapshots, now),
        engineers: rollup::rollup_engineers(&snapshots, now),
    };

    Ok(HttpResponse::Ok().json(response))
}

/// One engineer's roll-up; visible to supervisors and the engineer themselves.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/engineers/{owner_id}",
    tag = "Dashboard",
    params(
        ("owner_id" = String, Path, description = "Engineer identity-provider id")
    ),
    responses(
        (status = 200, description = "Engineer roll-up", body = EngineerStats),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_engineer_stats(
    auth: AuthenticatedUser,
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let owner_id = path.into_inner();

    if !auth.can_view_owner(&owner_id) {
        return Err(AppError::Unauthorized(
            "Engineers can only view their own statistics".to_string(),
        ));
    }

    let jobs = pool.list_jobs_by_owner(&owner_id).await?;
    let snapshots: Vec<JobSnapshot> = jobs.iter().map(JobSnapshot::from).collect();
    let refs: Vec<&JobSnapshot> = snapshots.iter().collect();

    // An engineer with no jobs still gets zeroed stats.
    let owner_name = jobs
        .first()
        .map(|job| job.owner_name.clone())
        .unwrap_or_else(|| owner_id.clone());

    let stats = rollup::rollup_engineer(&owner_id, &owner_name, &refs, Utc::now());

    Ok(HttpResponse::Ok().json(stats))
}

/// Configure dashboard routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/dashboard").route(web::get().to(get_dashboard)))
        .service(
            web::resource("/dashboard/engineers/{owner_id}")
                .route(web::get().to(get_engineer_stats)),
        );
}
