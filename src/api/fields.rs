//! Field schema lookup endpoint.
//!
//! UI forms fetch their field lists from here instead of re-declaring them
//! per screen.

use actix_web::{HttpResponse, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::AuthenticatedUser;
use crate::error::{AppError, AppResult};
use crate::models::{FieldSpec, JobKind, fields_for};

/// Field schema for one job kind.
#[derive(Debug, Serialize, ToSchema)]
pub struct FieldSchemaResponse {
    pub kind: JobKind,
    pub fields: Vec<FieldSpec>,
}

/// Ordered field list for a job kind.
#[utoipa::path(
    get,
    path = "/api/v1/fields/{kind}",
    tag = "Fields",
    params(
        ("kind" = String, Path, description = "Job kind (qc_assembly, teach_assembly, qc_hotpress, laser_hotpress)")
    ),
    responses(
        (status = 200, description = "Field schema", body = FieldSchemaResponse),
        (status = 400, description = "Unknown kind", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_fields(
    _auth: AuthenticatedUser,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let raw = path.into_inner();
    let kind = JobKind::parse(&raw)
        .ok_or_else(|| AppError::InvalidInput(format!("Unknown job kind '{}'", raw)))?;

    let response = FieldSchemaResponse {
        kind,
        fields: fields_for(kind).to_vec(),
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Configure field schema routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/fields/{kind}").route(web::get().to(get_fields)));
}
