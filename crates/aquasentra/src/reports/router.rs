use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use super::domain::{HazardReport, Principal, ReportId};
use super::repository::ReportRepository;
use super::service::{ReportLifecycleService, ReportServiceError};
use super::validation::ReportSubmission;
use crate::auth::TokenAuthority;

/// Body of `PATCH /reports/:id/verify`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReportEnvelope {
    pub message: String,
    pub report: HazardReport,
}

#[derive(Debug, Serialize)]
pub struct ReportListEnvelope {
    pub message: &'static str,
    pub reports: Vec<HazardReport>,
    pub count: usize,
}

/// Router builder exposing the report submission and moderation endpoints.
pub fn report_router<R>(
    service: Arc<ReportLifecycleService<R>>,
    authority: Arc<TokenAuthority>,
) -> Router
where
    R: ReportRepository + 'static,
{
    Router::new()
        .route(
            "/reports",
            get(list_approved_handler::<R>).post(submit_handler::<R>),
        )
        .route("/reports/pending", get(list_pending_handler::<R>))
        .route("/reports/:id/verify", patch(verify_handler::<R>))
        .with_state(service)
        .layer(Extension(authority))
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<ReportLifecycleService<R>>>,
    principal: Principal,
    payload: Result<Json<ReportSubmission>, JsonRejection>,
) -> Response
where
    R: ReportRepository + 'static,
{
    let submission = match payload {
        Ok(Json(submission)) => submission,
        Err(rejection) => return malformed_body(rejection),
    };

    match service.submit(&principal, submission) {
        Ok(report) => (
            StatusCode::CREATED,
            Json(ReportEnvelope {
                message: "Hazard report created successfully".to_string(),
                report,
            }),
        )
            .into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn list_approved_handler<R>(
    State(service): State<Arc<ReportLifecycleService<R>>>,
) -> Response
where
    R: ReportRepository + 'static,
{
    match service.list_approved() {
        Ok(reports) => list_response("Approved hazard reports retrieved successfully", reports),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn list_pending_handler<R>(
    State(service): State<Arc<ReportLifecycleService<R>>>,
    principal: Principal,
) -> Response
where
    R: ReportRepository + 'static,
{
    match service.list_pending(&principal) {
        Ok(reports) => list_response("Pending hazard reports retrieved successfully", reports),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn verify_handler<R>(
    State(service): State<Arc<ReportLifecycleService<R>>>,
    Path(report_id): Path<String>,
    principal: Principal,
    payload: Result<Json<VerifyRequest>, JsonRejection>,
) -> Response
where
    R: ReportRepository + 'static,
{
    // An unreadable body still goes through the service so role checks come first.
    let decision = payload
        .ok()
        .and_then(|Json(request)| request.status)
        .unwrap_or_default();

    match service.decide(&principal, &ReportId(report_id), &decision) {
        Ok(report) => {
            let message = format!("Report {} successfully", report.status.label());
            (StatusCode::OK, Json(ReportEnvelope { message, report })).into_response()
        }
        Err(error) => error.into_response(),
    }
}

fn list_response(message: &'static str, reports: Vec<HazardReport>) -> Response {
    let count = reports.len();
    (
        StatusCode::OK,
        Json(ReportListEnvelope {
            message,
            reports,
            count,
        }),
    )
        .into_response()
}

fn malformed_body(rejection: JsonRejection) -> Response {
    let payload = json!({
        "message": "Validation failed",
        "errors": [{ "field": "body", "message": rejection.body_text() }],
    });
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}

/// Storage details are logged, never returned to the caller.
impl IntoResponse for ReportServiceError {
    fn into_response(self) -> Response {
        match self {
            ReportServiceError::Validation(validation) => {
                let payload = json!({
                    "message": "Validation failed",
                    "errors": validation.errors,
                });
                (StatusCode::BAD_REQUEST, Json(payload)).into_response()
            }
            ReportServiceError::InvalidArgument(_) => {
                let payload = json!({
                    "message": "Invalid status. Must be either \"approved\" or \"rejected\"",
                });
                (StatusCode::BAD_REQUEST, Json(payload)).into_response()
            }
            ReportServiceError::Forbidden { .. } => {
                let payload = json!({ "message": "Access denied. Insufficient permissions." });
                (StatusCode::FORBIDDEN, Json(payload)).into_response()
            }
            ReportServiceError::NotFound(_) => {
                let payload = json!({ "message": "Hazard report not found" });
                (StatusCode::NOT_FOUND, Json(payload)).into_response()
            }
            ReportServiceError::Conflict { status, .. } => {
                let payload = json!({
                    "message": "Report has already been processed",
                    "status": status.label(),
                });
                (StatusCode::CONFLICT, Json(payload)).into_response()
            }
            ReportServiceError::Storage(source) => {
                error!(error = %source, "report storage failure");
                let payload = json!({ "message": "Internal server error" });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
            }
        }
    }
}
