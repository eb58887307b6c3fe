use std::sync::Arc;

use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use chrono::Duration;
use serde_json::{json, Value};

use crate::auth::TokenAuthority;
use crate::reports::domain::{HazardReport, NewReport, Principal, ReportId, ReportStatus, Role};
use crate::reports::repository::{ReportRepository, RepositoryError};
use crate::reports::store::InMemoryReportRepository;
use crate::reports::validation::ReportSubmission;
use crate::reports::{report_router, ReportLifecycleService};

pub(super) fn citizen() -> Principal {
    Principal::new("citizen-42", Role::Citizen)
}

pub(super) fn verifier() -> Principal {
    Principal::new("verifier-7", Role::Verifier)
}

pub(super) fn submission() -> ReportSubmission {
    ReportSubmission {
        latitude: Some(json!(-33.8688)),
        longitude: Some(json!(151.2093)),
        address: Some(json!("  12 Harbour Street, Sydney  ")),
        hazard_type: Some(json!("Flooding")),
        severity: Some(json!("high")),
        description: Some(json!("Storm drain overflowing onto the footpath")),
    }
}

pub(super) fn build_service() -> (
    ReportLifecycleService<InMemoryReportRepository>,
    Arc<InMemoryReportRepository>,
) {
    let repository = Arc::new(InMemoryReportRepository::default());
    let service = ReportLifecycleService::new(repository.clone());
    (service, repository)
}

pub(super) fn authority() -> Arc<TokenAuthority> {
    Arc::new(TokenAuthority::new(
        "routing-test-secret",
        "aquasentra-test",
        Duration::minutes(5),
    ))
}

pub(super) fn bearer(authority: &TokenAuthority, principal: &Principal) -> String {
    format!(
        "Bearer {}",
        authority.issue(principal).expect("token issues")
    )
}

pub(super) fn router_with_service(
    service: ReportLifecycleService<InMemoryReportRepository>,
    authority: Arc<TokenAuthority>,
) -> axum::Router {
    report_router(Arc::new(service), authority)
}

pub(super) fn json_request(
    method: &str,
    uri: &str,
    authorization: Option<&str>,
    body: Value,
) -> Request<axum::body::Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder
        .body(axum::body::Body::from(
            serde_json::to_vec(&body).expect("body serializes"),
        ))
        .expect("request builds")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(response.status(), expected);
}

/// Store whose every call fails.
pub(super) struct UnavailableRepository;

impl ReportRepository for UnavailableRepository {
    fn insert(&self, _report: NewReport) -> Result<HazardReport, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_by_id(&self, _id: &ReportId) -> Result<Option<HazardReport>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_by_status(&self, _status: ReportStatus) -> Result<Vec<HazardReport>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_status(
        &self,
        _id: &ReportId,
        _expected: ReportStatus,
        _next: ReportStatus,
    ) -> Result<HazardReport, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Store that reports a record as pending but loses every conditional write,
/// standing in for a concurrent verifier that decided first.
pub(super) struct RacingRepository {
    pub(super) inner: InMemoryReportRepository,
    pub(super) winner: ReportStatus,
}

impl ReportRepository for RacingRepository {
    fn insert(&self, report: NewReport) -> Result<HazardReport, RepositoryError> {
        self.inner.insert(report)
    }

    fn find_by_id(&self, id: &ReportId) -> Result<Option<HazardReport>, RepositoryError> {
        self.inner.find_by_id(id)
    }

    fn find_by_status(&self, status: ReportStatus) -> Result<Vec<HazardReport>, RepositoryError> {
        self.inner.find_by_status(status)
    }

    fn update_status(
        &self,
        _id: &ReportId,
        _expected: ReportStatus,
        _next: ReportStatus,
    ) -> Result<HazardReport, RepositoryError> {
        Err(RepositoryError::StatusMismatch {
            current: self.winner,
        })
    }
}
