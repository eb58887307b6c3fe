use super::common::*;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::reports::domain::ReportStatus;
use crate::reports::repository::ReportRepository;
use crate::reports::router::{list_approved_handler, submit_handler};
use crate::reports::ReportLifecycleService;

#[tokio::test]
async fn submit_route_creates_pending_report() {
    let (service, repository) = build_service();
    let authority = authority();
    let router = router_with_service(service, authority.clone());

    let response = router
        .oneshot(json_request(
            "POST",
            "/reports",
            Some(&bearer(&authority, &citizen())),
            json!({
                "latitude": 40.7128,
                "longitude": -74.006,
                "address": "Canal St & Broadway",
                "hazardType": "Downed power line",
                "severity": "high",
                "createdBy": "someone-else",
                "status": "approved"
            }),
        ))
        .await
        .expect("route executes");

    assert_status(&response, StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["message"], "Hazard report created successfully");
    assert_eq!(payload["report"]["status"], "pending");
    assert_eq!(payload["report"]["createdBy"], "citizen-42");
    assert_eq!(payload["report"]["hazardType"], "Downed power line");
    assert_eq!(repository.len(), 1);
}

#[tokio::test]
async fn submit_route_requires_credentials() {
    let (service, repository) = build_service();
    let router = router_with_service(service, authority());

    let response = router
        .oneshot(json_request(
            "POST",
            "/reports",
            None,
            serde_json::to_value(submission()).expect("serializes"),
        ))
        .await
        .expect("route executes");

    assert_status(&response, StatusCode::UNAUTHORIZED);
    assert!(repository.is_empty());
}

#[tokio::test]
async fn submit_route_returns_field_errors() {
    let (service, _) = build_service();
    let authority = authority();
    let router = router_with_service(service, authority.clone());

    let response = router
        .oneshot(json_request(
            "POST",
            "/reports",
            Some(&bearer(&authority, &citizen())),
            json!({ "latitude": 120.0, "longitude": 10.0, "address": "Quay", "hazardType": "Ice", "severity": "low" }),
        ))
        .await
        .expect("route executes");

    assert_status(&response, StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["message"], "Validation failed");
    assert_eq!(payload["errors"][0]["field"], "latitude");
}

#[tokio::test]
async fn submit_route_rejects_mistyped_body() {
    let (service, _) = build_service();
    let authority = authority();
    let router = router_with_service(service, authority.clone());

    let response = router
        .oneshot(json_request(
            "POST",
            "/reports",
            Some(&bearer(&authority, &citizen())),
            json!({
                "latitude": "north",
                "longitude": 10.0,
                "address": "Quay",
                "hazardType": "Ice",
                "severity": "low"
            }),
        ))
        .await
        .expect("route executes");

    assert_status(&response, StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["message"], "Validation failed");
    assert_eq!(payload["errors"].as_array().map(Vec::len), Some(1));
    assert_eq!(payload["errors"][0]["field"], "latitude");
    assert_eq!(
        payload["errors"][0]["message"],
        "Latitude must be a number between -90 and 90"
    );
}

#[tokio::test]
async fn submit_route_accepts_numeric_string_coordinates() {
    let (service, repository) = build_service();
    let authority = authority();
    let router = router_with_service(service, authority.clone());

    let response = router
        .oneshot(json_request(
            "POST",
            "/reports",
            Some(&bearer(&authority, &citizen())),
            json!({
                "latitude": "12.5",
                "longitude": "10",
                "address": "Quay",
                "hazardType": "Ice",
                "severity": "low"
            }),
        ))
        .await
        .expect("route executes");

    assert_status(&response, StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["report"]["latitude"], 12.5);
    assert_eq!(payload["report"]["longitude"], 10.0);
    assert_eq!(repository.len(), 1);
}

#[tokio::test]
async fn submit_route_rejects_non_object_body() {
    let (service, repository) = build_service();
    let authority = authority();
    let router = router_with_service(service, authority.clone());

    let response = router
        .oneshot(json_request(
            "POST",
            "/reports",
            Some(&bearer(&authority, &citizen())),
            json!("not a report"),
        ))
        .await
        .expect("route executes");

    assert_status(&response, StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["errors"][0]["field"], "body");
    assert!(repository.is_empty());
}

#[tokio::test]
async fn submit_handler_hides_storage_failures() {
    let service = Arc::new(ReportLifecycleService::new(Arc::new(UnavailableRepository)));

    let response = submit_handler::<UnavailableRepository>(
        State(service),
        citizen(),
        Ok(axum::Json(submission())),
    )
    .await;

    assert_status(&response, StatusCode::INTERNAL_SERVER_ERROR);
    let payload = read_json_body(response).await;
    assert_eq!(payload["message"], "Internal server error");
    assert!(!payload.to_string().contains("database offline"));
}

#[tokio::test]
async fn approved_listing_is_public_and_counted() {
    let (service, _) = build_service();
    let first = service.submit(&citizen(), submission()).expect("submit");
    service.submit(&citizen(), submission()).expect("submit");
    service
        .decide(&verifier(), &first.id, "approved")
        .expect("approve");

    let response = list_approved_handler(State(Arc::new(service))).await;

    assert_status(&response, StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["count"], 1);
    assert_eq!(payload["reports"][0]["id"], first.id.0.as_str());
    assert_eq!(payload["reports"][0]["status"], "approved");
}

#[tokio::test]
async fn pending_listing_requires_verifier_role() {
    let (service, _) = build_service();
    service.submit(&citizen(), submission()).expect("submit");
    let authority = authority();
    let router = router_with_service(service, authority.clone());

    let forbidden = router
        .clone()
        .oneshot(json_request(
            "GET",
            "/reports/pending",
            Some(&bearer(&authority, &citizen())),
            json!(null),
        ))
        .await
        .expect("route executes");
    assert_status(&forbidden, StatusCode::FORBIDDEN);

    let allowed = router
        .oneshot(json_request(
            "GET",
            "/reports/pending",
            Some(&bearer(&authority, &verifier())),
            json!(null),
        ))
        .await
        .expect("route executes");
    assert_status(&allowed, StatusCode::OK);
    let payload = read_json_body(allowed).await;
    assert_eq!(payload["count"], 1);
    assert_eq!(payload["reports"][0]["status"], "pending");
}

#[tokio::test]
async fn verify_route_maps_lifecycle_outcomes() {
    let (service, repository) = build_service();
    let report = service.submit(&citizen(), submission()).expect("submit");
    let authority = authority();
    let router = router_with_service(service, authority.clone());
    let uri = format!("/reports/{}/verify", report.id);
    let verifier_token = bearer(&authority, &verifier());

    let invalid = router
        .clone()
        .oneshot(json_request(
            "PATCH",
            &uri,
            Some(&verifier_token),
            json!({ "status": "pending" }),
        ))
        .await
        .expect("route executes");
    assert_status(&invalid, StatusCode::BAD_REQUEST);

    let approved = router
        .clone()
        .oneshot(json_request(
            "PATCH",
            &uri,
            Some(&verifier_token),
            json!({ "status": "approved" }),
        ))
        .await
        .expect("route executes");
    assert_status(&approved, StatusCode::OK);
    let payload = read_json_body(approved).await;
    assert_eq!(payload["message"], "Report approved successfully");
    assert_eq!(payload["report"]["status"], "approved");

    let repeated = router
        .clone()
        .oneshot(json_request(
            "PATCH",
            &uri,
            Some(&verifier_token),
            json!({ "status": "rejected" }),
        ))
        .await
        .expect("route executes");
    assert_status(&repeated, StatusCode::CONFLICT);
    let payload = read_json_body(repeated).await;
    assert_eq!(payload["message"], "Report has already been processed");

    let missing = router
        .oneshot(json_request(
            "PATCH",
            "/reports/does-not-exist/verify",
            Some(&verifier_token),
            json!({ "status": "approved" }),
        ))
        .await
        .expect("route executes");
    assert_status(&missing, StatusCode::NOT_FOUND);

    let stored = repository
        .find_by_id(&report.id)
        .expect("lookup")
        .expect("record present");
    assert_eq!(stored.status, ReportStatus::Approved);
}

#[tokio::test]
async fn verify_route_forbids_citizens_before_reading_the_body() {
    let (service, _) = build_service();
    let authority = authority();
    let router = router_with_service(service, authority.clone());

    let response = router
        .oneshot(json_request(
            "PATCH",
            "/reports/does-not-exist/verify",
            Some(&bearer(&authority, &citizen())),
            json!("not an object"),
        ))
        .await
        .expect("route executes");

    assert_status(&response, StatusCode::FORBIDDEN);
}
