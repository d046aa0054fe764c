// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! End-to-end HTTP tests against the router, using the in-process devnet.

use std::collections::HashMap;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use compliants_server::{
    api::router,
    config::{InitConfig, DEPLOYMENT_FILE_ENV, LEDGER_BACKEND_ENV, WALLET_SEED_ENV},
    init::run_initialization,
    state::AppState,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use tower::util::ServiceExt;

const SEED: &str = "1111111111111111111111111111111111111111111111111111111111111111";

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Run the startup sequence against the simulated ledger.
async fn initialized_state(dir: &TempDir, descriptor: Option<&str>) -> AppState {
    let deployment = dir.path().join("deployment.json");
    if let Some(json) = descriptor {
        std::fs::write(&deployment, json).unwrap();
    }

    let vars: HashMap<&str, String> = HashMap::from([
        (WALLET_SEED_ENV, SEED.to_string()),
        (LEDGER_BACKEND_ENV, "simulated".to_string()),
        (DEPLOYMENT_FILE_ENV, deployment.display().to_string()),
    ]);
    let config = InitConfig::resolve(|name| vars.get(name).cloned());

    let state = AppState::new(deployment);
    run_initialization(state.clone(), config, CancellationToken::new()).await;
    state
}

#[tokio::test]
async fn status_reports_not_initialized_before_startup() {
    let app = router(AppState::default());
    let (status, body) = send(&app, get("/api/status")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"status": "ok", "contractInitialized": false, "walletConnected": false})
    );
}

#[tokio::test]
async fn submit_before_initialization_is_rejected() {
    let app = router(AppState::default());
    let (status, body) = send(
        &app,
        post(
            "/api/reports/submit",
            json!({"institution_name": "City Hall", "report_details": "x", "institution_type": "PUBLIC"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Contract not initialized"));
}

#[tokio::test]
async fn report_list_is_always_empty() {
    let app = router(AppState::default());
    let (status, body) = send(&app, get("/api/reports")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"reports": []}));
}

#[tokio::test]
async fn missing_deployment_keeps_contract_disabled() {
    let dir = TempDir::new().unwrap();
    let state = initialized_state(&dir, None).await;
    let app = router(state);

    let (_, body) = send(&app, get("/api/status")).await;
    assert_eq!(body["contractInitialized"], false);

    let (status, body) = send(&app, get("/deployment.json")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["error"],
        "Deployment file not found. Please deploy the contract first."
    );
}

#[tokio::test]
async fn non_numeric_report_id_is_an_error() {
    let dir = TempDir::new().unwrap();
    let state = initialized_state(&dir, Some(r#"{"contractAddress":"addr1"}"#)).await;
    let app = router(state);

    let (status, body) = send(&app, get("/api/contralor/report/abc")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Invalid report id: abc");

    // The server keeps serving after the failed call.
    let (status, _) = send(&app, get("/api/status")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn report_lifecycle_through_the_api() {
    let dir = TempDir::new().unwrap();
    let state = initialized_state(&dir, Some(r#"{"contractAddress":"addr1"}"#)).await;
    let app = router(state);

    let (_, body) = send(&app, get("/api/status")).await;
    assert_eq!(body["contractInitialized"], true);
    assert_eq!(body["walletConnected"], true);

    let (status, body) = send(&app, get("/deployment.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["contractAddress"], "addr1");

    let (status, body) = send(
        &app,
        post(
            "/api/reports/submit",
            json!({
                "institution_name": "City Hall",
                "report_details": "Procurement irregularities",
                "institution_type": "PUBLIC"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Report submitted successfully");
    assert!(body["transactionId"].as_str().is_some_and(|tx| !tx.is_empty()));
    assert_eq!(body["reportId"], 1);

    let (status, body) = send(&app, get("/api/contralor/report/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["report"]["institution_name"], "City Hall");
    assert_eq!(body["report"]["institution_type"], "PUBLIC");
    assert_eq!(body["report"]["status"], "OPEN");
    assert!(body["report"]["timestamp"].as_u64().unwrap() > 0);

    let (status, body) = send(
        &app,
        post(
            "/api/contralor/update-status",
            json!({"report_id": 1, "new_status": "IN_REVIEW"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Case status updated successfully");

    let (status, body) = send(
        &app,
        post(
            "/api/contralor/send-feedback",
            json!({"report_id": 1, "feedback_message": "We are looking into it"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Feedback sent successfully");

    let (_, body) = send(&app, get("/api/contralor/report/1")).await;
    assert_eq!(body["report"]["status"], "IN_REVIEW");
    assert_eq!(body["report"]["feedback"], json!(["We are looking into it"]));

    let (status, body) = send(&app, get("/api/contralor/report/42")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Report 42 not found");

    let (status, body) = send(&app, get("/api/dashboard")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalReports"], 0);
    assert!(body["walletAddress"].as_str().is_some_and(|a| !a.is_empty()));
}

#[tokio::test]
async fn missing_report_fields_surface_as_errors() {
    let dir = TempDir::new().unwrap();
    let state = initialized_state(&dir, Some(r#"{"contractAddress":"addr1"}"#)).await;
    let app = router(state);

    let (status, body) = send(
        &app,
        post("/api/reports/submit", json!({"institution_name": "City Hall"})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("report_details"));
}

#[tokio::test]
async fn malformed_bodies_get_the_error_payload() {
    let app = router(AppState::default());

    for (uri, raw) in [
        ("/api/contralor/update-status", r#"{"report_id":-1,"new_status":"X"}"#),
        ("/api/contralor/update-status", r#"{"report_id":"1","new_status":"X"}"#),
        ("/api/contralor/send-feedback", "{not json"),
        ("/api/reports/submit", r#"{"timestamp":"yesterday"}"#),
    ] {
        let request = Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(raw))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{raw}");
        assert_eq!(
            response.headers()["content-type"],
            "application/json",
            "{raw}"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(
            body["error"].as_str().is_some_and(|e| e.contains("JSON")),
            "{raw}: {body}"
        );
    }
}
