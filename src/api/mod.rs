// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::ServerConfig,
    contract::{InstitutionType, InstitutionTypeArg, Report},
    deployment::DeploymentDescriptor,
    error::ErrorBody,
    models::{
        DashboardResponse, ReportListResponse, ReportResponse, SendFeedbackRequest,
        StatusResponse, SubmitReportRequest, SubmitReportResponse, TransactionResponse,
        UpdateStatusRequest,
    },
    state::AppState,
};

pub mod contralor;
pub mod dashboard;
pub mod deployment;
pub mod extract;
pub mod reports;
pub mod status;

/// JSON API routes plus OpenAPI docs.
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/status", get(status::status))
        .route("/dashboard", get(dashboard::dashboard))
        .route("/reports", get(reports::list_reports))
        .route("/reports/submit", post(reports::submit_report))
        .route("/contralor/report/{id}", get(contralor::get_report))
        .route("/contralor/update-status", post(contralor::update_status))
        .route("/contralor/send-feedback", post(contralor::send_feedback));

    Router::new()
        .nest("/api", api_routes)
        .route("/deployment.json", get(deployment::get_deployment))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
}

/// Full application: API, static assets, tracing and request ids.
pub fn app(state: AppState, config: &ServerConfig) -> Router {
    router(state)
        .nest_service("/contracts", ServeDir::new(&config.contracts_dir))
        .fallback_service(ServeDir::new(&config.web_dir))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        status::status,
        dashboard::dashboard,
        reports::submit_report,
        reports::list_reports,
        contralor::get_report,
        contralor::update_status,
        contralor::send_feedback,
        deployment::get_deployment
    ),
    components(
        schemas(
            StatusResponse,
            DashboardResponse,
            SubmitReportRequest,
            SubmitReportResponse,
            ReportListResponse,
            ReportResponse,
            Report,
            InstitutionType,
            InstitutionTypeArg,
            UpdateStatusRequest,
            SendFeedbackRequest,
            TransactionResponse,
            DeploymentDescriptor,
            ErrorBody
        )
    ),
    tags(
        (name = "Status", description = "Service and initialization status"),
        (name = "Reports", description = "Anonymous report submission"),
        (name = "Contralor", description = "Reviewer actions on reports"),
        (name = "Deployment", description = "Deployed contract descriptor")
    )
)]
struct ApiDoc;
