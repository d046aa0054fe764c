// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Report submission endpoints.

use axum::{extract::State, Json};

use crate::{
    api::extract::ApiJson,
    error::ApiError,
    models::{ReportListResponse, SubmitReportRequest, SubmitReportResponse},
    state::AppState,
};

/// File an anonymous report through the deployed contract.
#[utoipa::path(
    post,
    path = "/api/reports/submit",
    request_body = SubmitReportRequest,
    tag = "Reports",
    responses(
        (status = 200, description = "Report transaction submitted", body = SubmitReportResponse),
        (status = 500, description = "Contract not initialized or call failed", body = crate::error::ErrorBody)
    )
)]
pub async fn submit_report(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SubmitReportRequest>,
) -> Result<Json<SubmitReportResponse>, ApiError> {
    let contract = state.contract().await?;
    let submitted = contract.submit_report(request.into()).await?;

    Ok(Json(SubmitReportResponse {
        success: true,
        transaction_id: submitted.tx_id,
        message: "Report submitted successfully".to_string(),
        report_id: submitted.report_id,
    }))
}

/// List reports.
///
/// Always empty: contract maps are not enumerable from here and no local
/// index is kept.
#[utoipa::path(
    get,
    path = "/api/reports",
    tag = "Reports",
    responses(
        (status = 200, description = "Report list (always empty)", body = ReportListResponse)
    )
)]
pub async fn list_reports() -> Json<ReportListResponse> {
    Json(ReportListResponse {
        reports: Vec::new(),
    })
}
