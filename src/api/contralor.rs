// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Reviewer ("contralor") endpoints.
//!
//! These are distinguished from the informer endpoints by path only; no
//! role check is enforced here.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    api::extract::ApiJson,
    contract::required,
    error::ApiError,
    models::{ReportResponse, SendFeedbackRequest, TransactionResponse, UpdateStatusRequest},
    state::AppState,
};

/// Fetch a report by its numeric id.
#[utoipa::path(
    get,
    path = "/api/contralor/report/{id}",
    tag = "Contralor",
    params(("id" = String, Path, description = "Numeric report id")),
    responses(
        (status = 200, description = "Report found", body = ReportResponse),
        (status = 500, description = "Invalid id, unknown report or contract unavailable", body = crate::error::ErrorBody)
    )
)]
pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ReportResponse>, ApiError> {
    let contract = state.contract().await?;
    let report_id: u64 = id
        .trim()
        .parse()
        .map_err(|_| ApiError::internal(format!("Invalid report id: {id}")))?;

    let report = contract.get_report(report_id).await?;
    Ok(Json(ReportResponse { report }))
}

/// Change the case status of a report.
#[utoipa::path(
    post,
    path = "/api/contralor/update-status",
    request_body = UpdateStatusRequest,
    tag = "Contralor",
    responses(
        (status = 200, description = "Status update submitted", body = TransactionResponse),
        (status = 500, description = "Contract not initialized or call failed", body = crate::error::ErrorBody)
    )
)]
pub async fn update_status(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<UpdateStatusRequest>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let contract = state.contract().await?;
    let report_id = required(request.report_id, "report_id")?;
    let new_status = required(request.new_status, "new_status")?;

    let outcome = contract.update_case_status(report_id, &new_status).await?;
    Ok(Json(TransactionResponse::submitted(
        outcome.tx_id,
        "Case status updated successfully",
    )))
}

/// Send feedback to the informer of a report.
#[utoipa::path(
    post,
    path = "/api/contralor/send-feedback",
    request_body = SendFeedbackRequest,
    tag = "Contralor",
    responses(
        (status = 200, description = "Feedback submitted", body = TransactionResponse),
        (status = 500, description = "Contract not initialized or call failed", body = crate::error::ErrorBody)
    )
)]
pub async fn send_feedback(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SendFeedbackRequest>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let contract = state.contract().await?;
    let report_id = required(request.report_id, "report_id")?;
    let message = required(request.feedback_message, "feedback_message")?;

    let outcome = contract.send_feedback(report_id, &message).await?;
    Ok(Json(TransactionResponse::submitted(
        outcome.tx_id,
        "Feedback sent successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn reviewer_calls_require_contract() {
        let state = AppState::default();

        let err = get_report(State(state.clone()), Path("1".into()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Contract not initialized");

        let err = update_status(State(state.clone()), ApiJson(UpdateStatusRequest::default()))
            .await
            .unwrap_err();
        assert_eq!(err.message, "Contract not initialized");

        let err = send_feedback(State(state), ApiJson(SendFeedbackRequest::default()))
            .await
            .unwrap_err();
        assert_eq!(err.message, "Contract not initialized");
    }
}
