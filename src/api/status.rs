// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};

use crate::{models::StatusResponse, state::AppState};

/// Report whether the wallet session and contract handle are ready.
///
/// Always 200; doubles as a health check.
#[utoipa::path(
    get,
    path = "/api/status",
    tag = "Status",
    responses(
        (status = 200, description = "Service is running", body = StatusResponse)
    )
)]
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".to_string(),
        contract_initialized: state.contract_initialized().await,
        wallet_connected: state.wallet_connected().await,
    })
}
