// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};

use crate::{error::ApiError, models::DashboardResponse, state::AppState};

/// Wallet address and native balance, with placeholder report counters.
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Status",
    responses(
        (status = 200, description = "Dashboard summary", body = DashboardResponse),
        (status = 500, description = "Wallet not initialized", body = crate::error::ErrorBody)
    )
)]
pub async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardResponse>, ApiError> {
    let wallet = state.wallet().await?;
    let snapshot = wallet.current_state();

    Ok(Json(DashboardResponse {
        total_reports: 0,
        open_reports: 0,
        closed_reports: 0,
        pending_feedback: 0,
        wallet_address: snapshot.address.clone(),
        balance: snapshot.native_balance().to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn dashboard_requires_wallet() {
        let err = dashboard(State(AppState::default())).await.unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Wallet not initialized");
    }
}
