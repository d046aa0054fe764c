// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::io;

use axum::{extract::State, Json};
use serde_json::Value;

use crate::{error::ApiError, state::AppState};

/// Serve the deployment descriptor the server was started with.
#[utoipa::path(
    get,
    path = "/deployment.json",
    tag = "Deployment",
    responses(
        (status = 200, description = "Deployment descriptor", body = crate::deployment::DeploymentDescriptor),
        (status = 404, description = "Contract not deployed yet", body = crate::error::ErrorBody)
    )
)]
pub async fn get_deployment(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let bytes = match tokio::fs::read(state.deployment_file()).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ApiError::not_found(
                "Deployment file not found. Please deploy the contract first.",
            ))
        }
        Err(e) => return Err(ApiError::internal(e.to_string())),
    };

    serde_json::from_slice(&bytes)
        .map(Json)
        .map_err(|e| ApiError::internal(format!("Malformed deployment file: {e}")))
}
