// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the REST API. Field names follow the wire
//! format the web front end already speaks: request bodies are snake_case,
//! response envelopes are camelCase.
//!
//! Request fields are optional on purpose: presence is checked by the
//! contract call so a missing field surfaces as a contract error.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::contract::{InstitutionTypeArg, Report, SubmitReportArgs};

// =============================================================================
// Status & Dashboard
// =============================================================================

/// Service status and initialization flags.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// Always `"ok"` while the process is serving.
    pub status: String,
    /// Whether the deployed contract handle is ready.
    pub contract_initialized: bool,
    /// Whether the wallet session is synced and ready.
    pub wallet_connected: bool,
}

/// Dashboard summary.
///
/// Report counters are placeholders: this service keeps no report index.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub total_reports: u64,
    pub open_reports: u64,
    pub closed_reports: u64,
    pub pending_feedback: u64,
    pub wallet_address: String,
    /// Native token balance in its smallest unit.
    pub balance: String,
}

// =============================================================================
// Reports
// =============================================================================

/// Request to file a new report.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SubmitReportRequest {
    pub institution_name: Option<String>,
    pub report_details: Option<String>,
    /// `"PUBLIC"`, `"PRIVATE"`, or the ledger index `0` / `1`.
    pub institution_type: Option<InstitutionTypeArg>,
    /// Unix seconds. Omitted or `0` means now.
    pub timestamp: Option<u64>,
}

impl From<SubmitReportRequest> for SubmitReportArgs {
    fn from(request: SubmitReportRequest) -> Self {
        Self {
            institution_name: request.institution_name,
            report_details: request.report_details,
            institution_type: request.institution_type,
            timestamp: request.timestamp,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReportResponse {
    pub success: bool,
    pub transaction_id: String,
    pub message: String,
    pub report_id: u64,
}

/// Report list. Always empty: listing requires an indexer integration.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ReportListResponse {
    pub reports: Vec<Report>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ReportResponse {
    pub report: Report,
}

// =============================================================================
// Reviewer (contralor) actions
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub report_id: Option<u64>,
    pub new_status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SendFeedbackRequest {
    pub report_id: Option<u64>,
    #[serde(alias = "message")]
    pub feedback_message: Option<String>,
}

/// Result of a state-changing contract call.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub success: bool,
    pub transaction_id: String,
    pub message: String,
}

impl TransactionResponse {
    pub fn submitted(transaction_id: String, message: impl Into<String>) -> Self {
        Self {
            success: true,
            transaction_id,
            message: message.into(),
        }
    }
}
