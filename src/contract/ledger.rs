// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Public ledger state of the reporting contract and its circuits.
//!
//! Circuits are executed locally against a fresh read of the public state
//! before the resulting transaction is balanced, proven and submitted. The
//! ledger re-executes the same circuit when it applies the transaction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ContractError, InstitutionType, Report};

/// Status given to every new report.
pub const INITIAL_STATUS: &str = "OPEN";

/// A circuit invocation carried by a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "circuit", content = "args", rename_all = "camelCase")]
pub enum Circuit {
    SubmitReport {
        institution_name: String,
        report_details: String,
        institution_type: InstitutionType,
        timestamp: u64,
    },
    GetReport {
        report_id: u64,
    },
    UpdateCaseStatus {
        report_id: u64,
        new_status: String,
    },
    SendFeedback {
        report_id: u64,
        message: String,
    },
}

impl Circuit {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SubmitReport { .. } => "submitReport",
            Self::GetReport { .. } => "getReport",
            Self::UpdateCaseStatus { .. } => "updateCaseStatus",
            Self::SendFeedback { .. } => "sendFeedback",
        }
    }
}

/// Value a circuit returns to its caller.
///
/// Carried on the transaction so the ledger can reject it when re-execution
/// against current state yields something else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum CircuitOutput {
    ReportId(u64),
    Report(Report),
    Unit,
}

/// Contract state as published by the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportLedger {
    pub reports_count: u64,
    #[serde(default)]
    pub reports: BTreeMap<u64, Report>,
}

impl ReportLedger {
    pub fn report(&self, report_id: u64) -> Option<&Report> {
        self.reports.get(&report_id)
    }

    /// Run `call` on behalf of `informer`, mutating state on success only.
    pub fn execute(&mut self, call: &Circuit, informer: &str) -> Result<CircuitOutput, ContractError> {
        match call {
            Circuit::SubmitReport {
                institution_name,
                report_details,
                institution_type,
                timestamp,
            } => {
                non_blank(institution_name, "institution_name")?;
                non_blank(report_details, "report_details")?;

                let report_id = self.reports_count.checked_add(1).ok_or_else(|| {
                    ContractError::StateQuery("report counter is exhausted".to_string())
                })?;
                self.reports.insert(
                    report_id,
                    Report {
                        report_id,
                        institution_name: institution_name.clone(),
                        report_details: report_details.clone(),
                        institution_type: *institution_type,
                        timestamp: *timestamp,
                        informer: informer.to_string(),
                        status: INITIAL_STATUS.to_string(),
                        feedback: Vec::new(),
                    },
                );
                self.reports_count = report_id;
                Ok(CircuitOutput::ReportId(report_id))
            }
            Circuit::GetReport { report_id } => self
                .report(*report_id)
                .cloned()
                .map(CircuitOutput::Report)
                .ok_or(ContractError::ReportNotFound(*report_id)),
            Circuit::UpdateCaseStatus {
                report_id,
                new_status,
            } => {
                non_blank(new_status, "new_status")?;
                let report = self.report_mut(*report_id)?;
                report.status = new_status.trim().to_string();
                Ok(CircuitOutput::Unit)
            }
            Circuit::SendFeedback { report_id, message } => {
                non_blank(message, "feedback_message")?;
                let report = self.report_mut(*report_id)?;
                report.feedback.push(message.clone());
                Ok(CircuitOutput::Unit)
            }
        }
    }

    fn report_mut(&mut self, report_id: u64) -> Result<&mut Report, ContractError> {
        self.reports
            .get_mut(&report_id)
            .ok_or(ContractError::ReportNotFound(report_id))
    }
}

fn non_blank(value: &str, name: &'static str) -> Result<(), ContractError> {
    if value.trim().is_empty() {
        return Err(ContractError::InvalidArgument {
            name,
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}
