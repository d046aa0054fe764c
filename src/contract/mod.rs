// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Deployed contract handle.
//!
//! The reporting contract is bound at compile time: [`ContractBinding`] maps a
//! configured contract name to a known implementation of [`ReportContract`]
//! instead of loading generated code from a path at runtime.
//!
//! - [`ledger`] - public ledger state and circuit semantics
//! - [`public_data`] - contract state queries (indexer)
//! - [`compliants`] - the `compliants` contract binding

pub mod compliants;
pub mod ledger;
pub mod public_data;

use std::{str::FromStr, sync::Arc};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::wallet::{TxId, WalletError, WalletTxProvider};

pub use compliants::{find_deployed_contract, DeployedCompliants};
pub use public_data::{IndexerClient, PublicDataProvider};

/// Kind of institution a report concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum InstitutionType {
    Public,
    Private,
}

impl InstitutionType {
    /// Ledger enum index.
    pub fn from_index(index: u64) -> Option<Self> {
        match index {
            0 => Some(Self::Public),
            1 => Some(Self::Private),
            _ => None,
        }
    }
}

impl FromStr for InstitutionType {
    type Err = ContractError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "PUBLIC" => Ok(Self::Public),
            "PRIVATE" => Ok(Self::Private),
            other => Err(ContractError::InvalidArgument {
                name: "institution_type",
                reason: format!("`{other}` is not PUBLIC or PRIVATE"),
            }),
        }
    }
}

/// Institution type as sent by clients: the variant name or its ledger index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum InstitutionTypeArg {
    Index(u64),
    Name(String),
}

impl TryFrom<InstitutionTypeArg> for InstitutionType {
    type Error = ContractError;

    fn try_from(arg: InstitutionTypeArg) -> Result<Self, Self::Error> {
        match arg {
            InstitutionTypeArg::Name(name) => name.parse(),
            InstitutionTypeArg::Index(index) => {
                Self::from_index(index).ok_or_else(|| ContractError::InvalidArgument {
                    name: "institution_type",
                    reason: format!("{index} is not a valid institution type index"),
                })
            }
        }
    }
}

/// A report as recorded in contract state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Report {
    pub report_id: u64,
    pub institution_name: String,
    pub report_details: String,
    pub institution_type: InstitutionType,
    /// Unix seconds.
    pub timestamp: u64,
    /// Commitment of the filing party.
    pub informer: String,
    pub status: String,
    #[serde(default)]
    pub feedback: Vec<String>,
}

/// Arguments for a new report; presence is checked by the contract call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitReportArgs {
    pub institution_name: Option<String>,
    pub report_details: Option<String>,
    pub institution_type: Option<InstitutionTypeArg>,
    /// Unix seconds; `None` or `0` means now.
    pub timestamp: Option<u64>,
}

/// Result of a state-changing contract call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOutcome {
    pub tx_id: TxId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedReport {
    pub tx_id: TxId,
    pub report_id: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error("Missing required argument: {0}")]
    MissingArgument(&'static str),

    #[error("Invalid {name}: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    #[error("Report {0} not found")]
    ReportNotFound(u64),

    #[error("No contract deployed at {0}")]
    NotDeployed(String),

    #[error("Unknown contract `{0}`")]
    UnknownBinding(String),

    #[error("Contract state query failed: {0}")]
    StateQuery(String),

    #[error(transparent)]
    Wallet(#[from] WalletError),
}

/// Unwrap a request argument or report it as missing.
pub fn required<T>(value: Option<T>, name: &'static str) -> Result<T, ContractError> {
    value.ok_or(ContractError::MissingArgument(name))
}

/// Call surface of the deployed reporting contract.
#[async_trait]
pub trait ReportContract: Send + Sync {
    fn address(&self) -> &str;

    async fn submit_report(&self, args: SubmitReportArgs) -> Result<SubmittedReport, ContractError>;

    async fn get_report(&self, report_id: u64) -> Result<Report, ContractError>;

    async fn update_case_status(
        &self,
        report_id: u64,
        new_status: &str,
    ) -> Result<CallOutcome, ContractError>;

    async fn send_feedback(&self, report_id: u64, message: &str)
        -> Result<CallOutcome, ContractError>;
}

/// Providers a contract handle needs: a transaction path and a state source.
#[derive(Clone)]
pub struct ContractProviders {
    pub tx: WalletTxProvider,
    pub public_data: Arc<dyn PublicDataProvider>,
}

/// Contracts this build knows how to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractBinding {
    Compliants,
}

impl ContractBinding {
    pub fn from_name(name: &str) -> Result<Self, ContractError> {
        match name.trim() {
            compliants::CONTRACT_NAME => Ok(Self::Compliants),
            other => Err(ContractError::UnknownBinding(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Compliants => compliants::CONTRACT_NAME,
        }
    }

    pub fn private_state_id(&self) -> &'static str {
        match self {
            Self::Compliants => compliants::PRIVATE_STATE_ID,
        }
    }

    /// Attach to the deployed instance at `address`.
    ///
    /// `secret_key` feeds the contract's informer witness.
    pub async fn attach(
        &self,
        providers: ContractProviders,
        address: &str,
        secret_key: &str,
    ) -> Result<Arc<dyn ReportContract>, ContractError> {
        match self {
            Self::Compliants => {
                let informer = compliants::informer_commitment(secret_key);
                let deployed = find_deployed_contract(
                    providers,
                    address,
                    self.private_state_id(),
                    informer,
                )
                .await?;
                Ok(Arc::new(deployed))
            }
        }
    }
}
