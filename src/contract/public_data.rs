// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Contract state queries.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;

use super::{ledger::ReportLedger, ContractError};

const CONTRACT_STATE_QUERY: &str =
    "query ($address: HexEncoded!) { contractAction(address: $address) { state } }";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Source of published contract state.
#[async_trait]
pub trait PublicDataProvider: Send + Sync {
    /// Latest state of the contract at `address`, or `None` if nothing is deployed there.
    async fn query_contract_state(&self, address: &str)
        -> Result<Option<ReportLedger>, ContractError>;
}

/// GraphQL client for the indexer.
#[derive(Debug, Clone)]
pub struct IndexerClient {
    client: reqwest::Client,
    endpoint: Url,
}

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: serde_json::Value,
}

#[derive(Deserialize)]
struct GraphQlResponse {
    data: Option<ContractActionData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContractActionData {
    contract_action: Option<ContractAction>,
}

#[derive(Deserialize)]
struct ContractAction {
    state: ReportLedger,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

impl IndexerClient {
    pub fn new(endpoint: Url) -> Result<Self, ContractError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ContractError::StateQuery(e.to_string()))?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl PublicDataProvider for IndexerClient {
    async fn query_contract_state(
        &self,
        address: &str,
    ) -> Result<Option<ReportLedger>, ContractError> {
        let request = GraphQlRequest {
            query: CONTRACT_STATE_QUERY,
            variables: json!({ "address": address }),
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| ContractError::StateQuery(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContractError::StateQuery(format!(
                "indexer returned {status}"
            )));
        }

        let body: GraphQlResponse = response
            .json()
            .await
            .map_err(|e| ContractError::StateQuery(e.to_string()))?;
        into_state(body)
    }
}

fn into_state(body: GraphQlResponse) -> Result<Option<ReportLedger>, ContractError> {
    if !body.errors.is_empty() {
        let messages: Vec<String> = body.errors.into_iter().map(|e| e.message).collect();
        return Err(ContractError::StateQuery(messages.join("; ")));
    }
    Ok(body
        .data
        .and_then(|data| data.contract_action)
        .map(|action| action.state))
}
