// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP client for an external wallet service.
//!
//! ## Protocol
//!
//! | Operation | Request |
//! |-----------|---------|
//! | build from seed | `POST /wallets` → `{walletId}` |
//! | start | `POST /wallets/{id}/start` |
//! | state | `GET /wallets/{id}/state` → [`WalletState`] |
//! | balance | `POST /wallets/{id}/balance` `{tx, newCoins}` → tx |
//! | prove | `POST /wallets/{id}/prove` `{tx}` → tx |
//! | submit | `POST /wallets/{id}/submit` `{tx}` → `{txId}` |
//! | close | `DELETE /wallets/{id}` |
//!
//! After `start`, a background task polls the state endpoint and publishes
//! every snapshot on a `watch` channel until the session is closed.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use super::{CoinInfo, Transaction, TxId, WalletError, WalletService, WalletState};
use crate::config::NetworkConfig;

/// Interval between state polls while the session is open.
const STATE_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Per-request timeout. Proving can be slow, so this is generous.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BuildRequest<'a> {
    indexer: &'a str,
    indexer_ws: &'a str,
    proof_server: &'a str,
    node: &'a str,
    seed: &'a str,
    network_id: &'a str,
    log_level: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuildResponse {
    wallet_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BalanceRequest<'a> {
    tx: &'a Transaction,
    new_coins: &'a [CoinInfo],
}

#[derive(Serialize)]
struct TxRequest<'a> {
    tx: &'a Transaction,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitResponse {
    tx_id: String,
}

/// Wallet session hosted by an external wallet service.
pub struct RemoteWallet {
    client: Client,
    base: Url,
    wallet_id: String,
    states: Arc<watch::Sender<WalletState>>,
    shutdown: CancellationToken,
}

impl RemoteWallet {
    /// Ask the wallet service at `service_url` to build a wallet from `seed`.
    pub async fn build_from_seed(
        service_url: &Url,
        network: &NetworkConfig,
        seed: &str,
        log_level: &str,
    ) -> Result<Self, WalletError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| WalletError::Transport(e.to_string()))?;
        let base = service_url.clone();

        let request = BuildRequest {
            indexer: network.indexer.as_str(),
            indexer_ws: network.indexer_ws.as_str(),
            proof_server: network.proof_server.as_str(),
            node: network.node.as_str(),
            seed,
            network_id: &network.name,
            log_level,
        };
        let response = client
            .post(endpoint(&base, "wallets")?)
            .json(&request)
            .send()
            .await
            .map_err(transport)?;
        let built: BuildResponse = decode(response).await?;

        info!(
            wallet_service = %base,
            wallet_id = %built.wallet_id,
            network = %network.name,
            "Wallet built from seed"
        );

        let (states, _) = watch::channel(WalletState::default());
        Ok(Self {
            client,
            base,
            wallet_id: built.wallet_id,
            states: Arc::new(states),
            shutdown: CancellationToken::new(),
        })
    }

    pub fn wallet_id(&self) -> &str {
        &self.wallet_id
    }

    fn wallet_endpoint(&self, action: &str) -> Result<Url, WalletError> {
        let path = if action.is_empty() {
            format!("wallets/{}", self.wallet_id)
        } else {
            format!("wallets/{}/{action}", self.wallet_id)
        };
        endpoint(&self.base, &path)
    }

    async fn post_tx<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        action: &str,
        body: &B,
    ) -> Result<T, WalletError> {
        let response = self
            .client
            .post(self.wallet_endpoint(action)?)
            .json(body)
            .send()
            .await
            .map_err(transport)?;
        decode(response).await
    }
}

#[async_trait]
impl WalletService for RemoteWallet {
    async fn start(&self) -> Result<(), WalletError> {
        let response = self
            .client
            .post(self.wallet_endpoint("start")?)
            .send()
            .await
            .map_err(transport)?;
        ensure_success(response).await?;

        let poller = StatePoller {
            client: self.client.clone(),
            url: self.wallet_endpoint("state")?,
            states: Arc::clone(&self.states),
        };
        tokio::spawn(poller.run(self.shutdown.clone()));
        Ok(())
    }

    fn state(&self) -> watch::Receiver<WalletState> {
        self.states.subscribe()
    }

    async fn balance_transaction(
        &self,
        tx: Transaction,
        new_coins: Vec<CoinInfo>,
    ) -> Result<Transaction, WalletError> {
        self.post_tx(
            "balance",
            &BalanceRequest {
                tx: &tx,
                new_coins: &new_coins,
            },
        )
        .await
    }

    async fn prove_transaction(&self, tx: Transaction) -> Result<Transaction, WalletError> {
        self.post_tx("prove", &TxRequest { tx: &tx }).await
    }

    async fn submit_transaction(&self, tx: Transaction) -> Result<TxId, WalletError> {
        let submitted: SubmitResponse = self.post_tx("submit", &TxRequest { tx: &tx }).await?;
        Ok(submitted.tx_id)
    }

    async fn close(&self) -> Result<(), WalletError> {
        self.shutdown.cancel();
        let response = self
            .client
            .delete(self.wallet_endpoint("")?)
            .send()
            .await
            .map_err(transport)?;
        ensure_success(response).await?;
        info!(wallet_id = %self.wallet_id, "Wallet session closed");
        Ok(())
    }
}

/// Background task mirroring service-side wallet state into the watch channel.
struct StatePoller {
    client: Client,
    url: Url,
    states: Arc<watch::Sender<WalletState>>,
}

impl StatePoller {
    async fn run(self, shutdown: CancellationToken) {
        debug!(url = %self.url, "Wallet state poller starting");

        loop {
            if shutdown.is_cancelled() {
                break;
            }

            match self.fetch().await {
                Ok(state) => {
                    if let Some(progress) = &state.sync_progress {
                        debug!(synced = progress.synced, lag = ?progress.lag, "Wallet sync progress");
                    }
                    self.states.send_replace(state);
                }
                Err(e) => warn!(error = %e, "Failed to poll wallet state, will retry"),
            }

            tokio::select! {
                _ = tokio::time::sleep(STATE_POLL_INTERVAL) => {},
                _ = shutdown.cancelled() => break,
            }
        }

        debug!("Wallet state poller shutting down");
    }

    async fn fetch(&self) -> Result<WalletState, WalletError> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(transport)?;
        decode(response).await
    }
}

/// Join `path` onto `base`, treating `base` as a directory.
fn endpoint(base: &Url, path: &str) -> Result<Url, WalletError> {
    let mut root = base.clone();
    if !root.path().ends_with('/') {
        let with_slash = format!("{}/", root.path());
        root.set_path(&with_slash);
    }
    root.join(path)
        .map_err(|e| WalletError::Transport(format!("invalid wallet service URL: {e}")))
}

fn transport(e: reqwest::Error) -> WalletError {
    WalletError::Transport(e.to_string())
}

async fn ensure_success(response: Response) -> Result<Response, WalletError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(WalletError::Rejected {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, WalletError> {
    ensure_success(response)
        .await?
        .json()
        .await
        .map_err(|e| WalletError::Transport(format!("unexpected wallet service response: {e}")))
}
