// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet session handle.
//!
//! Key management, coin selection and proving live in an external wallet
//! service. This module defines the call contract for that service
//! ([`WalletService`]) and the process-wide [`WalletSession`] that wraps one
//! started service instance.
//!
//! - [`remote`] talks to a wallet service over HTTP
//! - [`provider`] adapts a session into the transaction provider used by
//!   contract calls

pub mod provider;
pub mod remote;

use std::{collections::BTreeMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::contract::ledger::{Circuit, CircuitOutput};

pub use provider::{BalancedTx, WalletTxProvider};
pub use remote::RemoteWallet;

/// Token id of the network's native token.
pub const NATIVE_TOKEN: &str =
    "02000000000000000000000000000000000000000000000000000000000000000000";

/// Identifier of a submitted transaction.
pub type TxId = String;

/// Synchronization progress reported by the wallet service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncProgress {
    pub synced: bool,
    /// Blocks still to apply, when the service reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lag: Option<u64>,
}

/// Snapshot of a wallet as observed through the state stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletState {
    pub address: String,
    pub coin_public_key: String,
    pub encryption_public_key: String,
    /// Token id to amount in the token's smallest unit.
    #[serde(default)]
    pub balances: BTreeMap<String, u128>,
    #[serde(default)]
    pub sync_progress: Option<SyncProgress>,
}

impl WalletState {
    pub fn is_synced(&self) -> bool {
        self.sync_progress.as_ref().is_some_and(|p| p.synced)
    }

    pub fn native_balance(&self) -> u128 {
        self.balances.get(NATIVE_TOKEN).copied().unwrap_or(0)
    }
}

/// Coin created by a transaction that the wallet must account for while balancing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinInfo {
    pub token_type: String,
    pub value: u128,
}

/// A contract call transaction as it moves through balance, prove and submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub contract_address: String,
    pub private_state_id: String,
    /// Commitment identifying the caller without revealing the wallet.
    pub informer: String,
    pub call: Circuit,
    /// Output of the call as executed locally; the ledger rejects the
    /// transaction if applying it yields a different one.
    pub output: CircuitOutput,
    /// Fee paid in native token; set by balancing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<u128>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub new_coins: Vec<CoinInfo>,
    /// Set by proving.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<String>,
}

impl Transaction {
    pub fn call(
        contract_address: impl Into<String>,
        private_state_id: impl Into<String>,
        informer: impl Into<String>,
        call: Circuit,
        output: CircuitOutput,
    ) -> Self {
        Self {
            contract_address: contract_address.into(),
            private_state_id: private_state_id.into(),
            informer: informer.into(),
            call,
            output,
            fee: None,
            new_coins: Vec::new(),
            proof: None,
        }
    }

    pub fn is_balanced(&self) -> bool {
        self.fee.is_some()
    }

    pub fn is_proven(&self) -> bool {
        self.proof.is_some()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error("Wallet service unreachable: {0}")]
    Transport(String),

    #[error("Wallet service returned {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Wallet did not synchronize within {0:?}")]
    SyncTimeout(Duration),

    #[error("Wallet sync wait was cancelled")]
    Cancelled,

    #[error("Wallet session is closed")]
    Closed,

    #[error("Transaction rejected: {0}")]
    TransactionRejected(String),
}

/// Call contract of an external wallet service instance.
#[async_trait]
pub trait WalletService: Send + Sync {
    /// Begin synchronizing with the network.
    async fn start(&self) -> Result<(), WalletError>;

    /// Subscribe to state changes. The current value is available immediately.
    fn state(&self) -> watch::Receiver<WalletState>;

    async fn balance_transaction(
        &self,
        tx: Transaction,
        new_coins: Vec<CoinInfo>,
    ) -> Result<Transaction, WalletError>;

    async fn prove_transaction(&self, tx: Transaction) -> Result<Transaction, WalletError>;

    async fn submit_transaction(&self, tx: Transaction) -> Result<TxId, WalletError>;

    /// Stop synchronizing and release the service-side session.
    async fn close(&self) -> Result<(), WalletError>;
}

/// A started wallet service shared by every request handler.
#[derive(Clone)]
pub struct WalletSession {
    service: Arc<dyn WalletService>,
}

impl WalletSession {
    /// Start the service and wrap it.
    pub async fn start(service: Arc<dyn WalletService>) -> Result<Self, WalletError> {
        service.start().await?;
        Ok(Self { service })
    }

    pub fn service(&self) -> &Arc<dyn WalletService> {
        &self.service
    }

    pub fn current_state(&self) -> WalletState {
        self.service.state().borrow().clone()
    }

    pub fn address(&self) -> String {
        self.service.state().borrow().address.clone()
    }

    /// Wait for the first state reporting a completed sync.
    ///
    /// Gives up after `timeout`, or as soon as `cancel` fires.
    pub async fn wait_for_sync(
        &self,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<WalletState, WalletError> {
        let mut states = self.service.state();
        let synced = async {
            states
                .wait_for(WalletState::is_synced)
                .await
                .map(|state| state.clone())
                .map_err(|_| WalletError::Closed)
        };

        tokio::select! {
            result = tokio::time::timeout(timeout, synced) => {
                result.unwrap_or(Err(WalletError::SyncTimeout(timeout)))
            }
            _ = cancel.cancelled() => Err(WalletError::Cancelled),
        }
    }

    pub async fn close(&self) {
        if let Err(e) = self.service.close().await {
            tracing::warn!(error = %e, "Failed to close wallet session");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devnet::Devnet;

    const SEED: &str = "00000000000000000000000000000000000000000000000000000000000000aa";

    #[test]
    fn native_balance_defaults_to_zero() {
        let mut state = WalletState::default();
        assert_eq!(state.native_balance(), 0);
        assert!(!state.is_synced());

        state.balances.insert(NATIVE_TOKEN.to_string(), 42);
        state.sync_progress = Some(SyncProgress {
            synced: true,
            lag: None,
        });
        assert_eq!(state.native_balance(), 42);
        assert!(state.is_synced());
    }

    #[test]
    fn wallet_state_accepts_service_json() {
        let json = format!(
            r#"{{"address":"addr","coinPublicKey":"cpk","encryptionPublicKey":"epk",
               "balances":{{"{NATIVE_TOKEN}":1000}},"syncProgress":{{"synced":true,"lag":0}}}}"#
        );
        let state: WalletState = serde_json::from_str(&json).unwrap();
        assert_eq!(state.address, "addr");
        assert_eq!(state.native_balance(), 1000);
        assert!(state.is_synced());
    }

    #[tokio::test]
    async fn wait_for_sync_returns_synced_state() {
        let devnet = Devnet::new();
        let session = WalletSession::start(Arc::new(devnet.wallet(SEED)))
            .await
            .unwrap();

        let state = session
            .wait_for_sync(Duration::from_secs(5), &CancellationToken::new())
            .await
            .unwrap();
        assert!(state.is_synced());
        assert_eq!(state.address, session.address());
    }

    #[tokio::test]
    async fn wait_for_sync_times_out() {
        let devnet = Devnet::new();
        let session = WalletSession::start(Arc::new(devnet.wallet(SEED).stalled()))
            .await
            .unwrap();

        let err = session
            .wait_for_sync(Duration::from_millis(50), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::SyncTimeout(_)));
    }

    #[tokio::test]
    async fn wait_for_sync_honours_cancellation() {
        let devnet = Devnet::new();
        let session = WalletSession::start(Arc::new(devnet.wallet(SEED).stalled()))
            .await
            .unwrap();

        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = session
            .wait_for_sync(Duration::from_secs(60), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::Cancelled));
    }
}
