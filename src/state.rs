// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::sync::RwLock;

use crate::{
    config::DEFAULT_DEPLOYMENT_FILE, contract::ReportContract, error::ApiError,
    wallet::WalletSession,
};

/// Lifecycle of a handle produced by the initialization sequencer.
#[derive(Clone)]
pub enum Lifecycle<T> {
    Uninitialized,
    Ready(T),
    Failed(String),
}

impl<T> Lifecycle<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    fn not_ready_message(&self, what: &str) -> String {
        match self {
            Self::Failed(reason) => format!("{what} not initialized: {reason}"),
            _ => format!("{what} not initialized"),
        }
    }
}

impl<T> Default for Lifecycle<T> {
    fn default() -> Self {
        Self::Uninitialized
    }
}

/// Application context shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    wallet: Arc<RwLock<Lifecycle<WalletSession>>>,
    contract: Arc<RwLock<Lifecycle<Arc<dyn ReportContract>>>>,
    deployment_file: Arc<PathBuf>,
}

impl AppState {
    pub fn new(deployment_file: impl Into<PathBuf>) -> Self {
        Self {
            wallet: Arc::default(),
            contract: Arc::default(),
            deployment_file: Arc::new(deployment_file.into()),
        }
    }

    pub fn deployment_file(&self) -> &Path {
        &self.deployment_file
    }

    /// The wallet session, or a 500 describing why it is unavailable.
    pub async fn wallet(&self) -> Result<WalletSession, ApiError> {
        let wallet = self.wallet.read().await;
        wallet
            .ready()
            .cloned()
            .ok_or_else(|| ApiError::internal(wallet.not_ready_message("Wallet")))
    }

    /// The deployed contract handle, or a 500 describing why it is unavailable.
    pub async fn contract(&self) -> Result<Arc<dyn ReportContract>, ApiError> {
        let contract = self.contract.read().await;
        contract
            .ready()
            .cloned()
            .ok_or_else(|| ApiError::internal(contract.not_ready_message("Contract")))
    }

    pub async fn wallet_connected(&self) -> bool {
        self.wallet.read().await.is_ready()
    }

    pub async fn contract_initialized(&self) -> bool {
        self.contract.read().await.is_ready()
    }

    pub async fn set_wallet(&self, wallet: Lifecycle<WalletSession>) {
        *self.wallet.write().await = wallet;
    }

    pub async fn set_contract(&self, contract: Lifecycle<Arc<dyn ReportContract>>) {
        *self.contract.write().await = contract;
    }

    /// Mark every handle still waiting on initialization as failed.
    pub async fn fail_pending(&self, reason: &str) {
        let mut wallet = self.wallet.write().await;
        if matches!(*wallet, Lifecycle::Uninitialized) {
            *wallet = Lifecycle::Failed(reason.to_string());
        }
        drop(wallet);

        let mut contract = self.contract.write().await;
        if matches!(*contract, Lifecycle::Uninitialized) {
            *contract = Lifecycle::Failed(reason.to_string());
        }
    }

    /// Close the wallet session, if one was established.
    pub async fn close_wallet(&self) {
        let session = self.wallet.read().await.ready().cloned();
        if let Some(session) = session {
            session.close().await;
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_DEPLOYMENT_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fresh_state_reports_not_initialized() {
        let state = AppState::default();
        assert!(!state.wallet_connected().await);
        assert!(!state.contract_initialized().await);

        let err = state.contract().await.err().unwrap();
        assert_eq!(err.message, "Contract not initialized");
        let err = state.wallet().await.err().unwrap();
        assert_eq!(err.message, "Wallet not initialized");
    }

    #[tokio::test]
    async fn fail_pending_records_the_reason() {
        let state = AppState::default();
        state.fail_pending("no deployment.json").await;

        let err = state.contract().await.err().unwrap();
        assert_eq!(err.message, "Contract not initialized: no deployment.json");
        assert!(!state.contract_initialized().await);
    }

    #[test]
    fn lifecycle_accessors() {
        let ready: Lifecycle<u8> = Lifecycle::Ready(1);
        assert!(ready.is_ready());
        assert_eq!(ready.ready(), Some(&1));

        let failed: Lifecycle<u8> = Lifecycle::Failed("x".into());
        assert!(!failed.is_ready());
        assert_eq!(failed.ready(), None);
        assert!(matches!(Lifecycle::<u8>::default(), Lifecycle::Uninitialized));
    }
}
