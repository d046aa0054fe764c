// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet-backed transaction provider used by deployed contract handles.

use tracing::debug;

use super::{CoinInfo, Transaction, TxId, WalletError, WalletSession, WalletState};

/// A transaction the wallet has balanced and proven, ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalancedTx(Transaction);

impl BalancedTx {
    pub fn transaction(&self) -> &Transaction {
        &self.0
    }

    pub fn into_inner(self) -> Transaction {
        self.0
    }
}

/// Balances, proves and submits contract call transactions through a session.
#[derive(Clone)]
pub struct WalletTxProvider {
    session: WalletSession,
    coin_public_key: String,
    encryption_public_key: String,
}

impl WalletTxProvider {
    /// Bind to `session` using the keys from its synced state.
    pub fn new(session: WalletSession, synced: &WalletState) -> Self {
        Self {
            session,
            coin_public_key: synced.coin_public_key.clone(),
            encryption_public_key: synced.encryption_public_key.clone(),
        }
    }

    pub fn coin_public_key(&self) -> &str {
        &self.coin_public_key
    }

    pub fn encryption_public_key(&self) -> &str {
        &self.encryption_public_key
    }

    /// Balance then prove `tx`.
    pub async fn balance_tx(
        &self,
        tx: Transaction,
        new_coins: Vec<CoinInfo>,
    ) -> Result<BalancedTx, WalletError> {
        let service = self.session.service();

        let balanced = service.balance_transaction(tx, new_coins).await?;
        if !balanced.is_balanced() {
            return Err(WalletError::TransactionRejected(
                "wallet returned an unbalanced transaction".to_string(),
            ));
        }

        let proven = service.prove_transaction(balanced).await?;
        if !proven.is_proven() {
            return Err(WalletError::TransactionRejected(
                "wallet returned an unproven transaction".to_string(),
            ));
        }

        debug!(
            contract_address = %proven.contract_address,
            fee = ?proven.fee,
            "Transaction balanced and proven"
        );
        Ok(BalancedTx(proven))
    }

    pub async fn submit_tx(&self, tx: BalancedTx) -> Result<TxId, WalletError> {
        self.session
            .service()
            .submit_transaction(tx.into_inner())
            .await
    }
}
