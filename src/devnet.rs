// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # In-Process Devnet
//!
//! A single-process stand-in for the ledger, indexer and wallet service,
//! selected with `LEDGER_BACKEND=simulated`. It applies contract calls with
//! the same circuit semantics as the real contract but performs no proving
//! and holds no real keys. Useful for local front-end work and tests.

use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    contract::{compliants::commitment, ledger::ReportLedger, ContractError, PublicDataProvider},
    wallet::{
        CoinInfo, SyncProgress, Transaction, TxId, WalletError, WalletService, WalletState,
        NATIVE_TOKEN,
    },
};

/// Native balance every devnet wallet starts with.
pub const DEVNET_FUNDING: u128 = 1_000_000_000;

/// Flat fee charged per transaction.
pub const DEVNET_FEE: u128 = 1_000;

const DEFAULT_SYNC_DELAY: Duration = Duration::from_millis(10);

/// Shared ledger state of the devnet.
#[derive(Default)]
pub struct Devnet {
    contracts: Mutex<HashMap<String, ReportLedger>>,
}

impl Devnet {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Deploy an empty contract at `address` (no-op if already present).
    pub async fn deploy(&self, address: &str) {
        let mut contracts = self.contracts.lock().await;
        if !contracts.contains_key(address) {
            contracts.insert(address.to_string(), ReportLedger::default());
            info!(contract_address = %address, "Devnet contract deployed");
        }
    }

    pub async fn contract_state(&self, address: &str) -> Option<ReportLedger> {
        self.contracts.lock().await.get(address).cloned()
    }

    /// Build a wallet whose identity is derived from `seed`.
    pub fn wallet(self: &Arc<Self>, seed: &str) -> SimulatedWallet {
        SimulatedWallet::new(Arc::clone(self), seed)
    }

    async fn apply(&self, tx: &Transaction) -> Result<TxId, WalletError> {
        let mut contracts = self.contracts.lock().await;
        let ledger = contracts.get_mut(&tx.contract_address).ok_or_else(|| {
            WalletError::TransactionRejected(format!(
                "no contract deployed at {}",
                tx.contract_address
            ))
        })?;

        // Apply to a copy so a failing circuit leaves state untouched.
        let mut next = ledger.clone();
        let output = next
            .execute(&tx.call, &tx.informer)
            .map_err(|e| WalletError::TransactionRejected(e.to_string()))?;
        if output != tx.output {
            return Err(WalletError::TransactionRejected(format!(
                "contract state changed since the {} call was built",
                tx.call.name()
            )));
        }
        *ledger = next;

        Ok(Uuid::new_v4().simple().to_string())
    }
}

#[async_trait]
impl PublicDataProvider for Devnet {
    async fn query_contract_state(
        &self,
        address: &str,
    ) -> Result<Option<ReportLedger>, ContractError> {
        Ok(self.contract_state(address).await)
    }
}

/// Wallet bound to a [`Devnet`].
pub struct SimulatedWallet {
    devnet: Arc<Devnet>,
    states: Arc<watch::Sender<WalletState>>,
    sync_delay: Option<Duration>,
}

impl SimulatedWallet {
    fn new(devnet: Arc<Devnet>, seed: &str) -> Self {
        let mut balances = std::collections::BTreeMap::new();
        balances.insert(NATIVE_TOKEN.to_string(), DEVNET_FUNDING);

        let state = WalletState {
            address: commitment(b"devnet:address:", seed),
            coin_public_key: commitment(b"devnet:coin:", seed),
            encryption_public_key: commitment(b"devnet:encryption:", seed),
            balances,
            sync_progress: Some(SyncProgress {
                synced: false,
                lag: Some(1),
            }),
        };
        let (states, _) = watch::channel(state);

        Self {
            devnet,
            states: Arc::new(states),
            sync_delay: Some(DEFAULT_SYNC_DELAY),
        }
    }

    /// Never report a completed sync.
    pub fn stalled(mut self) -> Self {
        self.sync_delay = None;
        self
    }

    fn ensure_synced(&self) -> Result<(), WalletError> {
        if self.states.borrow().is_synced() {
            Ok(())
        } else {
            Err(WalletError::TransactionRejected(
                "wallet is not synchronized".to_string(),
            ))
        }
    }
}

#[async_trait]
impl WalletService for SimulatedWallet {
    async fn start(&self) -> Result<(), WalletError> {
        let Some(delay) = self.sync_delay else {
            debug!("Devnet wallet started in stalled mode");
            return Ok(());
        };

        let states = Arc::clone(&self.states);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            states.send_modify(|state| {
                state.sync_progress = Some(SyncProgress {
                    synced: true,
                    lag: Some(0),
                });
            });
        });
        Ok(())
    }

    fn state(&self) -> watch::Receiver<WalletState> {
        self.states.subscribe()
    }

    async fn balance_transaction(
        &self,
        mut tx: Transaction,
        new_coins: Vec<CoinInfo>,
    ) -> Result<Transaction, WalletError> {
        self.ensure_synced()?;
        if self.states.borrow().native_balance() < DEVNET_FEE {
            return Err(WalletError::TransactionRejected(
                "insufficient funds for fee".to_string(),
            ));
        }
        tx.fee = Some(DEVNET_FEE);
        tx.new_coins = new_coins;
        Ok(tx)
    }

    async fn prove_transaction(&self, mut tx: Transaction) -> Result<Transaction, WalletError> {
        if !tx.is_balanced() {
            return Err(WalletError::TransactionRejected(
                "transaction is not balanced".to_string(),
            ));
        }
        let payload = serde_json::to_string(&tx)
            .map_err(|e| WalletError::TransactionRejected(e.to_string()))?;
        tx.proof = Some(commitment(b"devnet:proof:", &payload));
        Ok(tx)
    }

    async fn submit_transaction(&self, tx: Transaction) -> Result<TxId, WalletError> {
        self.ensure_synced()?;
        if !tx.is_proven() {
            return Err(WalletError::TransactionRejected(
                "transaction is not proven".to_string(),
            ));
        }
        let fee = tx.fee.unwrap_or(0);
        let tx_id = self.devnet.apply(&tx).await?;

        self.states.send_modify(|state| {
            let balance = state.balances.entry(NATIVE_TOKEN.to_string()).or_insert(0);
            *balance = balance.saturating_sub(fee);
        });
        debug!(tx_id = %tx_id, circuit = tx.call.name(), "Devnet transaction applied");
        Ok(tx_id)
    }

    async fn close(&self) -> Result<(), WalletError> {
        Ok(())
    }
}
