// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Initialization Sequencer
//!
//! One-shot startup procedure that produces the wallet session and the
//! deployed contract handle:
//!
//! 1. Validate configuration
//! 2. Load the deployment descriptor (missing file disables contract endpoints)
//! 3. Build the wallet session from the seed and start it
//! 4. Wait for the wallet to synchronize, bounded by a timeout
//! 5. Resolve the contract binding and build the wallet-backed tx provider
//! 6. Attach to the deployed contract
//!
//! Any failure is logged and recorded in [`AppState`]; the server keeps
//! serving with the affected endpoints reporting "not initialized". Nothing
//! is retried.

use std::{path::PathBuf, sync::Arc};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::{
    config::{ConfigError, InitConfig, LedgerBackend},
    contract::{ContractBinding, ContractError, ContractProviders, IndexerClient, PublicDataProvider},
    deployment::{DeploymentDescriptor, DeploymentError},
    devnet::Devnet,
    state::{AppState, Lifecycle},
    wallet::{RemoteWallet, WalletError, WalletService, WalletSession, WalletTxProvider},
};

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("No deployment descriptor found at {0}; deploy the contract first")]
    DeploymentMissing(PathBuf),

    #[error(transparent)]
    Deployment(DeploymentError),

    #[error("Wallet error: {0}")]
    Wallet(#[from] WalletError),

    #[error("Contract error: {0}")]
    Contract(#[from] ContractError),
}

impl From<DeploymentError> for InitError {
    fn from(e: DeploymentError) -> Self {
        match e {
            DeploymentError::Missing(path) => Self::DeploymentMissing(path),
            other => Self::Deployment(other),
        }
    }
}

/// Upstream collaborators the sequencer wires together.
pub struct Backend {
    pub wallet: Arc<dyn WalletService>,
    pub public_data: Arc<dyn PublicDataProvider>,
}

impl Backend {
    /// Build the collaborators selected by `config.backend`.
    pub async fn connect(
        config: &InitConfig,
        descriptor: &DeploymentDescriptor,
    ) -> Result<Self, InitError> {
        match config.backend {
            LedgerBackend::Remote => {
                let wallet = RemoteWallet::build_from_seed(
                    &config.wallet_service,
                    &config.network,
                    &config.wallet_seed,
                    &config.wallet_log_level,
                )
                .await?;
                let indexer = IndexerClient::new(config.network.indexer.clone())?;
                Ok(Self {
                    wallet: Arc::new(wallet),
                    public_data: Arc::new(indexer),
                })
            }
            LedgerBackend::Simulated => {
                let devnet = Devnet::new();
                devnet.deploy(&descriptor.contract_address).await;
                Ok(Self {
                    wallet: Arc::new(devnet.wallet(&config.wallet_seed)),
                    public_data: devnet,
                })
            }
        }
    }
}

/// Run the full sequence, publishing handles into `state` as they become ready.
pub async fn initialize(
    state: &AppState,
    config: &InitConfig,
    shutdown: &CancellationToken,
) -> Result<(), InitError> {
    let descriptor = DeploymentDescriptor::load(&config.deployment_file).await?;
    info!(
        contract_address = %descriptor.contract_address,
        contract_name = ?descriptor.contract_name,
        "Loaded deployment descriptor"
    );

    let backend = Backend::connect(config, &descriptor).await?;
    attach(state, config, &descriptor, backend, shutdown).await
}

/// Start the wallet, wait for sync and attach to the contract.
pub async fn attach(
    state: &AppState,
    config: &InitConfig,
    descriptor: &DeploymentDescriptor,
    backend: Backend,
    shutdown: &CancellationToken,
) -> Result<(), InitError> {
    let session = match WalletSession::start(Arc::clone(&backend.wallet)).await {
        Ok(session) => session,
        Err(e) => {
            if let Err(close) = backend.wallet.close().await {
                warn!(error = %close, "Failed to close wallet after start failure");
            }
            return Err(e.into());
        }
    };
    info!(timeout_secs = config.sync_timeout.as_secs(), "Waiting for wallet sync");

    let synced = match session.wait_for_sync(config.sync_timeout, shutdown).await {
        Ok(synced) => synced,
        Err(e) => {
            session.close().await;
            return Err(e.into());
        }
    };
    info!(wallet_address = %synced.address, "Wallet synchronized");
    state.set_wallet(Lifecycle::Ready(session.clone())).await;

    let binding = ContractBinding::from_name(descriptor.resolved_name(&config.contract_name))?;
    let providers = ContractProviders {
        tx: WalletTxProvider::new(session, &synced),
        public_data: backend.public_data,
    };
    let contract = binding
        .attach(providers, &descriptor.contract_address, &config.wallet_seed)
        .await?;

    state.set_contract(Lifecycle::Ready(contract)).await;
    info!(contract = binding.name(), "Contract and wallet initialized");
    Ok(())
}

/// Validate `config` and run the sequence, recording failures in `state`.
pub async fn run_initialization(
    state: AppState,
    config: Result<InitConfig, ConfigError>,
    shutdown: CancellationToken,
) {
    info!("Initializing contract and wallet");

    let result = match config {
        Ok(config) => initialize(&state, &config, &shutdown).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        error!(error = %e, "Initialization failed; contract endpoints stay disabled");
        state.fail_pending(&e.to_string()).await;
    }
}

pub fn spawn_initialization(
    state: AppState,
    config: Result<InitConfig, ConfigError>,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(run_initialization(state, config, shutdown))
}
