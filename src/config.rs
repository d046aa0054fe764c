// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values and the
//! resolver that turns the process environment into a [`NetworkConfig`] and a
//! [`ServerConfig`]. Resolution is a pure function of a variable lookup so it
//! can be exercised without touching the real process environment.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `WALLET_SEED` | Hex wallet seed (64 characters) | Required |
//! | `CONTRACT_NAME` | Contract binding name | `compliants` |
//! | `NETWORK` | Network identifier (only `testnet`) | `testnet` |
//! | `INDEXER_URL` | Indexer GraphQL endpoint | `http://127.0.0.1:8088/api/v1/graphql` |
//! | `INDEXER_WS_URL` | Indexer GraphQL websocket | `ws://127.0.0.1:8088/api/v1/graphql/ws` |
//! | `PROOF_SERVER_URL` | Proof server | `http://127.0.0.1:6300` |
//! | `NODE_URL` | Node RPC | `http://127.0.0.1:9944` |
//! | `WALLET_SERVICE_URL` | External wallet service | `http://127.0.0.1:8300` |
//! | `WALLET_LOG_LEVEL` | Log level passed to the wallet service | `info` |
//! | `WALLET_SYNC_TIMEOUT_SECS` | Upper bound on the wallet sync wait | `300` |
//! | `LEDGER_BACKEND` | `remote` or `simulated` | `remote` |
//! | `DEPLOYMENT_FILE` | Deployment descriptor path | `deployment.json` |
//! | `WEB_DIR` | Front-end asset directory | `web` |
//! | `CONTRACTS_DIR` | Compiled contract artifacts directory | `contracts` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `3000` |
//! | `TLS_CERT_PATH` / `TLS_KEY_PATH` | PEM files enabling HTTPS | Unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{path::PathBuf, time::Duration};

use url::Url;

pub const WALLET_SEED_ENV: &str = "WALLET_SEED";
pub const CONTRACT_NAME_ENV: &str = "CONTRACT_NAME";
pub const NETWORK_ENV: &str = "NETWORK";
pub const INDEXER_URL_ENV: &str = "INDEXER_URL";
pub const INDEXER_WS_URL_ENV: &str = "INDEXER_WS_URL";
pub const PROOF_SERVER_URL_ENV: &str = "PROOF_SERVER_URL";
pub const NODE_URL_ENV: &str = "NODE_URL";
pub const WALLET_SERVICE_URL_ENV: &str = "WALLET_SERVICE_URL";
pub const WALLET_LOG_LEVEL_ENV: &str = "WALLET_LOG_LEVEL";
pub const WALLET_SYNC_TIMEOUT_ENV: &str = "WALLET_SYNC_TIMEOUT_SECS";
pub const LEDGER_BACKEND_ENV: &str = "LEDGER_BACKEND";
pub const DEPLOYMENT_FILE_ENV: &str = "DEPLOYMENT_FILE";
pub const WEB_DIR_ENV: &str = "WEB_DIR";
pub const CONTRACTS_DIR_ENV: &str = "CONTRACTS_DIR";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_CONTRACT_NAME: &str = "compliants";
pub const DEFAULT_INDEXER_URL: &str = "http://127.0.0.1:8088/api/v1/graphql";
pub const DEFAULT_INDEXER_WS_URL: &str = "ws://127.0.0.1:8088/api/v1/graphql/ws";
pub const DEFAULT_PROOF_SERVER_URL: &str = "http://127.0.0.1:6300";
pub const DEFAULT_NODE_URL: &str = "http://127.0.0.1:9944";
pub const DEFAULT_WALLET_SERVICE_URL: &str = "http://127.0.0.1:8300";
pub const DEFAULT_WALLET_LOG_LEVEL: &str = "info";
pub const DEFAULT_SYNC_TIMEOUT: Duration = Duration::from_secs(300);
pub const DEFAULT_DEPLOYMENT_FILE: &str = "deployment.json";
pub const DEFAULT_PORT: u16 = 3000;

/// Supported network identifier for this build.
pub const NETWORK_TESTNET: &str = "testnet";

/// Errors raised while resolving configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("Only `{NETWORK_TESTNET}` network is supported in this deployment (got `{0}`)")]
    UnsupportedNetwork(String),
}

/// Resolved service endpoints and network identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub indexer: Url,
    pub indexer_ws: Url,
    pub proof_server: Url,
    pub node: Url,
    pub name: String,
}

impl NetworkConfig {
    /// Resolve endpoints from an arbitrary variable lookup.
    pub fn resolve<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let name = non_empty(&lookup, NETWORK_ENV)
            .unwrap_or_else(|| NETWORK_TESTNET.to_string())
            .trim()
            .to_ascii_lowercase();
        if name != NETWORK_TESTNET {
            return Err(ConfigError::UnsupportedNetwork(name));
        }

        Ok(Self {
            indexer: url_var(&lookup, INDEXER_URL_ENV, DEFAULT_INDEXER_URL)?,
            indexer_ws: url_var(&lookup, INDEXER_WS_URL_ENV, DEFAULT_INDEXER_WS_URL)?,
            proof_server: url_var(&lookup, PROOF_SERVER_URL_ENV, DEFAULT_PROOF_SERVER_URL)?,
            node: url_var(&lookup, NODE_URL_ENV, DEFAULT_NODE_URL)?,
            name,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(env_lookup)
    }
}

/// Which ledger/wallet implementation the sequencer wires up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerBackend {
    /// External wallet service + indexer over HTTP.
    Remote,
    /// In-process devnet; nothing leaves the process.
    Simulated,
}

impl std::str::FromStr for LedgerBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "remote" => Ok(Self::Remote),
            "simulated" => Ok(Self::Simulated),
            other => Err(ConfigError::Invalid {
                var: LEDGER_BACKEND_ENV,
                reason: format!("unknown backend `{other}` (expected `remote` or `simulated`)"),
            }),
        }
    }
}

/// Everything the initialization sequencer needs besides the descriptor.
#[derive(Clone, PartialEq, Eq)]
pub struct InitConfig {
    pub network: NetworkConfig,
    pub wallet_seed: String,
    pub contract_name: String,
    pub wallet_service: Url,
    pub wallet_log_level: String,
    pub sync_timeout: Duration,
    pub backend: LedgerBackend,
    pub deployment_file: PathBuf,
}

// Seed stays out of logs.
impl std::fmt::Debug for InitConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InitConfig")
            .field("network", &self.network)
            .field("wallet_seed", &"<redacted>")
            .field("contract_name", &self.contract_name)
            .field("wallet_service", &self.wallet_service)
            .field("wallet_log_level", &self.wallet_log_level)
            .field("sync_timeout", &self.sync_timeout)
            .field("backend", &self.backend)
            .field("deployment_file", &self.deployment_file)
            .finish()
    }
}

impl InitConfig {
    /// Validate and resolve the environment used by the sequencer.
    pub fn resolve<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let wallet_seed = non_empty(&lookup, WALLET_SEED_ENV)
            .ok_or(ConfigError::Missing(WALLET_SEED_ENV))?;
        validate_seed(&wallet_seed)?;

        let network = NetworkConfig::resolve(&lookup)?;

        let sync_timeout = match non_empty(&lookup, WALLET_SYNC_TIMEOUT_ENV) {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                    var: WALLET_SYNC_TIMEOUT_ENV,
                    reason: format!("`{raw}` is not a whole number of seconds"),
                })?;
                Duration::from_secs(secs)
            }
            None => DEFAULT_SYNC_TIMEOUT,
        };

        let backend = match non_empty(&lookup, LEDGER_BACKEND_ENV) {
            Some(raw) => raw.parse()?,
            None => LedgerBackend::Remote,
        };

        Ok(Self {
            network,
            wallet_seed,
            contract_name: non_empty(&lookup, CONTRACT_NAME_ENV)
                .unwrap_or_else(|| DEFAULT_CONTRACT_NAME.to_string()),
            wallet_service: url_var(&lookup, WALLET_SERVICE_URL_ENV, DEFAULT_WALLET_SERVICE_URL)?,
            wallet_log_level: non_empty(&lookup, WALLET_LOG_LEVEL_ENV)
                .unwrap_or_else(|| DEFAULT_WALLET_LOG_LEVEL.to_string()),
            sync_timeout,
            backend,
            deployment_file: deployment_file(&lookup),
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(env_lookup)
    }
}

/// HTTP server settings. Never fails: bad values fall back to defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub web_dir: PathBuf,
    pub contracts_dir: PathBuf,
    pub deployment_file: PathBuf,
    pub tls: Option<TlsPaths>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

impl ServerConfig {
    pub fn resolve<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = non_empty(&lookup, PORT_ENV)
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let tls = match (
            non_empty(&lookup, TLS_CERT_PATH_ENV),
            non_empty(&lookup, TLS_KEY_PATH_ENV),
        ) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: cert.into(),
                key: key.into(),
            }),
            _ => None,
        };

        Self {
            host: non_empty(&lookup, HOST_ENV).unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            web_dir: non_empty(&lookup, WEB_DIR_ENV)
                .unwrap_or_else(|| "web".to_string())
                .into(),
            contracts_dir: non_empty(&lookup, CONTRACTS_DIR_ENV)
                .unwrap_or_else(|| "contracts".to_string())
                .into(),
            deployment_file: deployment_file(&lookup),
            tls,
        }
    }

    pub fn from_env() -> Self {
        Self::resolve(env_lookup)
    }
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn non_empty<F>(lookup: &F, var: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var).filter(|value| !value.trim().is_empty())
}

fn url_var<F>(lookup: &F, var: &'static str, default: &str) -> Result<Url, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = non_empty(lookup, var).unwrap_or_else(|| default.to_string());
    Url::parse(raw.trim()).map_err(|e| ConfigError::Invalid {
        var,
        reason: e.to_string(),
    })
}

fn deployment_file<F>(lookup: &F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup, DEPLOYMENT_FILE_ENV)
        .unwrap_or_else(|| DEFAULT_DEPLOYMENT_FILE.to_string())
        .into()
}

fn validate_seed(seed: &str) -> Result<(), ConfigError> {
    let seed = seed.trim();
    if seed.len() != 64 || !seed.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ConfigError::Invalid {
            var: WALLET_SEED_ENV,
            reason: "expected 64 hexadecimal characters".to_string(),
        });
    }
    Ok(())
}
