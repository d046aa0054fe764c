// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Deployment descriptor written by the contract deploy step.
//!
//! The descriptor is read once at startup and never written by this service:
//!
//! ```json
//! { "contractAddress": "0200ab...", "contractName": "compliants" }
//! ```

use std::{
    io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, thiserror::Error)]
pub enum DeploymentError {
    #[error("No deployment descriptor found at {0}")]
    Missing(PathBuf),

    #[error("Failed to read deployment descriptor {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed deployment descriptor {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Deployment descriptor {0} has an empty contractAddress")]
    EmptyAddress(PathBuf),
}

/// Persisted record of a deployed contract instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentDescriptor {
    /// Address of the deployed contract.
    pub contract_address: String,
    /// Name of the compiled contract, when the deploy step recorded it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_name: Option<String>,
}

impl DeploymentDescriptor {
    /// Load and validate the descriptor at `path`.
    pub async fn load(path: &Path) -> Result<Self, DeploymentError> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(DeploymentError::Missing(path.to_path_buf()))
            }
            Err(source) => {
                return Err(DeploymentError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let descriptor: Self =
            serde_json::from_slice(&bytes).map_err(|source| DeploymentError::Malformed {
                path: path.to_path_buf(),
                source,
            })?;

        if descriptor.contract_address.trim().is_empty() {
            return Err(DeploymentError::EmptyAddress(path.to_path_buf()));
        }

        Ok(descriptor)
    }

    /// Contract name to bind: descriptor first, then the configured fallback.
    pub fn resolved_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.contract_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(fallback)
    }
}
