// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Compliants - Anonymous Compliance Reporting Service
//!
//! HTTP backend that lets informers file anonymous reports about public or
//! private institutions and lets reviewers ("contralores") read reports,
//! change case status and send feedback. Every state change is a call on a
//! deployed privacy-preserving contract, paid for by a server-held wallet.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `contract` - Report contract binding, ledger model and public state queries
//! - `wallet` - Wallet session, remote wallet service client and tx provider
//! - `devnet` - In-process ledger used for local development and tests
//! - `init` - One-shot startup sequence (config, deployment, wallet sync, attach)

pub mod api;
pub mod config;
pub mod contract;
pub mod deployment;
pub mod devnet;
pub mod error;
pub mod init;
pub mod logging;
pub mod models;
pub mod shutdown;
pub mod state;
pub mod wallet;
