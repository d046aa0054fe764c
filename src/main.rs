// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::net::SocketAddr;

use axum_server::{tls_rustls::RustlsConfig, Handle};
use compliants_server::{
    api,
    config::{InitConfig, ServerConfig},
    init::spawn_initialization,
    logging, shutdown,
    state::AppState,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    logging::init_tracing().expect("Failed to install tracing subscriber");

    let server = ServerConfig::from_env();
    let state = AppState::new(server.deployment_file.clone());
    let cancel = CancellationToken::new();

    // The HTTP server comes up immediately; contract endpoints report
    // "not initialized" until this finishes.
    let init_task = spawn_initialization(state.clone(), InitConfig::from_env(), cancel.clone());

    let app = api::app(state.clone(), &server);
    let addr: SocketAddr = format!("{}:{}", server.host, server.port)
        .parse()
        .expect("Failed to parse bind address");

    let handle: Handle<SocketAddr> = Handle::new();
    tokio::spawn(shutdown::ctrl_c(handle.clone(), cancel.clone()));

    match &server.tls {
        Some(tls) => {
            // Install the ring crypto provider before any TLS operations
            let _ = rustls::crypto::ring::default_provider().install_default();
            let tls_config = RustlsConfig::from_pem_file(&tls.cert, &tls.key)
                .await
                .expect("Failed to load TLS certificate and key");

            info!(%addr, "Compliants server listening on https://{addr} (docs at /docs)");
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .expect("HTTPS server failed");
        }
        None => {
            info!(%addr, "Compliants server listening on http://{addr} (docs at /docs)");
            axum_server::bind(addr)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .expect("HTTP server failed");
        }
    }

    cancel.cancel();
    if let Err(e) = init_task.await {
        warn!(error = %e, "Initialization task did not finish cleanly");
    }
    state.close_wallet().await;
    info!("Server stopped");
}
