// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Graceful shutdown wiring for the HTTP server.

use std::{future::Future, net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Time in-flight requests get to finish once shutdown starts.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Wait for `signal`, then cancel background work and drain the server.
pub async fn shutdown_on<F>(signal: F, handle: Handle<SocketAddr>, shutdown: CancellationToken)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received");
    shutdown.cancel();
    handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
}

/// [`shutdown_on`] driven by Ctrl-C.
pub async fn ctrl_c(handle: Handle<SocketAddr>, shutdown: CancellationToken) {
    shutdown_on(tokio::signal::ctrl_c(), handle, shutdown).await;
}
