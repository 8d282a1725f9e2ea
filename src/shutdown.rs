// src/shutdown.rs
// Graceful-shutdown trigger for the HTTP server

use std::future::Future;
use std::io;

/// Resolves on Ctrl+C or, on unix, SIGTERM.
pub async fn shutdown_signal() {
    let reason = first_signal(tokio::signal::ctrl_c(), terminate()).await;
    tracing::info!(signal = reason, "shutting down gracefully");
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            tracing::warn!(error = %e, "SIGTERM handler unavailable");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await
}

/// A broken Ctrl+C listener leaves the server waiting on `terminate` alone.
async fn first_signal<I, T>(interrupt: I, terminate: T) -> &'static str
where
    I: Future<Output = io::Result<()>>,
    T: Future<Output = ()>,
{
    let interrupt = async {
        if let Err(e) = interrupt.await {
            tracing::warn!(error = %e, "Ctrl+C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = interrupt => "interrupt",
        _ = terminate => "terminate",
    }
}
