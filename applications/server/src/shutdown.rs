//! Graceful shutdown coordination
//!
//! On the first termination signal: stop accepting connections and let
//! in-flight requests drain, then close the database connection, then
//! return so the process exits 0. A failed or stuck close is logged and
//! does not block the exit.

use axum::Router;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::net::TcpListener;

/// How the database close went
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    Closed,
    Failed,
    TimedOut,
}

/// Resolves on SIGTERM or Ctrl-C, whichever comes first
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Interrupt received: shutting down gracefully"),
        () = terminate => tracing::info!("SIGTERM received: shutting down gracefully"),
    }
}

/// Close a resource, giving up after `timeout`
pub async fn close_within<F, E>(name: &str, close: F, timeout: Duration) -> CloseOutcome
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    match tokio::time::timeout(timeout, close).await {
        Ok(Ok(())) => {
            tracing::info!("{} connection closed", name);
            CloseOutcome::Closed
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Failed to close {} connection", name);
            CloseOutcome::Failed
        }
        Err(_) => {
            tracing::warn!(?timeout, "Timed out closing {} connection", name);
            CloseOutcome::TimedOut
        }
    }
}

/// Serve `app` until `signal` resolves, then close the database.
pub async fn serve_until<S, F, E>(
    listener: TcpListener,
    app: Router,
    signal: S,
    close_database: F,
    close_timeout: Duration,
) -> CloseOutcome
where
    S: Future<Output = ()> + Send + 'static,
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(signal)
        .await
    {
        tracing::error!(error = %e, "HTTP server stopped with an error");
    }
    tracing::info!("HTTP server closed");

    close_within("database", close_database, close_timeout).await
}
