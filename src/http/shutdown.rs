//! Drain in-flight requests when the process is asked to stop.

use std::time::Duration;

use axum_server::Handle;

use crate::config::GRACEFUL_SHUTDOWN_SECS;

/// Wait for SIGINT or SIGTERM and report which one arrived.
async fn wait_for_signal() -> std::io::Result<&'static str> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result.map(|_| "SIGINT"),
            _ = terminate.recv() => Ok("SIGTERM"),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await.map(|_| "SIGINT")
    }
}

/// Stop accepting connections and give open ones a bounded time to finish.
fn begin_drain(handle: &Handle, signal: &str) {
    tracing::info!(
        signal,
        drain_secs = GRACEFUL_SHUTDOWN_SECS,
        "Stop requested, draining open connections"
    );
    handle.graceful_shutdown(Some(Duration::from_secs(GRACEFUL_SHUTDOWN_SECS)));
}

/// Spawn the task that turns a stop signal into a graceful drain of `handle`.
///
/// If the signal handlers cannot be installed the server keeps running and
/// can only be stopped forcibly.
pub fn setup_shutdown_handler(handle: Handle) {
    tokio::spawn(async move {
        match wait_for_signal().await {
            Ok(signal) => begin_drain(&handle, signal),
            Err(e) => {
                tracing::error!(error = %e, "Could not listen for stop signals");
            }
        }
    });
}
