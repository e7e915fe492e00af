//! HTTP server startup logic.

use std::net::{IpAddr, SocketAddr};

use axum::Router;
use axum_server::Handle;

use crate::config::HttpServerConfig;

use super::shutdown;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid listen address: {0}")]
    InvalidAddress(String),

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

/// Turn the configured host and port into a bindable address.
///
/// IP literals (bracketed or not) are used directly; anything else is
/// resolved and the first address wins.
pub(crate) async fn resolve_listen_addr(
    config: &HttpServerConfig,
) -> Result<SocketAddr, ServerError> {
    let host = config.host.trim().trim_start_matches('[').trim_end_matches(']');

    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, config.port));
    }

    let invalid = |reason: String| {
        ServerError::InvalidAddress(format!("{}:{}: {}", config.host, config.port, reason))
    };

    tokio::net::lookup_host((host, config.port))
        .await
        .map_err(|e| invalid(e.to_string()))?
        .next()
        .ok_or_else(|| invalid("host resolved to no addresses".to_string()))
}

/// Start the HTTP server on the configured address.
///
/// This function blocks until the server shuts down.
pub async fn start_server(app: Router, config: &HttpServerConfig) -> Result<(), ServerError> {
    let addr = resolve_listen_addr(config).await?;

    let handle = Handle::new();
    shutdown::setup_shutdown_handler(handle.clone());

    tracing::info!(%addr, "Starting HTTP server");

    axum_server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
