//! docs-viewer entry point.
//!
//! Initializes tracing, loads configuration from the environment, builds the
//! object store client, sets up the Axum router and starts the HTTP server.
//! Configuration errors abort before any port is bound.

use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docs_viewer::config::{AppConfig, DEFAULT_LOG_FILTER};
use docs_viewer::http::start_server;
use docs_viewer::storage::GcsStore;
use docs_viewer::{create_router, AppState};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per line
    Json,
}

/// docs-viewer: serve a single HTML document from a Cloud Storage bucket
#[derive(Parser, Debug)]
#[command(name = "docs-viewer", version, about)]
struct Args {
    /// Log level filter (e.g., "docs_viewer=debug,opendal=info")
    #[arg(short, long)]
    log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(&log_filter));
    match args.log_format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        e
    })?;

    tracing::info!(
        bucket = %config.docs.bucket_name,
        object = %config.docs.index_object,
        cache_control = %config.docs.cache_control,
        "Loaded configuration"
    );

    let store = GcsStore::new(&config.storage, &config.docs.bucket_name)?;
    tracing::info!(
        endpoint = %store.endpoint(),
        credentials = ?config.storage.credentials,
        "Initialized object store client"
    );

    let state = AppState::new(config.docs.clone(), Arc::new(store))?;
    let app = create_router(state);

    start_server(app, &config.http).await?;

    Ok(())
}
