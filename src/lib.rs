//! docs-viewer: serves a single HTML document from a Google Cloud Storage bucket.
//!
//! `GET /` returns the configured object with a configured Cache-Control
//! header (404 when it is absent); `GET /healthz` reports liveness.

pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod storage;

pub use config::AppConfig;
pub use error::AppError;
pub use routes::create_router;
pub use state::AppState;
