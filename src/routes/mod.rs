//! HTTP routes.
//!
//! `/` serves the document with the configured Cache-Control header, set by
//! the handler because only successful responses carry it. `/healthz` is never
//! cacheable. Every request runs inside the request-ID span.

pub mod health;
pub mod index;

use axum::{middleware, routing::get, Router};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::CACHE_CONTROL_HEALTH;
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Creates the Axum router with both routes.
pub fn create_router(state: AppState) -> Router {
    let document_routes = Router::new().route("/", get(index::root));

    // Health check - no caching, always fresh for liveness checks
    let health_routes = Router::new()
        .route("/healthz", get(health::healthz))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_HEALTH),
        ));

    Router::new()
        .merge(document_routes)
        .merge(health_routes)
        .with_state(state)
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
