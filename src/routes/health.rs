//! Health check endpoint for container orchestration.
//!
//! Liveness only: the handler never touches the object store, so a store
//! outage does not get the container restarted.

use axum::Json;
use serde_json::{json, Value};

/// Health check handler.
pub async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
