//! Handler for the served document.

use axum::{
    extract::State,
    http::{
        header::{CACHE_CONTROL, CONTENT_TYPE},
        HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::error::AppError;
use crate::state::AppState;
use crate::storage::{fetch_object, FetchResult};

/// Body of the 404 response. Fixed text regardless of the configured key.
pub const NOT_FOUND_MESSAGE: &str = "index.html not found";

/// Serves the configured object from the configured bucket.
#[instrument(
    name = "index::root",
    skip(state),
    fields(bucket = %state.docs.bucket_name, object = %state.docs.index_object)
)]
pub async fn root(State(state): State<AppState>) -> Result<Response, AppError> {
    let result = fetch_object(
        state.store.as_ref(),
        &state.docs.bucket_name,
        &state.docs.index_object,
    )
    .await?;

    let response = match result {
        FetchResult::Found(bytes) => (
            [
                (CONTENT_TYPE, HeaderValue::from_static("text/html")),
                (CACHE_CONTROL, state.cache_control.clone()),
            ],
            bytes,
        )
            .into_response(),
        FetchResult::NotFound => {
            tracing::debug!("Document not found in bucket");
            (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE).into_response()
        }
    };

    Ok(response)
}
