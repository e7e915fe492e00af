//! Request-path errors and their HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::storage::StoreError;

/// Error returned by request handlers.
///
/// A missing object is not an error; handlers answer it with a 404 directly.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Object store error: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Store(source) => {
                tracing::error!(error = %source, "Failed to read document from object store");
            }
        }

        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
    }
}
