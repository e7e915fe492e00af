//! Object store access.
//!
//! `ObjectStore` is the read-only contract the HTTP layer depends on. The
//! production implementation is [`GcsStore`], backed by OpenDAL's Google
//! Cloud Storage service. [`fetch_object`] turns the two-call contract into a single
//! `FetchResult` for the root handler.

mod gcs;

pub use gcs::GcsStore;

use async_trait::async_trait;
use axum::body::Bytes;
use tracing::instrument;

/// Error from an object store call.
///
/// `ObjectNotFound` is only produced by `download`; `exists` reports absence
/// as `Ok(false)`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Object store request failed: {0}")]
    Backend(#[from] opendal::Error),

    #[error("Object not found: {bucket}/{key}")]
    ObjectNotFound { bucket: String, key: String },
}

/// Read-only access to blobs addressed by bucket and key.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Whether an object exists at `bucket`/`key`.
    async fn exists(&self, bucket: &str, key: &str) -> Result<bool, StoreError>;

    /// Download the full contents of the object at `bucket`/`key`.
    async fn download(&self, bucket: &str, key: &str) -> Result<Bytes, StoreError>;
}

/// Outcome of a single object read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    Found(Bytes),
    NotFound,
}

/// Fetch one object, folding absence into `FetchResult::NotFound`.
///
/// An object deleted between the existence check and the download is also
/// reported as `NotFound`.
#[instrument(name = "storage::fetch_object", skip(store))]
pub async fn fetch_object(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &str,
) -> Result<FetchResult, StoreError> {
    if !store.exists(bucket, key).await? {
        tracing::debug!("Object does not exist");
        return Ok(FetchResult::NotFound);
    }

    match store.download(bucket, key).await {
        Ok(bytes) => {
            tracing::debug!(bytes = bytes.len(), "Downloaded object");
            Ok(FetchResult::Found(bytes))
        }
        Err(StoreError::ObjectNotFound { .. }) => {
            tracing::debug!("Object removed before download");
            Ok(FetchResult::NotFound)
        }
        Err(e) => Err(e),
    }
}
