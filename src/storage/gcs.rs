//! Google Cloud Storage access through OpenDAL.
//!
//! Credentials follow Application Default Credentials: an explicit key file,
//! then `GOOGLE_APPLICATION_CREDENTIALS`, the gcloud user credentials file, and
//! finally the GCE metadata server. An emulator endpoint turns all of that off
//! and sends unsigned requests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use opendal::layers::{TimeoutLayer, TracingLayer};
use opendal::services::Gcs;
use opendal::{ErrorKind, Operator};

use crate::config::{
    Credentials, StorageConfig, STORE_IO_TIMEOUT_SECS, STORE_REQUEST_TIMEOUT_SECS,
};

use super::{ObjectStore, StoreError};

/// Read-only GCS client, shared by all requests.
///
/// An OpenDAL operator is scoped to one bucket, so one is built per bucket on
/// first use and reused afterwards; each keeps its own credential cache.
pub struct GcsStore {
    config: StorageConfig,
    operators: Mutex<HashMap<String, Operator>>,
}

impl GcsStore {
    /// Create the store and eagerly build the operator for `bucket`, so
    /// configuration mistakes surface at startup.
    pub fn new(config: &StorageConfig, bucket: &str) -> Result<Self, StoreError> {
        let operator = build_operator(config, bucket)?;
        let operators = HashMap::from([(bucket.to_string(), operator)]);

        Ok(Self {
            config: config.clone(),
            operators: Mutex::new(operators),
        })
    }

    /// Base URL this client sends requests to
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    fn operator(&self, bucket: &str) -> Result<Operator, StoreError> {
        let mut operators = self
            .operators
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(op) = operators.get(bucket) {
            return Ok(op.clone());
        }

        tracing::debug!(bucket, "Building object store operator");
        let op = build_operator(&self.config, bucket)?;
        operators.insert(bucket.to_string(), op.clone());
        Ok(op)
    }
}

fn build_operator(config: &StorageConfig, bucket: &str) -> Result<Operator, StoreError> {
    let mut builder = Gcs::default()
        .bucket(bucket)
        .root("/")
        .endpoint(&config.endpoint);

    builder = match &config.credentials {
        Credentials::Anonymous => builder
            .allow_anonymous()
            .disable_vm_metadata()
            .disable_config_load(),
        Credentials::ApplicationDefault {
            credential_path: Some(path),
        } => builder.credential_path(path),
        Credentials::ApplicationDefault {
            credential_path: None,
        } => builder,
    };

    let op = Operator::new(builder)?
        .layer(
            TimeoutLayer::new()
                .with_timeout(Duration::from_secs(STORE_REQUEST_TIMEOUT_SECS))
                .with_io_timeout(Duration::from_secs(STORE_IO_TIMEOUT_SECS)),
        )
        .layer(TracingLayer)
        .finish();
    Ok(op)
}

#[async_trait]
impl ObjectStore for GcsStore {
    async fn exists(&self, bucket: &str, key: &str) -> Result<bool, StoreError> {
        Ok(self.operator(bucket)?.exists(key).await?)
    }

    async fn download(&self, bucket: &str, key: &str) -> Result<Bytes, StoreError> {
        match self.operator(bucket)?.read(key).await {
            Ok(buffer) => Ok(buffer.to_bytes()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::ObjectNotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}
