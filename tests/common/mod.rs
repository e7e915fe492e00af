//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::Router;
use docs_viewer::config::DocsConfig;
use docs_viewer::storage::{ObjectStore, StoreError};
use docs_viewer::{create_router, AppState};

/// In-memory object store keyed by (bucket, key).
#[derive(Default)]
pub struct MemoryStore {
    objects: HashMap<(String, String), Bytes>,
    failure: Option<opendal::ErrorKind>,
}

impl MemoryStore {
    pub fn with_object(mut self, bucket: &str, key: &str, body: &'static [u8]) -> Self {
        self.objects
            .insert((bucket.to_string(), key.to_string()), Bytes::from_static(body));
        self
    }

    /// Make every call fail with a backend error of the given kind.
    pub fn failing(kind: opendal::ErrorKind) -> Self {
        Self {
            failure: Some(kind),
            ..Default::default()
        }
    }

    fn check(&self) -> Result<(), StoreError> {
        match self.failure {
            Some(kind) => Err(StoreError::Backend(opendal::Error::new(
                kind,
                "simulated failure",
            ))),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn exists(&self, bucket: &str, key: &str) -> Result<bool, StoreError> {
        self.check()?;
        Ok(self
            .objects
            .contains_key(&(bucket.to_string(), key.to_string())))
    }

    async fn download(&self, bucket: &str, key: &str) -> Result<Bytes, StoreError> {
        self.check()?;
        self.objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::ObjectNotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }
}

pub fn docs_config(bucket: &str, key: &str, cache_control: &str) -> DocsConfig {
    DocsConfig {
        bucket_name: bucket.to_string(),
        index_object: key.to_string(),
        cache_control: cache_control.to_string(),
    }
}

pub fn app(docs: DocsConfig, store: MemoryStore) -> Router {
    let state = AppState::new(docs, Arc::new(store)).expect("valid state");
    create_router(state)
}

/// Serve `router` on an ephemeral localhost port.
pub async fn spawn_router(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("fake server");
    });
    addr
}
