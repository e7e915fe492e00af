//! `GcsStore` against a fake GCS JSON API.
//!
//! Run with: cargo test --test gcs_store

mod common;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use common::spawn_router;
use docs_viewer::config::{Credentials, StorageConfig};
use docs_viewer::storage::{fetch_object, FetchResult, GcsStore, ObjectStore, StoreError};
use opendal::ErrorKind;
use serde_json::json;

#[derive(Default)]
struct FakeGcs {
    objects: HashMap<(String, String), Bytes>,
    /// Status returned for every object request instead of a real lookup
    forced_status: Option<StatusCode>,
    seen_auth: Mutex<Vec<Option<String>>>,
}

impl FakeGcs {
    fn with_object(mut self, bucket: &str, key: &str, body: &'static [u8]) -> Self {
        self.objects
            .insert((bucket.to_string(), key.to_string()), Bytes::from_static(body));
        self
    }
}

/// Object resource as returned by `objects.get` without `alt=media`.
fn object_metadata(bucket: &str, key: &str, body: &Bytes) -> serde_json::Value {
    json!({
        "kind": "storage#object",
        "name": key,
        "bucket": bucket,
        "generation": "1704067200000000",
        "size": body.len().to_string(),
        "contentType": "text/html",
        "updated": "2024-01-01T00:00:00.000Z",
        "etag": "CJ2c3bX2/IMDEAE=",
        "md5Hash": "1B2M2Y8AsgTpgAmY7PhCfg=="
    })
}

async fn object(
    State(fake): State<Arc<FakeGcs>>,
    Path((bucket, key)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    fake.seen_auth.lock().unwrap().push(auth);

    if let Some(status) = fake.forced_status {
        return (status, "forced").into_response();
    }

    match fake.objects.get(&(bucket.clone(), key.clone())) {
        Some(body) if query.get("alt").map(String::as_str) == Some("media") => {
            body.clone().into_response()
        }
        Some(body) => Json(object_metadata(&bucket, &key, body)).into_response(),
        None => (StatusCode::NOT_FOUND, "No such object").into_response(),
    }
}

async fn start(fake: FakeGcs) -> (Arc<FakeGcs>, String) {
    let fake = Arc::new(fake);
    let router = Router::new()
        .route("/storage/v1/b/{bucket}/o/{*object}", get(object))
        .with_state(fake.clone());
    let addr = spawn_router(router).await;
    (fake, format!("http://{}", addr))
}

fn anonymous_store(endpoint: &str) -> GcsStore {
    GcsStore::new(
        &StorageConfig {
            endpoint: endpoint.to_string(),
            credentials: Credentials::Anonymous,
        },
        "docs",
    )
    .unwrap()
}

#[tokio::test]
async fn exists_and_download_found_object() {
    let (_, endpoint) =
        start(FakeGcs::default().with_object("docs", "index.html", b"<html>ok</html>")).await;
    let gcs = anonymous_store(&endpoint);

    assert!(gcs.exists("docs", "index.html").await.unwrap());
    let bytes = gcs.download("docs", "index.html").await.unwrap();
    assert_eq!(&bytes[..], b"<html>ok</html>");
}

#[tokio::test]
async fn missing_object_reports_absent() {
    let (_, endpoint) = start(FakeGcs::default()).await;
    let gcs = anonymous_store(&endpoint);

    assert!(!gcs.exists("docs", "index.html").await.unwrap());
    let err = gcs.download("docs", "index.html").await.unwrap_err();
    assert!(matches!(err, StoreError::ObjectNotFound { .. }));
}

#[tokio::test]
async fn nested_key_is_addressed_as_single_object() {
    let (_, endpoint) = start(
        FakeGcs::default().with_object("docs", "site/v2/index.html", b"<html>v2</html>"),
    )
    .await;
    let gcs = anonymous_store(&endpoint);

    let result = fetch_object(&gcs, "docs", "site/v2/index.html").await.unwrap();
    assert_eq!(result, FetchResult::Found(Bytes::from_static(b"<html>v2</html>")));
}

#[tokio::test]
async fn other_bucket_gets_its_own_operator() {
    let (_, endpoint) = start(
        FakeGcs::default()
            .with_object("docs", "index.html", b"<html>docs</html>")
            .with_object("archive", "index.html", b"<html>archive</html>"),
    )
    .await;
    let gcs = anonymous_store(&endpoint);

    let docs = gcs.download("docs", "index.html").await.unwrap();
    let archive = gcs.download("archive", "index.html").await.unwrap();
    assert_eq!(&docs[..], b"<html>docs</html>");
    assert_eq!(&archive[..], b"<html>archive</html>");
}

#[tokio::test]
async fn forbidden_is_a_backend_error() {
    let (_, endpoint) = start(FakeGcs {
        forced_status: Some(StatusCode::FORBIDDEN),
        ..Default::default()
    })
    .await;
    let gcs = anonymous_store(&endpoint);

    let err = gcs.exists("docs", "index.html").await.unwrap_err();
    match err {
        StoreError::Backend(e) => assert_eq!(e.kind(), ErrorKind::PermissionDenied),
        other => panic!("expected backend error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_endpoint_is_backend_error() {
    // Bind and drop to get a port nothing listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let gcs = anonymous_store(&format!("http://{}", addr));
    let err = gcs.exists("docs", "index.html").await.unwrap_err();
    assert!(matches!(err, StoreError::Backend(_)));
}

#[tokio::test]
async fn anonymous_requests_send_no_authorization() {
    let (fake, endpoint) =
        start(FakeGcs::default().with_object("docs", "index.html", b"<html>ok</html>")).await;
    let gcs = anonymous_store(&endpoint);

    fetch_object(&gcs, "docs", "index.html").await.unwrap();

    let seen = fake.seen_auth.lock().unwrap();
    assert!(!seen.is_empty());
    assert!(seen.iter().all(Option::is_none));
}
