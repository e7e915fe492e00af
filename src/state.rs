//! Shared application state for request handlers.

use std::sync::Arc;

use http::HeaderValue;

use crate::config::{ConfigError, DocsConfig, ENV_CACHE_CONTROL};
use crate::storage::ObjectStore;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Holds the immutable document configuration and the single object store
/// client created at startup.
#[derive(Clone)]
pub struct AppState {
    pub docs: Arc<DocsConfig>,
    pub store: Arc<dyn ObjectStore>,
    /// `docs.cache_control` as a ready-to-send header value
    pub cache_control: HeaderValue,
}

impl AppState {
    /// Creates the state, rejecting a Cache-Control value that cannot be sent as a header.
    pub fn new(docs: DocsConfig, store: Arc<dyn ObjectStore>) -> Result<Self, ConfigError> {
        let cache_control =
            HeaderValue::from_str(&docs.cache_control).map_err(|_| ConfigError::InvalidHeader {
                name: ENV_CACHE_CONTROL,
                value: docs.cache_control.clone(),
            })?;

        Ok(Self {
            docs: Arc::new(docs),
            store,
            cache_control,
        })
    }
}
