//! Configuration loading and constants.
//!
//! All settings come from the process environment and are read exactly once at
//! startup. `AppConfig` is the root struct; `DocsConfig` holds the three values
//! that decide what `GET /` serves. A missing bucket name is fatal so the
//! process never binds a port without something to serve.

use const_format::formatcp;

// =============================================================================
// Environment Variable Names
// =============================================================================

/// Bucket holding the document (required)
pub const ENV_BUCKET_NAME: &str = "DOCS_BUCKET_NAME";

/// Object key of the document inside the bucket
pub const ENV_INDEX_OBJECT: &str = "DOCS_INDEX_OBJECT";

/// Cache-Control value sent with the document
pub const ENV_CACHE_CONTROL: &str = "DOCS_CACHE_CONTROL";

/// Listen address
pub const ENV_HOST: &str = "HOST";

/// Listen port
pub const ENV_PORT: &str = "PORT";

/// GCS emulator endpoint; switches the store client to anonymous access
pub const ENV_STORAGE_EMULATOR_HOST: &str = "STORAGE_EMULATOR_HOST";

/// Service account key file used by Application Default Credentials
pub const ENV_CREDENTIALS: &str = "GOOGLE_APPLICATION_CREDENTIALS";

// =============================================================================
// HTTP Response Cache Control
// =============================================================================

/// Default freshness lifetime for the served document, in seconds
pub const HTTP_CACHE_DOCUMENT_MAX_AGE: u32 = 60;

pub const DEFAULT_CACHE_CONTROL: &str =
    formatcp!("public, max-age={}", HTTP_CACHE_DOCUMENT_MAX_AGE);

/// Health responses must never be served from a cache
pub const CACHE_CONTROL_HEALTH: &str = "no-store";

// =============================================================================
// Object Store Defaults
// =============================================================================

pub const DEFAULT_INDEX_OBJECT: &str = "index.html";

/// Public GCS JSON API endpoint
pub const DEFAULT_STORAGE_ENDPOINT: &str = "https://storage.googleapis.com";

/// Whole-request timeout for object store calls
pub const STORE_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Limit on a single read of a response body
pub const STORE_IO_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// Server and Logging Defaults
// =============================================================================

pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";

pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Connections get this long to finish after a shutdown signal
pub const GRACEFUL_SHUTDOWN_SECS: u64 = 30;

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "docs_viewer=info";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP server configuration
    pub http: HttpServerConfig,
    /// What to serve
    pub docs: DocsConfig,
    /// How to reach the object store
    pub storage: StorageConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
}

/// The document served at `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocsConfig {
    /// Bucket name, never empty
    pub bucket_name: String,
    pub index_object: String,
    pub cache_control: String,
}

/// Object store endpoint and credential selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Base URL of the GCS JSON API, without trailing slash
    pub endpoint: String,
    pub credentials: Credentials,
}

/// How requests to the object store are authorized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Unsigned requests (emulators, public buckets)
    Anonymous,
    /// Application Default Credentials. A key file path, when present, is
    /// tried before the gcloud user credentials and the metadata server.
    ApplicationDefault { credential_path: Option<String> },
}

impl StorageConfig {
    /// Resolve the endpoint and credentials from environment lookups.
    ///
    /// An emulator host wins over everything else and implies anonymous access,
    /// matching how Google's client libraries treat `STORAGE_EMULATOR_HOST`.
    fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        match non_empty(lookup(ENV_STORAGE_EMULATOR_HOST)) {
            Some(host) => Self {
                endpoint: normalize_endpoint(&host),
                credentials: Credentials::Anonymous,
            },
            None => Self {
                endpoint: DEFAULT_STORAGE_ENDPOINT.to_string(),
                credentials: Credentials::ApplicationDefault {
                    credential_path: non_empty(lookup(ENV_CREDENTIALS)),
                },
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Only the bucket name is mandatory. Optional values fall back to their
    /// defaults when unset; a value that is set but empty is used as-is.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bucket_name = non_empty(lookup(ENV_BUCKET_NAME))
            .ok_or(ConfigError::MissingVar(ENV_BUCKET_NAME))?;

        let docs = DocsConfig {
            bucket_name,
            index_object: lookup(ENV_INDEX_OBJECT)
                .unwrap_or_else(|| DEFAULT_INDEX_OBJECT.to_string()),
            cache_control: lookup(ENV_CACHE_CONTROL)
                .unwrap_or_else(|| DEFAULT_CACHE_CONTROL.to_string()),
        };

        let port = match non_empty(lookup(ENV_PORT)) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::InvalidVar {
                name: ENV_PORT,
                message: format!("'{}' is not a valid port: {}", raw, e),
            })?,
            None => DEFAULT_HTTP_PORT,
        };

        let http = HttpServerConfig {
            host: non_empty(lookup(ENV_HOST)).unwrap_or_else(|| DEFAULT_HTTP_HOST.to_string()),
            port,
        };

        Ok(Self {
            http,
            docs,
            storage: StorageConfig::from_lookup(&lookup),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Emulator hosts are commonly given as `host:port`; default those to plain HTTP.
fn normalize_endpoint(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("http://{}", host)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} env var is required")]
    MissingVar(&'static str),
    #[error("Invalid value for {name}: {message}")]
    InvalidVar { name: &'static str, message: String },
    #[error("Invalid header value for {name}: {value:?}")]
    InvalidHeader { name: &'static str, value: String },
}
