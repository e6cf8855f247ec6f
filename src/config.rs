//! Configuration types for talking to the processing service.
//!
//! All client behaviour is controlled through [`ClientConfig`], built via its
//! [`ClientConfigBuilder`]. The defaults reproduce the service contract
//! exactly: `POST http://localhost:8000/process/` with a part named `file`,
//! saved as `reconstructed_<name>.pdf`.

use crate::error::ReaderError;
use crate::observer::ObserverHandle;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default base URL of the processing service.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000";
/// Default path of the processing route.
pub const DEFAULT_PROCESS_PATH: &str = "/process/";
/// Default path of the liveness route.
pub const DEFAULT_HEALTH_PATH: &str = "/health";
/// Default multipart field name for the uploaded file.
pub const DEFAULT_FIELD_NAME: &str = "file";
/// Default prefix of the downloaded file name.
pub const DEFAULT_DOWNLOAD_PREFIX: &str = "reconstructed_";
/// Default suffix of the downloaded file name.
pub const DEFAULT_DOWNLOAD_SUFFIX: &str = ".pdf";

/// Configuration for an [`crate::Uploader`] and the health probe.
///
/// # Example
/// ```rust
/// use smart_reader::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .endpoint("http://127.0.0.1:9000")
///     .request_timeout_secs(30)
///     .build()
///     .unwrap();
/// assert_eq!(config.process_url(), "http://127.0.0.1:9000/process/");
/// ```
///
/// Serialises to JSON (minus the observer), and missing fields in a JSON
/// file take their defaults, so a settings file only needs what it changes.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the processing service, scheme included. Default: `http://localhost:8000`.
    pub endpoint: String,

    /// Route that accepts the multipart upload. Default: `/process/`.
    pub process_path: String,

    /// Route answering the liveness probe. Default: `/health`.
    pub health_path: String,

    /// Multipart field carrying the file. Default: `file`.
    pub field_name: String,

    /// Prepended to the original file name. Default: `reconstructed_`.
    pub download_prefix: String,

    /// Appended to the original file name, even when it already has an
    /// extension. Default: `.pdf`.
    pub download_suffix: String,

    /// Whole-request timeout in seconds. Default: `None` (no timeout; the
    /// request runs until the transport gives up).
    pub request_timeout_secs: Option<u64>,

    /// Receives busy-flag and lifecycle events.
    #[serde(skip)]
    pub observer: Option<ObserverHandle>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            process_path: DEFAULT_PROCESS_PATH.to_string(),
            health_path: DEFAULT_HEALTH_PATH.to_string(),
            field_name: DEFAULT_FIELD_NAME.to_string(),
            download_prefix: DEFAULT_DOWNLOAD_PREFIX.to_string(),
            download_suffix: DEFAULT_DOWNLOAD_SUFFIX.to_string(),
            request_timeout_secs: None,
            observer: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("process_path", &self.process_path)
            .field("health_path", &self.health_path)
            .field("field_name", &self.field_name)
            .field("download_prefix", &self.download_prefix)
            .field("download_suffix", &self.download_suffix)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("observer", &self.observer.as_ref().map(|_| "<dyn UploadObserver>"))
            .finish()
    }
}

impl ClientConfig {
    /// Create a new builder for `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::default(),
        }
    }

    /// Parse a JSON settings document and validate it like [`ClientConfigBuilder::build`].
    pub fn from_json(json: &str) -> Result<Self, ReaderError> {
        let config: ClientConfig = serde_json::from_str(json)
            .map_err(|e| ReaderError::InvalidConfig(format!("bad settings JSON: {e}")))?;
        config.into_builder().build()
    }

    /// Reopen this configuration for changes.
    pub fn into_builder(self) -> ClientConfigBuilder {
        ClientConfigBuilder { config: self }
    }

    /// Full URL of the processing route.
    pub fn process_url(&self) -> String {
        join_url(&self.endpoint, &self.process_path)
    }

    /// Full URL of the liveness route.
    pub fn health_url(&self) -> String {
        join_url(&self.endpoint, &self.health_path)
    }

    /// Name under which the processed result of `original` is saved.
    ///
    /// No extension stripping: `scan.png` becomes `reconstructed_scan.png.pdf`.
    /// Directory components of `original` (either separator) are dropped
    /// first, so the prefix always lands on the bare file name.
    pub fn download_filename(&self, original: &str) -> String {
        let base = original
            .rsplit(|c: char| c == '/' || c == '\\')
            .next()
            .unwrap_or(original);
        format!("{}{}{}", self.download_prefix, base, self.download_suffix)
    }

    /// Build the HTTP client this configuration describes.
    pub(crate) fn http_client(&self) -> Result<reqwest::Client, ReaderError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = self.request_timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        builder.build().map_err(|e| ReaderError::Internal(e.to_string()))
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.endpoint = url.into();
        self
    }

    pub fn process_path(mut self, path: impl Into<String>) -> Self {
        self.config.process_path = path.into();
        self
    }

    pub fn health_path(mut self, path: impl Into<String>) -> Self {
        self.config.health_path = path.into();
        self
    }

    pub fn field_name(mut self, name: impl Into<String>) -> Self {
        self.config.field_name = name.into();
        self
    }

    pub fn download_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.download_prefix = prefix.into();
        self
    }

    pub fn download_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.download_suffix = suffix.into();
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = Some(secs);
        self
    }

    pub fn observer(mut self, observer: ObserverHandle) -> Self {
        self.config.observer = Some(observer);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ClientConfig, ReaderError> {
        let c = &self.config;
        if !(c.endpoint.starts_with("http://") || c.endpoint.starts_with("https://")) {
            return Err(ReaderError::InvalidConfig(format!(
                "endpoint must be an http:// or https:// URL, got '{}'",
                c.endpoint
            )));
        }
        if reqwest::Url::parse(&c.process_url()).is_err() {
            return Err(ReaderError::InvalidConfig(format!(
                "'{}' is not a valid URL",
                c.process_url()
            )));
        }
        if c.field_name.trim().is_empty() {
            return Err(ReaderError::InvalidConfig(
                "multipart field name must not be empty".into(),
            ));
        }
        if c.request_timeout_secs == Some(0) {
            return Err(ReaderError::InvalidConfig(
                "request timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}
