//! # Client Configuration
//!
//! Where the backend lives and how long to wait for it.
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:5000"
//! asset_base_url = "http://localhost:5000"
//! request_timeout_secs = 30  # omit for no timeout
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::error::{ClientError, ClientResult};

/// Default backend address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL of the REST API; endpoint paths are joined onto it.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Host serving product photos.
    #[serde(default = "default_base_url")]
    pub asset_base_url: String,

    /// Per-request timeout. `None` waits indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            asset_base_url: default_base_url(),
            request_timeout_secs: None,
        }
    }
}

impl ApiSettings {
    /// Validates the settings.
    pub fn validate(&self) -> ClientResult<()> {
        self.base_url()?;
        self.asset_base_url()?;

        if self.request_timeout_secs == Some(0) {
            return Err(ClientError::InvalidConfig(
                "request_timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Parsed API base URL.
    pub fn base_url(&self) -> ClientResult<Url> {
        parse_http_url("base_url", &self.base_url)
    }

    /// Parsed asset host URL.
    pub fn asset_base_url(&self) -> ClientResult<Url> {
        parse_http_url("asset_base_url", &self.asset_base_url)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

fn parse_http_url(field: &str, raw: &str) -> ClientResult<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ClientError::InvalidUrl(format!("{}: {} ({})", field, raw, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ClientError::InvalidUrl(format!(
            "{} must start with http:// or https://, got scheme '{}'",
            field, other
        ))),
    }
}
