//! # Storefront Configuration
//!
//! Configuration for the storefront client.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     METIZ_API_URL=https://api.metiz.example                            │
//! │     METIZ_ASSET_URL=https://cdn.metiz.example                          │
//! │     METIZ_REQUEST_TIMEOUT_SECS=30                                      │
//! │     METIZ_REDIRECT_DELAY_MS=2000                                       │
//! │     METIZ_API_TOKEN=<bearer token>                                     │
//! │     METIZ_ROLE=user | metiz                                            │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/metiz-storefront/storefront.toml (Linux)                 │
//! │     ~/Library/Application Support/ru.metiz.storefront/... (macOS)      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:5000, no timeout, 2 s redirect delay             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [api]
//! base_url = "http://localhost:5000"
//! asset_base_url = "http://localhost:5000"
//! request_timeout_secs = 30
//!
//! [ui]
//! redirect_delay_ms = 2000
//!
//! [auth]
//! token = "eyJhbGciOi..."
//! role = "user"
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use metiz_client::ApiSettings;
use metiz_core::{Role, Session};

/// Config file name inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "storefront.toml";

/// Delay before the registration page moves on to the login page.
pub const DEFAULT_REDIRECT_DELAY_MS: u64 = 2000;

// =============================================================================
// Config Error
// =============================================================================

/// Configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or parse the config file.
    #[error("Failed to load config: {0}")]
    LoadFailed(String),

    /// Failed to write the config file.
    #[error("Failed to save config: {0}")]
    SaveFailed(String),

    /// A setting has an unusable value.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::SaveFailed(err.to_string())
    }
}

impl From<metiz_client::ClientError> for ConfigError {
    fn from(err: metiz_client::ClientError) -> Self {
        ConfigError::Invalid(err.to_string())
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// Presentation timings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiSettings {
    #[serde(default = "default_redirect_delay")]
    pub redirect_delay_ms: u64,
}

fn default_redirect_delay() -> u64 {
    DEFAULT_REDIRECT_DELAY_MS
}

impl Default for UiSettings {
    fn default() -> Self {
        UiSettings {
            redirect_delay_ms: default_redirect_delay(),
        }
    }
}

/// A remembered session.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl AuthSettings {
    /// The configured token, if any.
    ///
    /// Usable for requests even when no role is known.
    pub fn bearer_token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }

    /// The stored session, when both halves are present.
    pub fn session(&self) -> Option<Session> {
        match (&self.token, self.role) {
            (Some(token), Some(role)) if !token.is_empty() => Some(Session {
                role,
                token: token.clone(),
            }),
            _ => None,
        }
    }
}

impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSettings")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("role", &self.role)
            .finish()
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete storefront configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// Backend connection settings.
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub ui: UiSettings,

    /// Remembered login.
    #[serde(default)]
    pub auth: AuthSettings,
}

impl StorefrontConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (storefront.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::load_file(config_path)?;

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Defaults overlaid with the config file only; no environment, no
    /// validation. This is what gets written back on save.
    pub fn load_file(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let Some(path) = config_path.or_else(Self::default_config_path) else {
            return Ok(Self::default());
        };

        if path.exists() {
            info!(?path, "Loading storefront config from file");
            let contents = std::fs::read_to_string(&path)?;
            Ok(toml::from_str(&contents)?)
        } else {
            debug!(?path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Rewrites only the `[auth]` section of the file.
    ///
    /// Every other setting is kept as the file has it, so environment
    /// overrides of the current run never become permanent.
    pub fn save_session(config_path: Option<PathBuf>, session: Option<&Session>) -> ConfigResult<()> {
        let mut file = Self::load_file(config_path.clone())?;
        file.auth = match session {
            Some(session) => AuthSettings {
                token: Some(session.token.clone()),
                role: Some(session.role),
            },
            None => AuthSettings::default(),
        };
        file.save(config_path)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ConfigError::SaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::SaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        info!(?path, "Storefront config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.api.validate()?;

        if self.ui.redirect_delay_ms > 60_000 {
            return Err(ConfigError::Invalid(format!(
                "redirect_delay_ms must be at most 60000, got {}",
                self.ui.redirect_delay_ms
            )));
        }

        Ok(())
    }

    /// Applies environment overrides read through `lookup`.
    ///
    /// Unparseable numbers are logged and ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("METIZ_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(url) = lookup("METIZ_ASSET_URL") {
            debug!(url = %url, "Overriding asset URL from environment");
            self.api.asset_base_url = url;
        }

        if let Some(secs) = lookup("METIZ_REQUEST_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(s) => self.api.request_timeout_secs = Some(s),
                Err(_) => warn!(value = %secs, "Ignoring invalid METIZ_REQUEST_TIMEOUT_SECS"),
            }
        }

        if let Some(ms) = lookup("METIZ_REDIRECT_DELAY_MS") {
            match ms.parse::<u64>() {
                Ok(m) => self.ui.redirect_delay_ms = m,
                Err(_) => warn!(value = %ms, "Ignoring invalid METIZ_REDIRECT_DELAY_MS"),
            }
        }

        if let Some(token) = lookup("METIZ_API_TOKEN") {
            debug!("Using API token from environment");
            self.auth.token = Some(token);
        }

        if let Some(role) = lookup("METIZ_ROLE") {
            match role.parse::<Role>() {
                Ok(r) => self.auth.role = Some(r),
                Err(e) => warn!(error = %e, "Ignoring invalid METIZ_ROLE"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("ru", "metiz", "storefront")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.ui.redirect_delay_ms)
    }
}
