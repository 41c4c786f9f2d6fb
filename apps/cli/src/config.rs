//! # CLI Configuration
//!
//! ## Load Order (later overrides earlier)
//! 1. Default values
//! 2. Config file (`qdesk.toml`, or `--config`)
//! 3. Environment variables
//!
//! ## Example
//! ```toml
//! [server]
//! url = "https://api.example.in"
//! token = "eyJhbGciOi..."
//!
//! [images]
//! timeout_secs = 10
//! base_url = "https://api.example.in"
//!
//! [company]
//! name = "Acme Interiors"
//! address = "12 MG Road, Pune"
//! phone = "+91 98200 00000"
//! city = "Pune"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use qdesk_doc::{CompanyProfile, DEFAULT_IMAGE_TIMEOUT};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ConfigError;

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// REST API the quotations live in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub url: Option<String>,
    /// Bearer token sent with API requests.
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSettings {
    /// Per-image fetch timeout in seconds.
    pub timeout_secs: u64,
    /// Base for relative image references; falls back to the server URL.
    pub base_url: Option<String>,
    /// Local directory holding `/uploads/...`; wins over any URL.
    pub dir: Option<PathBuf>,
}

impl Default for ImageSettings {
    fn default() -> Self {
        ImageSettings {
            timeout_secs: DEFAULT_IMAGE_TIMEOUT.as_secs(),
            base_url: None,
            dir: None,
        }
    }
}

// =============================================================================
// QdeskConfig
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QdeskConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub images: ImageSettings,

    #[serde(default)]
    pub company: CompanyProfile,
}

impl QdeskConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// An explicit `path` must exist; the default path is optional.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> ConfigResult<Self> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Applies `QDESK_*` overrides read through `lookup`.
    fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<()> {
        if let Some(url) = lookup("QDESK_SERVER_URL") {
            debug!(url = %url, "Overriding server URL from environment");
            self.server.url = Some(url);
        }

        if let Some(token) = lookup("QDESK_TOKEN") {
            self.server.token = Some(token);
        }

        if let Some(name) = lookup("QDESK_COMPANY_NAME") {
            self.company.name = name;
        }

        if let Some(secs) = lookup("QDESK_IMAGE_TIMEOUT_SECS") {
            self.images.timeout_secs = secs
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("QDESK_IMAGE_TIMEOUT_SECS".to_string()))?;
        }

        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.images.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue("images.timeout_secs".to_string()));
        }
        if let Some(url) = &self.server.url {
            Url::parse(url).map_err(|_| ConfigError::InvalidValue("server.url".to_string()))?;
        }
        if let Some(url) = &self.images.base_url {
            Url::parse(url).map_err(|_| ConfigError::InvalidValue("images.base_url".to_string()))?;
        }
        Ok(())
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "qdesk", "qdesk")
            .map(|dirs| dirs.config_dir().join("qdesk.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn image_timeout(&self) -> Duration {
        Duration::from_secs(self.images.timeout_secs)
    }

    pub fn server_url(&self) -> Option<Url> {
        self.server.url.as_deref().and_then(|url| Url::parse(url).ok())
    }

    /// Image base URL, defaulting to the API server (it serves `/uploads`).
    pub fn image_base_url(&self) -> Option<Url> {
        self.images
            .base_url
            .as_deref()
            .and_then(|url| Url::parse(url).ok())
            .or_else(|| self.server_url())
    }
}
