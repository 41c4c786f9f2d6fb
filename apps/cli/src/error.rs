//! Error types for the qdesk binary.

use std::path::PathBuf;

use qdesk_core::CoreError;
use qdesk_doc::{DocError, ExtractError};

pub type CliResult<T> = Result<T, CliError>;

/// Anything that ends a command with exit code 1.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Cannot read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a quotation record: {source}")]
    InvalidRecord {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Document(#[from] DocError),

    #[error("Cannot import: {0}")]
    Extract(#[from] ExtractError),

    #[error("Server URL is not configured (set QDESK_SERVER_URL or [server] url)")]
    MissingServerUrl,

    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Import failed: {0}")]
    Rejected(String),

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
