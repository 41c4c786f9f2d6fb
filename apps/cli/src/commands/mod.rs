//! Subcommand handlers.
//!
//! Each handler reads its inputs, calls into qdesk-core / qdesk-doc, and
//! prints to stdout. Nothing here does arithmetic of its own.

pub mod import;
pub mod invoice;
pub mod render;
pub mod totals;

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{CliError, CliResult};

/// Reads and decodes a JSON record file.
///
/// Accepts either the bare record or the API envelope
/// `{"status": .., "result": {...}}`.
pub(crate) fn read_record<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    let invalid = |source| CliError::InvalidRecord {
        path: path.to_path_buf(),
        source,
    };

    let mut value: serde_json::Value = serde_json::from_str(&text).map_err(invalid)?;
    if let Some(result) = value.get_mut("result").filter(|r| r.is_object()) {
        value = result.take();
    }
    serde_json::from_value(value).map_err(invalid)
}

/// Writes bytes, creating parent directories.
pub(crate) fn write_file(path: &Path, bytes: &[u8]) -> CliResult<()> {
    let write_err = |source| CliError::WriteFile {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, bytes).map_err(write_err)
}
