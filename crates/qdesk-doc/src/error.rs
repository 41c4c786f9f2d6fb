//! # Document Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Document Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────────┐  ┌─────────────────────┐ │
//! │  │    Rendering    │  │     Extraction      │  │    Image Fetch      │ │
//! │  │                 │  │                     │  │   (never fatal)     │ │
//! │  │  Pdf            │  │  NoDataFound        │  │  NotFound           │ │
//! │  │  Pricing        │  │  MalformedRecord    │  │  Http / Status      │ │
//! │  │  Serialize      │  │   ├ Encoding        │  │  Io                 │ │
//! │  │                 │  │   ├ Json            │  │  InvalidReference   │ │
//! │  │                 │  │   └ Invalid         │  │  Timeout            │ │
//! │  └─────────────────┘  └─────────────────────┘  └─────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Image fetch errors never leave this crate as failures: they become an
//! [`crate::images::ImageSlot::Unavailable`] placeholder.

use qdesk_core::CoreError;
use thiserror::Error;

/// Result type alias for rendering and embedding.
pub type DocResult<T> = Result<T, DocError>;

// =============================================================================
// Rendering / Embedding
// =============================================================================

#[derive(Debug, Error)]
pub enum DocError {
    /// printpdf failed to build or save the document.
    #[error("PDF generation failed: {0}")]
    Pdf(String),

    /// The record could not be priced (invalid line).
    #[error("Cannot price quotation: {0}")]
    Pricing(#[from] CoreError),

    /// The record could not be serialized for embedding.
    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl DocError {
    pub(crate) fn pdf(err: impl std::fmt::Display) -> Self {
        DocError::Pdf(err.to_string())
    }
}

// =============================================================================
// Extraction
// =============================================================================

/// Failure to recover an embedded record.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Neither the footer nor the legacy marker is present.
    #[error("No quotation data found in file")]
    NoDataFound,

    /// A block was found but does not hold a usable record.
    #[error("Embedded quotation data is malformed: {0}")]
    MalformedRecord(#[from] MalformedRecord),
}

#[derive(Debug, Error)]
pub enum MalformedRecord {
    #[error("not valid UTF-8")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("not a quotation record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Invalid(#[from] CoreError),
}

// =============================================================================
// Image Fetch
// =============================================================================

#[derive(Debug, Error)]
pub enum ImageFetchError {
    #[error("Image not found: {0}")]
    NotFound(String),

    #[error("Invalid image reference '{reference}': {reason}")]
    InvalidReference { reference: String, reason: String },

    #[error("Image host returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image fetch timed out after {0:?}")]
    Timeout(std::time::Duration),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_record_message() {
        let json_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = ExtractError::from(MalformedRecord::from(json_err));
        assert!(err.to_string().starts_with("Embedded quotation data is malformed: not a quotation record"));
    }

    #[test]
    fn test_no_data_message() {
        assert_eq!(ExtractError::NoDataFound.to_string(), "No quotation data found in file");
    }
}
