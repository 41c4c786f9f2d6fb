//! # Embedded Record Codec
//!
//! A rendered quotation carries its source record after the PDF body so the
//! file can be imported again without the database.
//!
//! ## Trailer Layout
//! ```text
//! ┌──────────────┬────────────────────────────────┬─────────────┬───────────┬──────────┐
//! │  PDF bytes   │ "\n\n__QUOTATION_DATA__\n\n"   │ record JSON │ len u64LE │ QDSKREC1 │
//! │  (%%EOF)     │  separator                     │ (len bytes) │ (8 bytes) │ (magic)  │
//! └──────────────┴────────────────────────────────┴─────────────┴───────────┴──────────┘
//!                                                               └──── 16-byte footer ───┘
//! ```
//!
//! PDF readers stop at `%%EOF`, so the trailer is invisible when printing.
//!
//! ## Extraction Order
//! 1. Footer: magic matches, length fits, separator sits right before the
//!    JSON → decode exactly that slice.
//! 2. Legacy: files written before the footer existed end with
//!    `separator + JSON`. Split on the LAST `__QUOTATION_DATA__`, trim, decode.
//!
//! The footer makes the block self-delimiting, so a marker string inside
//! the PDF body or inside the record itself cannot confuse extraction.

use qdesk_core::validation::validate_record;
use qdesk_core::QuotationRecord;

use crate::error::{DocResult, ExtractError, MalformedRecord};

/// Token that introduces the embedded record.
pub const RECORD_MARKER: &str = "__QUOTATION_DATA__";

const SEPARATOR: &[u8] = b"\n\n__QUOTATION_DATA__\n\n";
const FOOTER_MAGIC: &[u8; 8] = b"QDSKREC1";
const FOOTER_LEN: usize = 16;

// =============================================================================
// Embed
// =============================================================================

/// Appends `record` to `document` using the trailer layout above.
///
/// The record is written in its full wire form (identity fields included);
/// they are stripped on extraction.
pub fn embed(document: &[u8], record: &QuotationRecord) -> DocResult<Vec<u8>> {
    let json = serde_json::to_vec(record)?;

    let mut out = Vec::with_capacity(document.len() + SEPARATOR.len() + json.len() + FOOTER_LEN);
    out.extend_from_slice(document);
    out.extend_from_slice(SEPARATOR);
    out.extend_from_slice(&json);
    out.extend_from_slice(&(json.len() as u64).to_le_bytes());
    out.extend_from_slice(FOOTER_MAGIC);

    tracing::debug!(
        document_bytes = document.len(),
        record_bytes = json.len(),
        "Embedded quotation record"
    );
    Ok(out)
}

// =============================================================================
// Extract
// =============================================================================

/// Recovers the embedded record as a template for re-creation.
///
/// ## Errors
/// - [`ExtractError::NoDataFound`]: no footer and no marker
/// - [`ExtractError::MalformedRecord`]: a block exists but is not UTF-8,
///   not a quotation record, or fails record validation
///
/// ## Example
/// ```rust
/// use qdesk_doc::codec::extract;
/// use qdesk_doc::ExtractError;
///
/// assert!(matches!(extract(b"%PDF-1.3 ... %%EOF"), Err(ExtractError::NoDataFound)));
/// ```
pub fn extract(bytes: &[u8]) -> Result<QuotationRecord, ExtractError> {
    let payload = match footer_payload(bytes) {
        Some(payload) => payload,
        None => {
            tracing::debug!("No record footer, trying legacy marker");
            legacy_payload(bytes).ok_or(ExtractError::NoDataFound)?
        }
    };

    let record = decode(payload)?;
    tracing::info!(
        ref_no = record.ref_no.as_deref().unwrap_or("-"),
        items = record.items.len(),
        "Extracted embedded quotation"
    );
    Ok(record.into_template())
}

fn footer_payload(bytes: &[u8]) -> Option<&[u8]> {
    let footer_start = bytes.len().checked_sub(FOOTER_LEN)?;
    let (body, footer) = bytes.split_at(footer_start);
    let (len_bytes, magic) = footer.split_at(8);
    if magic != FOOTER_MAGIC {
        return None;
    }

    let len = usize::try_from(u64::from_le_bytes(len_bytes.try_into().ok()?)).ok()?;
    let json_start = body.len().checked_sub(len)?;
    let (head, json) = body.split_at(json_start);
    head.ends_with(SEPARATOR).then_some(json)
}

fn legacy_payload(bytes: &[u8]) -> Option<&[u8]> {
    let marker = RECORD_MARKER.as_bytes();
    let start = bytes
        .windows(marker.len())
        .rposition(|window| window == marker)?;
    Some(bytes[start + marker.len()..].trim_ascii())
}

fn decode(payload: &[u8]) -> Result<QuotationRecord, MalformedRecord> {
    let text = std::str::from_utf8(payload)?;
    let record: QuotationRecord = serde_json::from_str(text.trim())?;
    validate_record(&record)?;
    Ok(record)
}

// =============================================================================
// Unit Tests
// =============================================================================
