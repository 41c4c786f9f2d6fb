//! # qdesk-doc: Quotation Document Codec
//!
//! Produces the printable quotation and reads it back.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  QuotationRecord ──► price_quotation ──► PricedQuotation                │
//! │        │                                       │                        │
//! │        ├──► resolve_images (concurrent) ──┐    │                        │
//! │        │                                  ▼    ▼                        │
//! │        │                            render::render ──► PDF bytes        │
//! │        │                                                  │             │
//! │        └───────────────────────────► codec::embed ◄───────┘             │
//! │                                           │                             │
//! │                                           ▼                             │
//! │                              quotation-<ref>.pdf on disk                │
//! │                                           │                             │
//! │     template record ◄──── codec::extract ◄┘                             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`render`] - A4 landscape layout with paginated item table
//! - [`codec`] - Record trailer embed/extract
//! - [`images`] - Image sources and concurrent resolution
//! - [`company`] - Issuer header, contacts and terms
//! - [`error`] - Document error types
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use qdesk_core::QuotationRecord;
//! use qdesk_doc::{embed, extract, render_quotation, CompanyProfile};
//!
//! # fn demo(record: QuotationRecord) -> Result<(), Box<dyn std::error::Error>> {
//! let doc = render_quotation(&record, &[], &CompanyProfile::default())?;
//! let file = embed(&doc.bytes, &record)?;
//! std::fs::write(&doc.filename, &file)?;
//!
//! let template = extract(&std::fs::read(&doc.filename)?)?;
//! assert!(template.id.is_none());
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod company;
pub mod error;
pub mod images;
pub mod render;

pub use codec::{embed, extract, RECORD_MARKER};
pub use company::CompanyProfile;
pub use error::{DocError, DocResult, ExtractError, ImageFetchError, MalformedRecord};
pub use images::{resolve_images, FsImageSource, HttpImageSource, ImageSlot, ImageSource, DEFAULT_IMAGE_TIMEOUT};
pub use render::{quotation_filename, render, render_quotation, RenderedDocument};

// =============================================================================
// Integration Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use qdesk_core::{LineItem, QuotationRecord};
    use rust_decimal::Decimal;

    #[test]
    fn test_rendered_file_imports_as_template() {
        let mut record: QuotationRecord = serde_json::from_str(
            r#"{"_id": "65f1", "refNo": "QT-7", "customerName": "Acme",
                "date": "2025-03-01", "createdAt": "2025-03-01T10:00:00Z", "items": []}"#,
        )
        .unwrap();
        record.items = vec![
            LineItem::priced("Smart Switch", Decimal::TWO, Decimal::ONE_HUNDRED),
            LineItem {
                tax_inclusive: true,
                ..LineItem::priced("Installation", Decimal::ONE, Decimal::new(11800, 2))
            },
        ];

        let doc = render_quotation(&record, &[], &CompanyProfile::default()).unwrap();
        let file = embed(&doc.bytes, &record).unwrap();
        let template = extract(&file).unwrap();

        assert_eq!(doc.filename, "quotation-QT-7.pdf");
        assert!(template.id.is_none());
        assert!(template.created_at.is_none());
        assert_eq!(template.items, record.items);

        // Re-pricing the template gives the same totals as the original
        let before = qdesk_core::price_quotation(&record.items).unwrap();
        let after = qdesk_core::price_quotation(&template.items).unwrap();
        assert_eq!(before.summary, after.summary);
    }
}
