//! # qdesk-core: Pure Pricing Logic for qdesk Quotations
//!
//! This crate owns every number that appears on a quotation. It contains
//! the GST pricing engine and its supporting types as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        qdesk Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    qdesk CLI (apps/cli)                         │   │
//! │  │        totals ──► render ──► import ──► (submit to API)         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              qdesk-doc (PDF render / embed / extract)           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ qdesk-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  pricing  │  │  invoice  │  │ validation│  │   │
//! │  │   │ LineItem  │  │compute_ln │  │ CGST/SGST │  │   rules   │  │   │
//! │  │   │ Quotation │  │ aggregate │  │   IGST    │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                  │   │
//! │  │   │   money   │  │   words   │  │  format   │                  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO FILES • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Quotation record and line item wire types
//! - [`money`] - Rounded rupee amounts in integer paise
//! - [`pricing`] - Forward/reverse GST per line and quotation totals
//! - [`invoice`] - Invoice-level CGST/SGST or IGST totals
//! - [`words`] - Indian-system amount in words
//! - [`format`] - Lakh/crore digit grouping for display
//! - [`validation`] - Business rule validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use qdesk_core::pricing::compute_line;
//! use qdesk_core::types::LineItem;
//! use rust_decimal::Decimal;
//!
//! let mut item = LineItem::priced("Smart Switch", Decimal::new(2, 0), Decimal::new(100, 0));
//! item.discount_percent = Some(Decimal::new(10, 0));
//!
//! let line = compute_line(&item).unwrap();
//! assert_eq!(line.taxable_amount.to_string(), "180.00");
//! assert_eq!(line.total_amount.to_string(), "212.40");
//! ```

use rust_decimal::Decimal;

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod format;
pub mod invoice;
pub mod money;
pub mod pricing;
pub mod serde_ext;
pub mod types;
pub mod validation;
pub mod words;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{aggregate, compute_line, price_quotation, LineTotals, PricedQuotation, QuotationSummary};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// GST rate applied when a line does not state one.
pub const DEFAULT_GST_PERCENT: Decimal = Decimal::from_parts(18, 0, 0, false, 0);

/// Days a quotation's prices hold after its date.
pub const QUOTATION_VALIDITY_DAYS: u64 = 30;

/// Unit of measure when neither the line nor the catalog names one.
pub const DEFAULT_ITEM_UNIT: &str = "Nos";

/// Shown in place of a missing description.
pub const NO_DESCRIPTION: &str = "No description available";

/// Shown in place of a missing HSN code or name.
pub const NOT_AVAILABLE: &str = "N/A";

/// Largest quantity accepted on one line.
///
/// ## Business Reason
/// Catches a mistyped quantity (an extra zero or two) and keeps every
/// intermediate product comfortably inside decimal range.
pub const MAX_LINE_QUANTITY: i64 = 1_000_000;

/// Largest unit rate accepted (₹100 crore).
pub const MAX_UNIT_RATE: i64 = 1_000_000_000;

/// Maximum length of a server reference number.
pub const MAX_REF_NO_LEN: usize = 50;
