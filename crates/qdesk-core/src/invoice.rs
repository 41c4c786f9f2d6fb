//! # Invoice Totals
//!
//! Invoices tax the whole document rather than each line.
//!
//! ```text
//! lines:     qty × rate ──► Σ ──► subtotal
//!                                   │ − discount (flat ₹)
//!                                   ▼
//!                               taxable
//!            ┌──────────────────────┴──────────────────────┐
//!   gstType = cgst_sgst                             gstType = igst
//!   cgst = taxable × cgstRate                       igst = taxable × igstRate
//!   sgst = taxable × sgstRate
//!            └──────────────────────┬──────────────────────┘
//!                                   ▼
//!                 total = taxable + tax − advance (flat ₹)
//! ```
//!
//! CGST/SGST and IGST never both apply to one invoice.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::serde_ext::lenient_decimal;
use crate::validation::{validate_non_negative, validate_percent, validate_quantity, validate_rate};

const DEFAULT_HALF_RATE: Decimal = Decimal::from_parts(9, 0, 0, false, 0);

// =============================================================================
// Types
// =============================================================================

/// Document-level tax regime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum GstType {
    /// Intra-state supply: central + state tax.
    #[default]
    CgstSgst,
    /// Inter-state supply: integrated tax.
    Igst,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceLine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,

    #[serde(default)]
    pub item_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hsn_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    #[serde(default, deserialize_with = "lenient_decimal::deserialize", skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | null")]
    pub quantity: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient_decimal::deserialize", skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | null")]
    pub rate: Option<Decimal>,
}

/// An invoice as posted by the invoice form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_no: Option<String>,

    #[serde(default)]
    pub customer_name: String,

    #[serde(rename = "customerGSTIN", default, skip_serializing_if = "Option::is_none")]
    pub customer_gstin: Option<String>,

    pub items: Vec<InvoiceLine>,

    #[serde(default)]
    pub gst_type: GstType,

    #[serde(default, deserialize_with = "lenient_decimal::deserialize", skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | null")]
    pub cgst_rate: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient_decimal::deserialize", skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | null")]
    pub sgst_rate: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient_decimal::deserialize", skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | null")]
    pub igst_rate: Option<Decimal>,

    /// Flat rupee discount on the subtotal.
    #[serde(default, deserialize_with = "lenient_decimal::deserialize", skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | null")]
    pub discount: Option<Decimal>,

    /// Flat rupee amount already received.
    #[serde(default, deserialize_with = "lenient_decimal::deserialize", skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | null")]
    pub advance: Option<Decimal>,

    #[serde(flatten)]
    #[ts(skip)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceTotals {
    pub gst_type: GstType,

    #[ts(type = "string")]
    pub subtotal: Money,

    #[ts(type = "string")]
    pub discount: Money,

    #[ts(type = "string")]
    pub taxable_amount: Money,

    #[ts(type = "string")]
    pub cgst: Money,

    #[ts(type = "string")]
    pub sgst: Money,

    #[ts(type = "string")]
    pub igst: Money,

    /// `cgst + sgst + igst`.
    #[ts(type = "string")]
    pub tax_amount: Money,

    #[ts(type = "string")]
    pub advance: Money,

    /// Balance due after the advance.
    #[ts(type = "string")]
    pub total_amount: Money,
}

impl InvoiceRecord {
    pub fn cgst_rate(&self) -> Decimal {
        self.cgst_rate.unwrap_or(DEFAULT_HALF_RATE)
    }

    pub fn sgst_rate(&self) -> Decimal {
        self.sgst_rate.unwrap_or(DEFAULT_HALF_RATE)
    }

    pub fn igst_rate(&self) -> Decimal {
        self.igst_rate.unwrap_or(crate::DEFAULT_GST_PERCENT)
    }
}

// =============================================================================
// Computation
// =============================================================================

/// Computes invoice totals.
///
/// Line amounts are rounded per line and summed; each tax is rounded once
/// from the rounded taxable amount.
///
/// ## Errors
/// - A line with quantity ≤ 0 or a negative rate (1-based line number)
/// - Any tax rate outside 0..=100
/// - Negative discount or advance
/// - Discount above the subtotal, or advance above taxable + tax
pub fn compute_invoice_totals(invoice: &InvoiceRecord) -> CoreResult<InvoiceTotals> {
    validate_percent("CGST rate", invoice.cgst_rate())?;
    validate_percent("SGST rate", invoice.sgst_rate())?;
    validate_percent("IGST rate", invoice.igst_rate())?;

    let discount_value = invoice.discount.unwrap_or(Decimal::ZERO);
    let advance_value = invoice.advance.unwrap_or(Decimal::ZERO);
    validate_non_negative("discount", discount_value)?;
    validate_non_negative("advance", advance_value)?;

    let mut subtotal = Money::zero();
    for (index, line) in invoice.items.iter().enumerate() {
        let quantity = line.quantity.unwrap_or(Decimal::ONE);
        let rate = line.rate.unwrap_or(Decimal::ZERO);
        validate_quantity(quantity)
            .and_then(|_| validate_rate(rate))
            .map_err(|source| CoreError::InvalidLine {
                line: index + 1,
                source,
            })?;
        subtotal += Money::from_decimal(quantity * rate);
    }

    let discount = Money::from_decimal(discount_value);
    if discount > subtotal {
        return Err(CoreError::ExceedsAmount {
            field: "discount".to_string(),
            amount: discount,
            limit_name: "subtotal".to_string(),
            limit: subtotal,
        });
    }
    let taxable = subtotal - discount;

    let tax_on = |rate: Decimal| Money::from_decimal(taxable.to_decimal() * rate / Decimal::ONE_HUNDRED);
    let (cgst, sgst, igst) = match invoice.gst_type {
        GstType::CgstSgst => (tax_on(invoice.cgst_rate()), tax_on(invoice.sgst_rate()), Money::zero()),
        GstType::Igst => (Money::zero(), Money::zero(), tax_on(invoice.igst_rate())),
    };
    let tax_amount = cgst + sgst + igst;

    let advance = Money::from_decimal(advance_value);
    let gross = taxable + tax_amount;
    if advance > gross {
        return Err(CoreError::ExceedsAmount {
            field: "advance".to_string(),
            amount: advance,
            limit_name: "invoice value".to_string(),
            limit: gross,
        });
    }

    Ok(InvoiceTotals {
        gst_type: invoice.gst_type,
        subtotal,
        discount,
        taxable_amount: taxable,
        cgst,
        sgst,
        igst,
        tax_amount,
        advance,
        total_amount: gross - advance,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
