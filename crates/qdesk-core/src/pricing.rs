//! # Pricing Engine
//!
//! Per-line GST computation and quotation totals.
//!
//! ## Per-Line Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  FORWARD (withTax = false)          REVERSE (withTax = true)            │
//! │  ─────────────────────────          ────────────────────────            │
//! │  subtotal = qty × rate              gross    = qty × rate               │
//! │                                     subtotal = gross ÷ (1 + g/100)      │
//! │              │                                   │                      │
//! │              └─────────────┬─────────────────────┘                      │
//! │                            ▼                                            │
//! │            discount = subtotal × d / 100                                │
//! │            taxable  = subtotal − discount                               │
//! │            gst      = taxable × g / 100                                 │
//! │            sgst = cgst = gst / 2                                        │
//! │            total    = taxable + gst                                     │
//! │                            │                                            │
//! │                            ▼                                            │
//! │          Money::from_decimal() on each output (once)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rounding Contract
//! Every intermediate stays an exact `Decimal`. Each output figure is
//! rounded to paise exactly once, half away from zero. Quotation totals
//! are sums of the already-rounded line figures, so a total can differ by
//! a paisa from rounding the unrounded sum. Printed documents and saved
//! totals rely on this.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::LineItem;
use crate::validation::{validate_line, ValidationResult};

const TWO: Decimal = Decimal::TWO;

// =============================================================================
// Output Types
// =============================================================================

/// Computed figures for one line, every amount rounded to paise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineTotals {
    /// `qty × rate` as entered; tax-inclusive for reverse lines.
    #[ts(type = "string")]
    pub gross_amount: Money,

    /// Pre-tax, pre-discount base.
    #[ts(type = "string")]
    pub subtotal: Money,

    #[ts(type = "string")]
    pub discount_amount: Money,

    #[ts(type = "string")]
    pub taxable_amount: Money,

    #[ts(type = "string")]
    pub gst_amount: Money,

    #[ts(type = "string")]
    pub sgst: Money,

    #[ts(type = "string")]
    pub cgst: Money,

    #[ts(type = "string")]
    pub total_amount: Money,

    /// GST rate actually applied (0 for non-taxable lines).
    #[ts(type = "string")]
    pub gst_percent: Decimal,

    pub tax_inclusive: bool,
}

/// Per-rate slice of the quotation's tax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct GstBracket {
    #[ts(type = "string")]
    pub rate: Decimal,

    /// SGST and CGST rate (half of `rate`).
    #[ts(type = "string")]
    pub half_rate: Decimal,

    pub line_count: usize,

    #[ts(type = "string")]
    pub taxable_amount: Money,

    #[ts(type = "string")]
    pub gst_amount: Money,

    #[ts(type = "string")]
    pub sgst: Money,

    #[ts(type = "string")]
    pub cgst: Money,
}

/// Quotation-level totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct QuotationSummary {
    pub line_count: usize,

    #[ts(type = "string")]
    pub subtotal: Money,

    #[ts(type = "string")]
    pub total_discount: Money,

    #[ts(type = "string")]
    pub total_taxable_amount: Money,

    #[ts(type = "string")]
    pub total_gst: Money,

    #[ts(type = "string")]
    pub total_sgst: Money,

    #[ts(type = "string")]
    pub total_cgst: Money,

    #[ts(type = "string")]
    pub grand_total: Money,

    /// What the customer saves through line discounts.
    #[ts(type = "string")]
    pub you_saved: Money,

    /// One entry per distinct GST rate, highest rate first.
    pub gst_breakdown: Vec<GstBracket>,
}

/// Line figures plus the summary, in item order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PricedQuotation {
    pub lines: Vec<LineTotals>,
    pub summary: QuotationSummary,
}

// =============================================================================
// Operations
// =============================================================================

/// Computes one line's figures.
///
/// ## Errors
/// Rejects out-of-range input before any arithmetic runs: quantity ≤ 0,
/// negative rate, discount or GST outside 0..=100. Absent values take
/// their defaults (see [`LineItem`]).
///
/// ## Example
/// ```rust
/// use qdesk_core::pricing::compute_line;
/// use qdesk_core::types::LineItem;
/// use rust_decimal::Decimal;
///
/// let mut item = LineItem::priced("Switch", Decimal::ONE, Decimal::new(118, 0));
/// item.tax_inclusive = true;
///
/// let line = compute_line(&item).unwrap();
/// assert_eq!(line.subtotal.to_string(), "100.00");
/// assert_eq!(line.gst_amount.to_string(), "18.00");
/// ```
pub fn compute_line(item: &LineItem) -> ValidationResult<LineTotals> {
    validate_line(item)?;

    let quantity = item.quantity();
    let rate = item.rate();
    let discount_percent = item.discount_percent();
    let gst_percent = item.effective_gst_percent();

    let gross = quantity * rate;
    let subtotal = if item.tax_inclusive {
        gross / (Decimal::ONE + gst_percent / Decimal::ONE_HUNDRED)
    } else {
        gross
    };

    let discount = subtotal * discount_percent / Decimal::ONE_HUNDRED;
    let taxable = subtotal - discount;
    let gst = taxable * gst_percent / Decimal::ONE_HUNDRED;
    let half = gst / TWO;
    let total = taxable + gst;

    Ok(LineTotals {
        gross_amount: Money::from_decimal(gross),
        subtotal: Money::from_decimal(subtotal),
        discount_amount: Money::from_decimal(discount),
        taxable_amount: Money::from_decimal(taxable),
        gst_amount: Money::from_decimal(gst),
        sgst: Money::from_decimal(half),
        cgst: Money::from_decimal(half),
        total_amount: Money::from_decimal(total),
        gst_percent,
        tax_inclusive: item.tax_inclusive,
    })
}

/// Sums already-rounded line figures and groups tax by rate.
///
/// Lines with a zero rate (exempt or non-taxable) contribute to the
/// totals but get no breakdown row.
pub fn aggregate(lines: &[LineTotals]) -> QuotationSummary {
    let mut brackets: BTreeMap<Decimal, GstBracket> = BTreeMap::new();

    for line in lines.iter().filter(|l| l.gst_percent > Decimal::ZERO) {
        let rate = line.gst_percent.normalize();
        let bracket = brackets.entry(rate).or_insert_with(|| GstBracket {
            rate,
            half_rate: (rate / TWO).normalize(),
            line_count: 0,
            taxable_amount: Money::zero(),
            gst_amount: Money::zero(),
            sgst: Money::zero(),
            cgst: Money::zero(),
        });
        bracket.line_count += 1;
        bracket.taxable_amount += line.taxable_amount;
        bracket.gst_amount += line.gst_amount;
        bracket.sgst += line.sgst;
        bracket.cgst += line.cgst;
    }

    let total_discount: Money = lines.iter().map(|l| l.discount_amount).sum();

    QuotationSummary {
        line_count: lines.len(),
        subtotal: lines.iter().map(|l| l.subtotal).sum(),
        total_discount,
        total_taxable_amount: lines.iter().map(|l| l.taxable_amount).sum(),
        total_gst: lines.iter().map(|l| l.gst_amount).sum(),
        total_sgst: lines.iter().map(|l| l.sgst).sum(),
        total_cgst: lines.iter().map(|l| l.cgst).sum(),
        grand_total: lines.iter().map(|l| l.total_amount).sum(),
        you_saved: total_discount,
        gst_breakdown: brackets.into_values().rev().collect(),
    }
}

/// Validates and prices every line, then aggregates.
///
/// The first invalid line aborts with its 1-based line number; no partial
/// totals are returned.
pub fn price_quotation(items: &[LineItem]) -> CoreResult<PricedQuotation> {
    let lines = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            compute_line(item).map_err(|source| CoreError::InvalidLine {
                line: index + 1,
                source,
            })
        })
        .collect::<CoreResult<Vec<_>>>()?;

    let summary = aggregate(&lines);

    tracing::debug!(
        lines = summary.line_count,
        grand_total = %summary.grand_total,
        brackets = summary.gst_breakdown.len(),
        "Priced quotation"
    );

    Ok(PricedQuotation { lines, summary })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    fn dec(mantissa: i64, scale: u32) -> Decimal {
        Decimal::new(mantissa, scale)
    }

    fn line(qty: i64, rate: Decimal, discount: i64, gst: i64, inclusive: bool) -> LineItem {
        LineItem {
            discount_percent: Some(dec(discount, 0)),
            gst_percent: Some(dec(gst, 0)),
            tax_inclusive: inclusive,
            ..LineItem::priced("Item", dec(qty, 0), rate)
        }
    }

    fn paise(m: Money) -> i64 {
        m.paise()
    }

    #[test]
    fn test_forward_scenario() {
        let totals = compute_line(&line(2, dec(100, 0), 10, 18, false)).unwrap();

        assert_eq!(paise(totals.subtotal), 20000);
        assert_eq!(paise(totals.discount_amount), 2000);
        assert_eq!(paise(totals.taxable_amount), 18000);
        assert_eq!(paise(totals.gst_amount), 3240);
        assert_eq!(paise(totals.sgst), 1620);
        assert_eq!(paise(totals.cgst), 1620);
        assert_eq!(paise(totals.total_amount), 21240);
        assert_eq!(paise(totals.gross_amount), 20000);
    }

    #[test]
    fn test_reverse_recovers_forward_scenario() {
        // 100 + 18% = 118 per unit, tax included
        let totals = compute_line(&line(2, dec(118, 0), 10, 18, true)).unwrap();

        assert_eq!(paise(totals.gross_amount), 23600);
        assert!(totals.subtotal.approx_eq(Money::from_paise(20000)));
        assert!(totals.taxable_amount.approx_eq(Money::from_paise(18000)));
        assert!(totals.total_amount.approx_eq(Money::from_paise(21240)));
    }

    #[test]
    fn test_reverse_backs_tax_out_of_inclusive_rate() {
        // 141.60 = 120.00 × 1.18
        let totals = compute_line(&line(2, dec(14160, 2), 10, 18, true)).unwrap();

        assert_eq!(paise(totals.gross_amount), 28320);
        assert_eq!(paise(totals.subtotal), 24000);
        assert_eq!(paise(totals.discount_amount), 2400);
        assert_eq!(paise(totals.taxable_amount), 21600);
        assert_eq!(paise(totals.gst_amount), 3888);
        assert_eq!(paise(totals.total_amount), 25488);
    }

    #[test]
    fn test_forward_reverse_consistency() {
        let rates = [dec(100, 0), dec(4999, 2), dec(1, 2), dec(123457, 3), dec(75, 0)];
        let gsts = [0, 5, 12, 18, 28];

        for rate in rates {
            for gst in gsts {
                for qty in [1, 3, 7] {
                    let forward = compute_line(&line(qty, rate, 0, gst, false)).unwrap();
                    let inclusive_rate = rate * (Decimal::ONE + dec(gst, 0) / Decimal::ONE_HUNDRED);
                    let reverse = compute_line(&line(qty, inclusive_rate, 0, gst, true)).unwrap();

                    assert!(
                        forward.total_amount.approx_eq(reverse.total_amount),
                        "rate {rate} gst {gst} qty {qty}: {} vs {}",
                        forward.total_amount,
                        reverse.total_amount
                    );
                }
            }
        }
    }

    #[test]
    fn test_discount_strictly_decreases_total() {
        for inclusive in [false, true] {
            let mut previous: Option<Money> = None;
            for discount in (0..=100).step_by(5) {
                let total = compute_line(&line(2, dec(100, 0), discount, 18, inclusive))
                    .unwrap()
                    .total_amount;
                if let Some(prev) = previous {
                    assert!(total < prev, "discount {discount}: {total} !< {prev}");
                }
                previous = Some(total);
            }
        }
    }

    #[test]
    fn test_tax_split_is_even() {
        let odd = compute_line(&line(1, dec(1, 2), 0, 18, false)).unwrap(); // GST 0.0018
        let cases = [
            compute_line(&line(3, dec(3333, 2), 7, 18, false)).unwrap(),
            compute_line(&line(1, dec(999, 2), 0, 5, true)).unwrap(),
            compute_line(&line(7, dec(1, 1), 0, 28, false)).unwrap(),
            odd,
        ];

        for totals in cases {
            assert_eq!(totals.sgst, totals.cgst);
            let drift = (totals.sgst + totals.cgst - totals.gst_amount).abs();
            assert!(drift <= crate::money::MONEY_TOLERANCE);
        }
    }

    #[test]
    fn test_non_taxable_line_carries_no_gst() {
        let mut item = line(2, dec(100, 0), 0, 18, false);
        item.taxable = false;

        let totals = compute_line(&item).unwrap();
        assert!(totals.gst_amount.is_zero());
        assert_eq!(paise(totals.total_amount), 20000);
        assert_eq!(totals.gst_percent, Decimal::ZERO);
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert_eq!(
            compute_line(&line(0, dec(100, 0), 0, 18, false)),
            Err(ValidationError::MustBePositive {
                field: "quantity".to_string()
            })
        );
        assert!(compute_line(&line(1, dec(-1, 0), 0, 18, false)).is_err());
        assert!(compute_line(&line(1, dec(100, 0), 101, 18, false)).is_err());
        assert!(compute_line(&line(1, dec(100, 0), 0, -5, false)).is_err());
    }

    #[test]
    fn test_missing_quantity_defaults_to_one() {
        let mut item = line(1, dec(50, 0), 0, 0, false);
        item.quantity = None;
        assert_eq!(paise(compute_line(&item).unwrap().total_amount), 5000);
    }

    #[test]
    fn test_aggregate_sums_rounded_lines() {
        // 0.335 rounds to 0.34 per line; three lines give 1.02, not round(1.005) = 1.01
        let items = vec![
            line(1, dec(335, 3), 0, 0, false),
            line(1, dec(335, 3), 0, 0, false),
            line(1, dec(335, 3), 0, 0, false),
        ];
        let priced = price_quotation(&items).unwrap();

        assert_eq!(paise(priced.summary.grand_total), 102);
        assert_eq!(paise(priced.summary.subtotal), 102);
    }

    #[test]
    fn test_aggregate_breakdown_by_rate() {
        let mut eighteen_decimal = line(1, dec(100, 0), 0, 0, false);
        eighteen_decimal.gst_percent = Some(dec(180, 1)); // "18.0" groups with 18

        let items = vec![
            line(2, dec(100, 0), 10, 18, false),
            line(1, dec(50, 0), 0, 5, false),
            eighteen_decimal,
            line(1, dec(20, 0), 0, 0, false),
        ];
        let priced = price_quotation(&items).unwrap();
        let summary = &priced.summary;

        assert_eq!(summary.line_count, 4);
        assert_eq!(summary.gst_breakdown.len(), 2);

        let top = &summary.gst_breakdown[0];
        assert_eq!(top.rate, dec(18, 0));
        assert_eq!(top.half_rate, dec(9, 0));
        assert_eq!(top.line_count, 2);
        assert_eq!(paise(top.taxable_amount), 28000);
        assert_eq!(paise(top.sgst), 1620 + 900);

        let low = &summary.gst_breakdown[1];
        assert_eq!(low.rate, dec(5, 0));
        assert_eq!(low.half_rate, dec(25, 1));
        assert_eq!(paise(low.gst_amount), 250);

        let bracket_gst: Money = summary.gst_breakdown.iter().map(|b| b.gst_amount).sum();
        assert_eq!(bracket_gst, summary.total_gst);
        assert_eq!(summary.you_saved, summary.total_discount);
        assert_eq!(
            summary.grand_total,
            summary.total_taxable_amount + summary.total_gst
        );
    }

    #[test]
    fn test_price_quotation_reports_first_bad_line() {
        let items = vec![
            line(1, dec(100, 0), 0, 18, false),
            line(1, dec(100, 0), 0, 18, false),
            line(0, dec(100, 0), 0, 18, false),
        ];

        match price_quotation(&items) {
            Err(CoreError::InvalidLine { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected InvalidLine, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_quotation_prices_to_zero() {
        let priced = price_quotation(&[]).unwrap();
        assert!(priced.lines.is_empty());
        assert!(priced.summary.grand_total.is_zero());
        assert!(priced.summary.gst_breakdown.is_empty());
    }
}
