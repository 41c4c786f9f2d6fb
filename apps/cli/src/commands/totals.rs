//! `qdesk totals`

use qdesk_core::format::{format_amount, format_money};
use qdesk_core::validation::validate_record;
use qdesk_core::words::money_in_words;
use qdesk_core::{price_quotation, PricedQuotation, QuotationRecord, NOT_AVAILABLE};

use crate::cli::TotalsArgs;
use crate::error::CliResult;

pub fn run(args: &TotalsArgs) -> CliResult<()> {
    let record: QuotationRecord = super::read_record(&args.record)?;
    validate_record(&record)?;
    let priced = price_quotation(&record.items)?;

    tracing::info!(
        lines = priced.lines.len(),
        grand_total = %priced.summary.grand_total,
        "Priced quotation"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&priced)?);
    } else {
        print!("{}", table(&record, &priced));
    }
    Ok(())
}

/// Plain-text rendering of the priced quotation.
fn table(record: &QuotationRecord, priced: &PricedQuotation) -> String {
    let summary = &priced.summary;

    let mut lines = vec![
        format!(
            "Quotation {} for {} ({})",
            record.ref_no.as_deref().unwrap_or(NOT_AVAILABLE),
            record.customer_name,
            record.business_date().format("%d/%m/%Y")
        ),
        format!(
            "{:>3}  {:<28} {:>8} {:>12} {:>10} {:>12} {:>10} {:>12}",
            "#", "Item", "Qty", "Rate", "Discount", "Taxable", "GST", "Amount"
        ),
    ];

    for (index, (item, line)) in record.items.iter().zip(&priced.lines).enumerate() {
        let mut name: String = item.display_name().unwrap_or(NOT_AVAILABLE).chars().take(28).collect();
        if item.tax_inclusive {
            name = format!("{}*", name.chars().take(27).collect::<String>());
        }
        lines.push(format!(
            "{:>3}  {:<28} {:>8} {:>12} {:>10} {:>12} {:>10} {:>12}",
            index + 1,
            name,
            item.quantity().normalize(),
            format_amount(item.rate()),
            format_money(line.discount_amount),
            format_money(line.taxable_amount),
            format_money(line.gst_amount),
            format_money(line.total_amount),
        ));
    }

    lines.push(String::new());
    let mut row = |label: &str, value: String| lines.push(format!("{label:>30}: {value:>14}"));
    row("Sub Total", format_money(summary.subtotal));
    if summary.total_discount.is_positive() {
        row("Discount", format!("-{}", format_money(summary.total_discount)));
    }
    row("Taxable Amount", format_money(summary.total_taxable_amount));
    for bracket in &summary.gst_breakdown {
        let rate = bracket.rate.normalize();
        let half = bracket.half_rate.normalize();
        row(&format!("SGST @{half}% (on {rate}%)"), format_money(bracket.sgst));
        row(&format!("CGST @{half}% (on {rate}%)"), format_money(bracket.cgst));
    }
    row("Grand Total", format_money(summary.grand_total));
    if summary.you_saved.is_positive() {
        row("You Saved", format_money(summary.you_saved));
    }
    lines.push(money_in_words(summary.grand_total));
    if record.items.iter().any(|item| item.tax_inclusive) {
        lines.push("* rate includes GST".to_string());
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use qdesk_core::LineItem;
    use rust_decimal::Decimal;

    #[test]
    fn test_table_lists_lines_and_breakdown() {
        let mut record: QuotationRecord = serde_json::from_str(
            r#"{"refNo": "QT-1", "customerName": "Acme", "date": "2025-01-15", "items": []}"#,
        )
        .unwrap();
        let mut switch = LineItem::priced("Smart Switch", Decimal::TWO, Decimal::ONE_HUNDRED);
        switch.discount_percent = Some(Decimal::TEN);
        record.items = vec![switch];

        let priced = price_quotation(&record.items).unwrap();
        let text = table(&record, &priced);

        assert!(text.starts_with("Quotation QT-1 for Acme (15/01/2025)"));
        assert!(text.contains("Smart Switch"));
        assert!(text.contains("SGST @9% (on 18%)"));
        assert!(text.contains("212.40"));
        assert!(text.contains("You Saved"));
        assert!(text.contains("Two Hundred Twelve Rupees and Forty Paisa Only"));
        assert!(text.ends_with("Only\n"));
        assert!(text.contains("\n\n"));
        assert!(!text.contains("rate includes GST"));
    }
}
