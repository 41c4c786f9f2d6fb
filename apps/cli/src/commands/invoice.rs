//! `qdesk invoice`

use qdesk_core::format::format_money;
use qdesk_core::invoice::{compute_invoice_totals, GstType, InvoiceRecord, InvoiceTotals};
use qdesk_core::words::money_in_words;

use crate::cli::TotalsArgs;
use crate::error::CliResult;

pub fn run(args: &TotalsArgs) -> CliResult<()> {
    let invoice: InvoiceRecord = super::read_record(&args.record)?;
    let totals = compute_invoice_totals(&invoice)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&totals)?);
    } else {
        print!("{}", summary(&invoice, &totals));
    }
    Ok(())
}

fn summary(invoice: &InvoiceRecord, totals: &InvoiceTotals) -> String {
    let mut lines = vec![format!(
        "Invoice {} for {}",
        invoice.invoice_no.as_deref().unwrap_or(qdesk_core::NOT_AVAILABLE),
        invoice.customer_name
    )];
    let mut row = |label: String, value: String| lines.push(format!("{label:>20}: {value:>14}"));

    row("Sub Total".into(), format_money(totals.subtotal));
    if totals.discount.is_positive() {
        row("Discount".into(), format!("-{}", format_money(totals.discount)));
    }
    row("Taxable Amount".into(), format_money(totals.taxable_amount));
    match totals.gst_type {
        GstType::CgstSgst => {
            row(format!("CGST @{}%", invoice.cgst_rate().normalize()), format_money(totals.cgst));
            row(format!("SGST @{}%", invoice.sgst_rate().normalize()), format_money(totals.sgst));
        }
        GstType::Igst => {
            row(format!("IGST @{}%", invoice.igst_rate().normalize()), format_money(totals.igst));
        }
    }
    if totals.advance.is_positive() {
        row("Advance".into(), format!("-{}", format_money(totals.advance)));
    }
    row("Total".into(), format_money(totals.total_amount));
    lines.push(money_in_words(totals.total_amount));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
