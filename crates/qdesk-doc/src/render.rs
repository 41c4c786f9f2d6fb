//! # Quotation Renderer
//!
//! Lays out a priced quotation as an A4 landscape PDF.
//!
//! ## Page Layout
//! ```text
//! ┌───────────────────────────────────────────────────────────────────────┐
//! │ COMPANY NAME                                   address / contacts     │
//! │ tagline                                                               │
//! │                          QUOTATION                                    │
//! │                          Ref: QT-0042                                 │
//! │ Bill To: customer                       Date / Prepared By / Valid    │
//! ├──┬─────┬──────────┬──────────────┬────┬───┬────┬──────┬─────┬───┬───┤
//! │# │Image│Item Name │Description   │HSN │Qty│Unit│Price │Disc │GST│Amt│  ◄─ repeated
//! ├──┼─────┼──────────┼──────────────┼────┼───┼────┼──────┼─────┼───┼───┤     on every page
//! │1 │ img │Switch    │wrapped text… │8536│ 2 │Nos │100.00│20.00│…  │…  │
//! └──┴─────┴──────────┴──────────────┴────┴───┴────┴──────┴─────┴───┴───┘
//! │ Amount in Words                        │ Sub Total / Discount        │
//! │ You Saved                              │ SGST/CGST per rate          │
//! │                                        │ Grand Total                 │
//! │ Terms & Conditions                                                    │
//! │                  Thank you for your business!              Page 1/2   │
//! └───────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Coordinates are millimetres from the bottom-left corner (PDF space).
//! Text widths are estimated from average Helvetica glyph widths; that is
//! accurate enough for wrapping and right alignment in fixed columns.

use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Rgb,
};
use qdesk_core::format::{format_amount, format_money_with};
use qdesk_core::pricing::{LineTotals, PricedQuotation};
use qdesk_core::words::money_in_words;
use qdesk_core::{price_quotation, QuotationRecord, NOT_AVAILABLE};
use rust_decimal::Decimal;

use crate::company::CompanyProfile;
use crate::error::{DocError, DocResult};
use crate::images::ImageSlot;

// =============================================================================
// Layout Constants
// =============================================================================

const PAGE_W: f32 = 297.0;
const PAGE_H: f32 = 210.0;
const MARGIN: f32 = 10.0;
const CONTENT_RIGHT: f32 = PAGE_W - MARGIN;
const FOOTER_Y: f32 = 7.0;
/// Lowest y a table row or block may reach before a page break.
const BODY_BOTTOM: f32 = 16.0;
/// Drawable height of a fresh page.
const PAGE_BODY: f32 = PAGE_H - MARGIN - BODY_BOTTOM;

/// Wrap widths of the bill-to block; the dates block starts at x = 200.
const BILL_TO_NAME_W: f32 = 180.0;
const BILL_TO_ADDRESS_W: f32 = 120.0;

const HEADER_ROW_H: f32 = 8.0;
const IMAGE_BOX: f32 = 14.0;
const LINE_H: f32 = 4.0;
const CELL_PAD: f32 = 1.5;

const IMAGE_DPI: f32 = 300.0;
const PT_TO_MM: f32 = 0.3528;
/// Average Helvetica advance width as a fraction of the font size.
const AVG_GLYPH_EM: f32 = 0.52;

const ACCENT: (f32, f32, f32) = (0.918, 0.345, 0.047);
const MUTED: (f32, f32, f32) = (0.4, 0.4, 0.4);
const BLACK: (f32, f32, f32) = (0.0, 0.0, 0.0);

#[derive(Clone, Copy)]
enum Align {
    Left,
    Center,
    Right,
}

struct Column {
    title: &'static str,
    x: f32,
    width: f32,
    align: Align,
}

const COLUMNS: [Column; 11] = [
    Column { title: "#", x: 10.0, width: 8.0, align: Align::Left },
    Column { title: "Image", x: 18.0, width: 18.0, align: Align::Left },
    Column { title: "Item Name", x: 36.0, width: 40.0, align: Align::Left },
    Column { title: "Description", x: 76.0, width: 64.0, align: Align::Left },
    Column { title: "HSN", x: 140.0, width: 18.0, align: Align::Center },
    Column { title: "Qty", x: 158.0, width: 14.0, align: Align::Center },
    Column { title: "Unit", x: 172.0, width: 14.0, align: Align::Center },
    Column { title: "Price/Unit", x: 186.0, width: 27.0, align: Align::Right },
    Column { title: "Discount", x: 213.0, width: 24.0, align: Align::Right },
    Column { title: "GST", x: 237.0, width: 20.0, align: Align::Right },
    Column { title: "Amount", x: 257.0, width: 30.0, align: Align::Right },
];

// =============================================================================
// Public API
// =============================================================================

/// A finished PDF, ready to embed and write.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    /// `quotation-<refNo>.pdf`
    pub filename: String,
    pub page_count: usize,
}

/// Download name for a quotation.
///
/// ## Example
/// ```rust
/// use qdesk_doc::render::quotation_filename;
///
/// assert_eq!(quotation_filename(Some("QT/2025/7")), "quotation-QT_2025_7.pdf");
/// assert_eq!(quotation_filename(None), "quotation-unknown.pdf");
/// ```
pub fn quotation_filename(ref_no: Option<&str>) -> String {
    let sanitized: String = ref_no
        .unwrap_or_default()
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let stem = sanitized.trim_matches('_');
    if stem.is_empty() {
        "quotation-unknown.pdf".to_string()
    } else {
        format!("quotation-{stem}.pdf")
    }
}

/// Prices `record` and renders it.
pub fn render_quotation(
    record: &QuotationRecord,
    images: &[ImageSlot],
    company: &CompanyProfile,
) -> DocResult<RenderedDocument> {
    let priced = price_quotation(&record.items)?;
    render(record, &priced, images, company)
}

/// Renders a quotation with precomputed totals.
///
/// `images` holds one slot per item in item order; a short slice is
/// treated as missing images. Pricing is never redone here, so `priced`
/// must come from the same items.
pub fn render(
    record: &QuotationRecord,
    priced: &PricedQuotation,
    images: &[ImageSlot],
    company: &CompanyProfile,
) -> DocResult<RenderedDocument> {
    let canvas = layout(record, priced, images, company)?;
    let page_count = canvas.layers.len();
    let bytes = canvas.finish()?;

    tracing::info!(
        ref_no = record.ref_no.as_deref().unwrap_or("-"),
        items = record.items.len(),
        pages = page_count,
        bytes = bytes.len(),
        "Rendered quotation PDF"
    );

    Ok(RenderedDocument {
        bytes,
        filename: quotation_filename(record.ref_no.as_deref()),
        page_count,
    })
}

/// Draws every section; the caller serializes the result.
fn layout(
    record: &QuotationRecord,
    priced: &PricedQuotation,
    images: &[ImageSlot],
    company: &CompanyProfile,
) -> DocResult<Canvas> {
    if priced.lines.len() != record.items.len() {
        return Err(DocError::Pdf(format!(
            "{} priced lines for {} items",
            priced.lines.len(),
            record.items.len()
        )));
    }

    let title = format!("Quotation {}", record.ref_no.as_deref().unwrap_or_default());
    let mut canvas = Canvas::new(title.trim())?;

    draw_header(&mut canvas, record, company);
    draw_table_header(&mut canvas);

    let missing = ImageSlot::Missing;
    for (index, (item, line)) in record.items.iter().zip(&priced.lines).enumerate() {
        let slot = images.get(index).unwrap_or(&missing);
        draw_row(&mut canvas, company, index, item, line, slot);
    }

    draw_totals(&mut canvas, priced, company);
    draw_terms(&mut canvas, company);

    Ok(canvas)
}

// =============================================================================
// Canvas
// =============================================================================

/// Something drawn on the canvas, recorded for layout tests.
#[cfg(test)]
#[derive(Debug, Clone)]
struct Mark {
    page: usize,
    x: f32,
    y: f32,
    text: String,
}

/// Page-aware drawing surface; owns the document until `finish`.
struct Canvas {
    doc: PdfDocumentReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    layers: Vec<PdfLayerReference>,
    layer: PdfLayerReference,
    y: f32,
    /// Current fill color, carried over to new pages.
    fill: (f32, f32, f32),
    #[cfg(test)]
    marks: Vec<Mark>,
}

impl Canvas {
    fn new(title: &str) -> DocResult<Self> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_W), Mm(PAGE_H), "Page 1");
        let layer = doc.get_page(page).get_layer(layer);
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(DocError::pdf)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(DocError::pdf)?;

        Ok(Canvas {
            doc,
            regular,
            bold,
            layers: vec![layer.clone()],
            layer,
            y: PAGE_H - MARGIN,
            fill: BLACK,
            #[cfg(test)]
            marks: Vec::new(),
        })
    }

    fn new_page(&mut self) {
        let name = format!("Page {}", self.layers.len() + 1);
        let (page, layer) = self.doc.add_page(Mm(PAGE_W), Mm(PAGE_H), name);
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.layers.push(self.layer.clone());
        self.y = PAGE_H - MARGIN;
        self.apply_fill();
    }

    /// Starts a new page if `height` does not fit above the footer.
    fn ensure_space(&mut self, height: f32) -> bool {
        if self.y - height < BODY_BOTTOM {
            self.new_page();
            true
        } else {
            false
        }
    }

    /// Baseline for a flowing text line at `y`, on a new page when `y` is
    /// below the body.
    fn flow(&mut self, y: f32) -> f32 {
        if y < BODY_BOTTOM {
            self.new_page();
            self.y - 5.0
        } else {
            y
        }
    }

    fn color(&mut self, fill: (f32, f32, f32)) {
        self.fill = fill;
        self.apply_fill();
    }

    fn apply_fill(&self) {
        let (r, g, b) = self.fill;
        self.layer.set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
    }

    #[cfg(test)]
    fn mark(&mut self, x: f32, y: f32, text: &str) {
        self.marks.push(Mark {
            page: self.layers.len(),
            x,
            y,
            text: text.to_string(),
        });
    }

    #[cfg(not(test))]
    fn mark(&mut self, _x: f32, _y: f32, _text: &str) {}

    fn text(&mut self, text: &str, size: f32, x: f32, y: f32, bold: bool) {
        self.mark(x, y, text);
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.use_text(pdf_safe(text), size, Mm(x), Mm(y), font);
    }

    fn text_aligned(&mut self, text: &str, size: f32, x: f32, width: f32, y: f32, bold: bool, align: Align) {
        let w = text_width(text, size);
        let x = match align {
            Align::Left => x,
            Align::Center => x + ((width - w) / 2.0).max(0.0),
            Align::Right => (x + width - w).max(x),
        };
        self.text(text, size, x, y, bold);
    }

    fn rule(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.mark(x1.min(x2), y1.min(y2), "");
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(x1), Mm(y1)), false),
                (Point::new(Mm(x2), Mm(y2)), false),
            ],
            is_closed: false,
        });
    }

    fn frame(&mut self, x: f32, y_bottom: f32, w: f32, h: f32) {
        self.mark(x, y_bottom, "");
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(x), Mm(y_bottom)), false),
                (Point::new(Mm(x + w), Mm(y_bottom)), false),
                (Point::new(Mm(x + w), Mm(y_bottom + h)), false),
                (Point::new(Mm(x), Mm(y_bottom + h)), false),
            ],
            is_closed: true,
        });
    }

    /// Writes page footers, then serializes the document.
    fn finish(self) -> DocResult<Vec<u8>> {
        let total = self.layers.len();
        for (index, layer) in self.layers.iter().enumerate() {
            let thanks = "Thank you for your business!";
            let x = (PAGE_W - text_width(thanks, 9.0)) / 2.0;
            layer.set_fill_color(Color::Rgb(Rgb::new(MUTED.0, MUTED.1, MUTED.2, None)));
            layer.use_text(thanks, 9.0, Mm(x), Mm(FOOTER_Y), &self.bold);

            let page = format!("Page {} of {}", index + 1, total);
            let x = CONTENT_RIGHT - text_width(&page, 8.0);
            layer.use_text(page, 8.0, Mm(x), Mm(FOOTER_Y), &self.regular);
        }

        let mut writer = std::io::BufWriter::new(Vec::<u8>::new());
        self.doc.save(&mut writer).map_err(DocError::pdf)?;
        writer.into_inner().map_err(DocError::pdf)
    }
}

// =============================================================================
// Sections
// =============================================================================

fn draw_header(canvas: &mut Canvas, record: &QuotationRecord, company: &CompanyProfile) {
    let top = canvas.y;

    canvas.color(ACCENT);
    canvas.text(&company.name, 18.0, MARGIN, top - 6.0, true);
    canvas.color(MUTED);
    if let Some(tagline) = &company.tagline {
        canvas.text(tagline, 9.0, MARGIN, top - 11.0, false);
    }

    let mut right_y = top - 4.0;
    let right_x = 170.0;
    let right_w = CONTENT_RIGHT - right_x;
    if let Some(address) = &company.address {
        for line in wrap(address, right_w, 9.0) {
            canvas.text_aligned(&line, 9.0, right_x, right_w, right_y, true, Align::Right);
            right_y -= LINE_H;
        }
    }
    if let Some(contact) = company.contact_line() {
        canvas.text_aligned(&contact, 9.0, right_x, right_w, right_y, false, Align::Right);
    }

    let title_y = top - 22.0;
    canvas.color(ACCENT);
    canvas.text_aligned("QUOTATION", 20.0, MARGIN, PAGE_W - 2.0 * MARGIN, title_y, true, Align::Center);
    canvas.color(MUTED);
    let ref_line = format!("Ref: {}", record.ref_no.as_deref().unwrap_or(NOT_AVAILABLE));
    canvas.text_aligned(&ref_line, 10.0, MARGIN, PAGE_W - 2.0 * MARGIN, title_y - 6.0, false, Align::Center);

    // Dates block (right), drawn first so it stays on the first page
    let block_y = title_y - 16.0;
    let label_x = 200.0;
    let date_format = "%d/%m/%Y";
    let details = [
        ("Date:", record.business_date().format(date_format).to_string()),
        ("Prepared By:", company.prepared_by.clone()),
        ("Valid Until:", record.valid_until().format(date_format).to_string()),
    ];
    let mut detail_y = block_y;
    for (label, value) in details {
        canvas.color(MUTED);
        canvas.text(label, 10.0, label_x, detail_y, false);
        canvas.color(BLACK);
        canvas.text_aligned(&value, 10.0, label_x, CONTENT_RIGHT - label_x, detail_y, true, Align::Right);
        detail_y -= 5.5;
    }

    // Bill-to block (left); a long name or address continues on the next page
    let first_page = canvas.layers.len();
    canvas.color(ACCENT);
    canvas.text("Bill To:", 11.0, MARGIN, block_y, true);
    canvas.color(BLACK);
    let mut left_y = block_y - 5.5;
    for line in wrap(&record.customer_name, BILL_TO_NAME_W, 11.0) {
        left_y = canvas.flow(left_y);
        canvas.text(&line, 11.0, MARGIN, left_y, true);
        left_y -= 5.0;
    }
    canvas.color(MUTED);
    if let Some(address) = &record.customer_address {
        for line in wrap(address, BILL_TO_ADDRESS_W, 9.0) {
            left_y = canvas.flow(left_y);
            canvas.text(&line, 9.0, MARGIN, left_y, false);
            left_y -= LINE_H;
        }
    }

    let bottom = if canvas.layers.len() == first_page {
        left_y.min(detail_y)
    } else {
        left_y
    };
    canvas.y = bottom - 4.0;
}

fn draw_table_header(canvas: &mut Canvas) {
    canvas.ensure_space(HEADER_ROW_H + IMAGE_BOX);
    let bottom = canvas.y - HEADER_ROW_H;

    canvas.color(ACCENT);
    for column in &COLUMNS {
        canvas.frame(column.x, bottom, column.width, HEADER_ROW_H);
        canvas.text_aligned(
            column.title,
            9.0,
            column.x + CELL_PAD,
            column.width - 2.0 * CELL_PAD,
            bottom + 2.7,
            true,
            column.align,
        );
    }
    canvas.color(BLACK);
    canvas.y = bottom;
}

fn draw_row(
    canvas: &mut Canvas,
    company: &CompanyProfile,
    index: usize,
    item: &qdesk_core::LineItem,
    line: &LineTotals,
    slot: &ImageSlot,
) {
    let currency = company.currency_label.as_str();
    let inner = |col: usize| COLUMNS[col].width - 2.0 * CELL_PAD;

    let name = item.display_name().unwrap_or(NOT_AVAILABLE);
    let cells: [Vec<String>; 11] = [
        vec![(index + 1).to_string()],
        Vec::new(),
        wrap(name, inner(2), 9.0),
        wrap(item.description_or_placeholder(), inner(3), 8.0),
        vec![item.hsn_or_placeholder().to_string()],
        vec![display_decimal(item.quantity())],
        vec![item.unit_or_default().to_string()],
        price_cell(item.rate(), item.tax_inclusive, currency),
        percent_cell(line.discount_amount, item.discount_percent(), currency),
        gst_cell(line, currency),
        vec![format_money_with(line.total_amount, currency)],
    ];

    let text_lines = cells.iter().map(Vec::len).max().unwrap_or(1).max(1);
    let min_h = IMAGE_BOX + 2.0 * CELL_PAD;
    let full_h = (text_lines as f32 * LINE_H + 2.0 * CELL_PAD).max(min_h);

    // A row taller than a fresh page starts wherever its image fits and
    // carries the remaining lines onto the following pages.
    let needed = if full_h <= PAGE_BODY - HEADER_ROW_H { full_h } else { min_h };
    if canvas.ensure_space(needed) {
        draw_table_header(canvas);
    }

    let mut start = 0;
    loop {
        let room = ((canvas.y - BODY_BOTTOM - 2.0 * CELL_PAD) / LINE_H).floor().max(1.0) as usize;
        let end = (start + room).min(text_lines);
        let first = start == 0;

        let mut row_h = (end - start) as f32 * LINE_H + 2.0 * CELL_PAD;
        if first {
            row_h = row_h.max(min_h);
        }
        let top = canvas.y;
        let bottom = top - row_h;

        canvas.color(BLACK);
        for (col, column) in COLUMNS.iter().enumerate() {
            canvas.frame(column.x, bottom, column.width, row_h);

            let (size, bold) = match col {
                2 | 10 => (9.0, true),
                3 | 4 => (8.0, false),
                _ => (9.0, false),
            };
            let mut y = top - CELL_PAD - 3.0;
            for (i, text) in cells[col].iter().enumerate().take(end).skip(start) {
                // Second line of money cells is the rate note
                if i > 0 && matches!(col, 7 | 8 | 9) {
                    canvas.color(MUTED);
                    canvas.text_aligned(text, 7.0, column.x + CELL_PAD, inner(col), y, false, column.align);
                    canvas.color(BLACK);
                } else {
                    canvas.text_aligned(text, size, column.x + CELL_PAD, inner(col), y, bold, column.align);
                }
                y -= LINE_H;
            }
        }

        if first {
            draw_thumbnail(canvas, index, slot, top);
        } else {
            canvas.color(MUTED);
            canvas.text_aligned(&cells[0][0], 9.0, COLUMNS[0].x + CELL_PAD, inner(0), top - CELL_PAD - 3.0, false, Align::Left);
            canvas.color(BLACK);
        }

        canvas.y = bottom;
        if end >= text_lines {
            break;
        }
        start = end;
        canvas.new_page();
        draw_table_header(canvas);
    }
}

fn draw_thumbnail(canvas: &mut Canvas, index: usize, slot: &ImageSlot, top: f32) {
    let image_x = COLUMNS[1].x + (COLUMNS[1].width - IMAGE_BOX) / 2.0;
    let image_y = top - CELL_PAD - IMAGE_BOX;
    let drawn = match slot {
        ImageSlot::Ready(bytes) => draw_image(&canvas.layer, bytes, image_x, image_y),
        _ => false,
    };
    if drawn {
        canvas.mark(image_x, image_y, "");
        return;
    }

    if let ImageSlot::Ready(_) = slot {
        tracing::warn!(line = index + 1, "Image could not be decoded, using placeholder");
    }
    canvas.color(MUTED);
    canvas.frame(image_x, image_y, IMAGE_BOX, IMAGE_BOX);
    canvas.text_aligned("No Image", 6.0, image_x, IMAGE_BOX, image_y + IMAGE_BOX / 2.0 - 1.0, false, Align::Center);
    canvas.color(BLACK);
}

fn draw_totals(canvas: &mut Canvas, priced: &PricedQuotation, company: &CompanyProfile) {
    let summary = &priced.summary;
    let currency = company.currency_label.as_str();

    let mut rows: Vec<(String, String, bool)> = vec![(
        "Sub Total:".to_string(),
        format_money_with(summary.subtotal, currency),
        false,
    )];
    if summary.total_discount.is_positive() {
        rows.push((
            "Discount:".to_string(),
            format!("- {}", format_money_with(summary.total_discount, currency)),
            false,
        ));
    }
    rows.push((
        "Taxable Amount:".to_string(),
        format_money_with(summary.total_taxable_amount, currency),
        false,
    ));
    for bracket in &summary.gst_breakdown {
        let half = display_decimal(bracket.half_rate);
        let rate = display_decimal(bracket.rate);
        rows.push((
            format!("SGST @{half}% (on {rate}%):"),
            format!("+ {}", format_money_with(bracket.sgst, currency)),
            false,
        ));
        rows.push((
            format!("CGST @{half}% (on {rate}%):"),
            format!("+ {}", format_money_with(bracket.cgst, currency)),
            false,
        ));
    }
    rows.push((
        "Grand Total:".to_string(),
        format_money_with(summary.grand_total, currency),
        true,
    ));

    let words = money_in_words(summary.grand_total);
    let word_lines = wrap(&words, 150.0, 10.0);
    let block_h = (rows.len() as f32 * 5.5 + 6.0).max(word_lines.len() as f32 * LINE_H + 16.0);
    canvas.ensure_space((block_h + 4.0).min(PAGE_BODY));

    let first_page = canvas.layers.len();
    let top = canvas.y - 7.0;

    // Left: amount in words and savings
    canvas.color(ACCENT);
    canvas.text("Amount in Words:", 11.0, MARGIN, top, true);
    canvas.color(BLACK);
    let mut y = top - 5.5;
    for line in &word_lines {
        canvas.text(line, 10.0, MARGIN, y, false);
        y -= LINE_H;
    }
    if summary.you_saved.is_positive() {
        y -= 2.0;
        canvas.color((0.086, 0.639, 0.290));
        canvas.text(
            &format!("You Saved: {}", format_money_with(summary.you_saved, currency)),
            10.0,
            MARGIN,
            y,
            true,
        );
        canvas.color(BLACK);
    }

    // Right: amount summary; many GST rates continue on the next page
    let label_x = 190.0;
    let value_w = CONTENT_RIGHT - label_x;
    let mut y = top;
    for (label, value, emphasis) in &rows {
        let size = if *emphasis {
            y = canvas.flow(y - 1.5);
            canvas.color(ACCENT);
            canvas.rule(label_x, y + 6.0, CONTENT_RIGHT, y + 6.0);
            12.0
        } else {
            y = canvas.flow(y);
            9.5
        };
        canvas.text(label, size, label_x, y, *emphasis);
        canvas.text_aligned(value, size, label_x, value_w, y, *emphasis, Align::Right);
        y -= 5.5;
    }
    canvas.color(BLACK);

    canvas.y = if canvas.layers.len() == first_page {
        top - block_h
    } else {
        y - 2.0
    };
}

fn draw_terms(canvas: &mut Canvas, company: &CompanyProfile) {
    let terms = company.terms_and_conditions();
    let lines: Vec<String> = terms
        .iter()
        .flat_map(|term| {
            wrap(&format!("- {term}"), PAGE_W - 2.0 * MARGIN, 8.5)
        })
        .collect();

    canvas.ensure_space((lines.len() as f32 * LINE_H + 8.0).min(PAGE_BODY));
    let mut y = canvas.y - 4.0;

    canvas.color(BLACK);
    canvas.text("Terms & Conditions", 11.0, MARGIN, y, true);
    y -= 5.0;
    canvas.color(MUTED);
    for line in &lines {
        y = canvas.flow(y);
        canvas.text(line, 8.5, MARGIN, y, false);
        y -= LINE_H;
    }
    canvas.color(BLACK);
    canvas.y = y;
}

// =============================================================================
// Cells
// =============================================================================

fn price_cell(rate: Decimal, inclusive: bool, currency: &str) -> Vec<String> {
    let mut cell = vec![format!("{currency} {}", format_amount(rate))];
    if inclusive {
        cell.push("(Incl. Tax)".to_string());
    }
    cell
}

fn percent_cell(amount: qdesk_core::Money, percent: Decimal, currency: &str) -> Vec<String> {
    if percent.is_zero() {
        return vec!["-".to_string()];
    }
    vec![
        format_money_with(amount, currency),
        format!("({}%)", display_decimal(percent)),
    ]
}

fn gst_cell(line: &LineTotals, currency: &str) -> Vec<String> {
    if line.gst_percent.is_zero() {
        return vec![NOT_AVAILABLE.to_string()];
    }
    vec![
        format_money_with(line.gst_amount, currency),
        format!("({}%)", display_decimal(line.gst_percent)),
    ]
}

/// `18`, `2.5`, `0.75`: no trailing zeros.
fn display_decimal(value: Decimal) -> String {
    value.normalize().to_string()
}

// =============================================================================
// Images
// =============================================================================

/// Draws an image scaled to fit the thumbnail box. Returns false when the
/// bytes cannot be decoded.
fn draw_image(layer: &PdfLayerReference, bytes: &[u8], x: f32, y: f32) -> bool {
    use printpdf::image_crate::GenericImageView;

    let decoded = match printpdf::image_crate::load_from_memory(bytes) {
        Ok(decoded) => decoded,
        Err(err) => {
            tracing::debug!(error = %err, "Image decode failed");
            return false;
        }
    };

    let (px_w, px_h) = GenericImageView::dimensions(&decoded);
    if px_w == 0 || px_h == 0 {
        return false;
    }

    let natural_w = px_w as f32 / IMAGE_DPI * 25.4;
    let natural_h = px_h as f32 / IMAGE_DPI * 25.4;
    let scale = (IMAGE_BOX / natural_w).min(IMAGE_BOX / natural_h);
    let offset_x = (IMAGE_BOX - natural_w * scale) / 2.0;
    let offset_y = (IMAGE_BOX - natural_h * scale) / 2.0;

    Image::from_dynamic_image(&decoded).add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(x + offset_x)),
            translate_y: Some(Mm(y + offset_y)),
            scale_x: Some(scale),
            scale_y: Some(scale),
            dpi: Some(IMAGE_DPI),
            ..Default::default()
        },
    );
    true
}

// =============================================================================
// Text Helpers
// =============================================================================

fn char_width(size: f32) -> f32 {
    size * AVG_GLYPH_EM * PT_TO_MM
}

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * char_width(size)
}

/// Greedy word wrap to an estimated column width; long words are split.
fn wrap(text: &str, width: f32, size: f32) -> Vec<String> {
    let max_chars = ((width / char_width(size)).floor() as usize).max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }

            let needed = if current.is_empty() { word.len() } else { current.chars().count() + 1 + word.len() };
            if needed > max_chars && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.extend(word);
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Builtin PDF fonts only cover Latin-1.
fn pdf_safe(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '₹' => out.push_str("Rs."),
            '\u{2013}' | '\u{2014}' => out.push('-'),
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201c}' | '\u{201d}' => out.push('"'),
            c if c.is_control() => out.push(' '),
            c if (c as u32) <= 0xff => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use qdesk_core::LineItem;

    fn record(lines: usize) -> QuotationRecord {
        let mut record: QuotationRecord = serde_json::from_str(
            r#"{"refNo": "QT-0042", "customerName": "Acme Interiors",
                "customerAddress": "12 MG Road, Pune", "date": "2025-01-15", "items": []}"#,
        )
        .unwrap();
        record.items = (0..lines)
            .map(|i| LineItem {
                description: Some("Wall-mounted smart switch with a rather long description that wraps".to_string()),
                discount_percent: Some(Decimal::new(10, 0)),
                ..LineItem::priced(&format!("Switch {}", i + 1), Decimal::TWO, Decimal::ONE_HUNDRED)
            })
            .collect();
        record
    }

    fn png_bytes() -> Vec<u8> {
        use printpdf::image_crate::{ImageOutputFormat, RgbImage};
        let img = RgbImage::from_pixel(4, 2, printpdf::image_crate::Rgb([200, 80, 10]));
        let mut out = std::io::Cursor::new(Vec::new());
        printpdf::image_crate::DynamicImage::ImageRgb8(img)
            .write_to(&mut out, ImageOutputFormat::Png)
            .unwrap();
        out.into_inner()
    }

    fn laid_out(record: &QuotationRecord) -> Canvas {
        let priced = price_quotation(&record.items).unwrap();
        layout(record, &priced, &[], &CompanyProfile::default()).unwrap()
    }

    fn lowest_y(canvas: &Canvas) -> f32 {
        canvas.marks.iter().map(|m| m.y).fold(f32::INFINITY, f32::min)
    }

    #[test]
    fn test_renders_pdf_with_filename() {
        let record = record(2);
        let doc = render_quotation(&record, &[], &CompanyProfile::default()).unwrap();

        assert!(doc.bytes.starts_with(b"%PDF"));
        assert_eq!(doc.filename, "quotation-QT-0042.pdf");
        assert_eq!(doc.page_count, 1);
    }

    #[test]
    fn test_long_quotation_paginates() {
        let record = record(40);
        let doc = render_quotation(&record, &[], &CompanyProfile::default()).unwrap();
        assert!(doc.page_count > 1, "expected several pages, got {}", doc.page_count);
    }

    #[test]
    fn test_tall_row_continues_on_next_page() {
        let mut record = record(1);
        record.items[0].description = Some("word ".repeat(600));
        let canvas = laid_out(&record);

        assert!(canvas.layers.len() > 1);
        assert!(lowest_y(&canvas) >= BODY_BOTTOM, "drawn at y = {}", lowest_y(&canvas));

        let words: usize = canvas.marks.iter().map(|m| m.text.matches("word").count()).sum();
        assert_eq!(words, 600);
        assert!(canvas.marks.iter().any(|m| m.page > 1 && m.text.starts_with("word")));
    }

    #[test]
    fn test_long_address_is_printed_in_full() {
        let mut record = record(1);
        let address: Vec<String> = (1..=60).map(|i| format!("Address line {i}")).collect();
        record.customer_address = Some(address.join("\n"));
        let canvas = laid_out(&record);

        for line in &address {
            assert!(canvas.marks.iter().any(|m| &m.text == line), "missing {line}");
        }
        assert!(canvas.layers.len() > 1);
        assert!(lowest_y(&canvas) >= BODY_BOTTOM);
    }

    #[test]
    fn test_long_customer_name_wraps_before_dates() {
        let mut record = record(1);
        record.customer_name = "Shree Ganesh Interior Decorators and Modular Furniture Works Private \
            Limited, Unit of the Kothrud Industrial Co-operative Society"
            .to_string();
        let canvas = laid_out(&record);

        let name_lines: Vec<&Mark> = canvas
            .marks
            .iter()
            .filter(|m| m.x == MARGIN && !m.text.is_empty() && record.customer_name.contains(m.text.as_str()))
            .collect();
        assert!(name_lines.len() > 1);
        for mark in &name_lines {
            assert!(mark.x + text_width(&mark.text, 11.0) <= 200.0, "{} runs into the dates", mark.text);
        }
        let joined: Vec<&str> = name_lines.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(joined.join(" "), record.customer_name);
    }

    #[test]
    fn test_many_gst_rates_stay_on_the_page() {
        let mut record = record(40);
        for (i, item) in record.items.iter_mut().enumerate() {
            item.gst_percent = Some(Decimal::from(i as i64 + 1));
        }
        let canvas = laid_out(&record);

        assert!(lowest_y(&canvas) >= BODY_BOTTOM, "drawn at y = {}", lowest_y(&canvas));
        assert!(canvas.marks.iter().any(|m| m.text == "SGST @0.5% (on 1%):"));
        assert!(canvas.marks.iter().any(|m| m.text == "CGST @20% (on 40%):"));
        assert!(canvas.marks.iter().any(|m| m.text == "Grand Total:"));
    }

    #[test]
    fn test_images_and_placeholders_render() {
        let record = record(3);
        let images = vec![
            ImageSlot::Ready(png_bytes()),
            ImageSlot::Ready(b"definitely not an image".to_vec()),
            ImageSlot::Unavailable {
                reason: "timed out".to_string(),
            },
        ];

        let doc = render_quotation(&record, &images, &CompanyProfile::default()).unwrap();
        assert!(doc.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_rejects_mismatched_totals() {
        let record = record(2);
        let priced = price_quotation(&record.items[..1]).unwrap();
        assert!(render(&record, &priced, &[], &CompanyProfile::default()).is_err());
    }

    #[test]
    fn test_invalid_line_is_pricing_error() {
        let mut record = record(1);
        record.items[0].quantity = Some(Decimal::ZERO);
        assert!(matches!(
            render_quotation(&record, &[], &CompanyProfile::default()),
            Err(DocError::Pricing(_))
        ));
    }

    #[test]
    fn test_quotation_filename() {
        assert_eq!(quotation_filename(Some("QT-0042")), "quotation-QT-0042.pdf");
        assert_eq!(quotation_filename(Some("QT/2025/7")), "quotation-QT_2025_7.pdf");
        assert_eq!(quotation_filename(Some("  ")), "quotation-unknown.pdf");
        assert_eq!(quotation_filename(None), "quotation-unknown.pdf");
    }

    #[test]
    fn test_wrap() {
        let lines = wrap("one two three four five six", char_width(10.0) * 9.5, 10.0);
        assert_eq!(lines, vec!["one two", "three", "four five", "six"]);

        let split = wrap("abcdefghij", char_width(10.0) * 4.5, 10.0);
        assert_eq!(split, vec!["abcd", "efgh", "ij"]);

        assert_eq!(wrap("", 50.0, 10.0), vec![String::new()]);
    }

    #[test]
    fn test_pdf_safe() {
        assert_eq!(pdf_safe("₹ 100 – net"), "Rs. 100 - net");
        assert_eq!(pdf_safe("Café"), "Café");
        assert_eq!(pdf_safe("日本"), "??");
    }

    #[test]
    fn test_display_decimal() {
        assert_eq!(display_decimal(Decimal::new(180, 1)), "18");
        assert_eq!(display_decimal(Decimal::new(25, 1)), "2.5");
    }
}
