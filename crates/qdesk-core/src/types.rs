//! # Domain Types
//!
//! Record types exchanged with the REST API and embedded in exported PDFs.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌───────────────────────┐        ┌───────────────────────┐            │
//! │  │   QuotationRecord     │ 1    * │      LineItem         │            │
//! │  │  ──────────────────   │───────►│  ──────────────────   │            │
//! │  │  _id (server)         │        │  itemId (catalog ref) │            │
//! │  │  refNo (server)       │        │  itemName             │            │
//! │  │  customerName         │        │  quantity, rate       │            │
//! │  │  date                 │        │  withTax (inclusive)  │            │
//! │  │  totalAmount (derived)│        │  discount %, taxGST % │            │
//! │  └───────────────────────┘        │  itemImage            │            │
//! │                                   └───────────┬───────────┘            │
//! │                                               │ itemId                  │
//! │                                   ┌───────────▼───────────┐            │
//! │                                   │    ItemReference      │            │
//! │                                   │  Id("65f1…")          │            │
//! │                                   │  Catalog { itemName } │            │
//! │                                   └───────────────────────┘            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Shape
//! Field names follow the API's camelCase JSON. Numbers arrive as JSON
//! numbers or as form strings and are decoded leniently (see
//! [`crate::serde_ext`]); an empty or unparseable value means "use the
//! default", never an error.

use chrono::{DateTime, Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::money::Money;
use crate::serde_ext::{business_date, lenient_bool, lenient_decimal, optional_instant};
use crate::{
    DEFAULT_GST_PERCENT, DEFAULT_ITEM_UNIT, NOT_AVAILABLE, NO_DESCRIPTION, QUOTATION_VALIDITY_DAYS,
};

/// Top-level keys the server assigns and that never survive an import.
pub const SERVER_MANAGED_KEYS: [&str; 4] = ["_id", "createdAt", "updatedAt", "__v"];

// =============================================================================
// Item Reference
// =============================================================================

/// Link from a line to the item catalog.
///
/// The API returns either the bare catalog id or, when populated, the
/// catalog entry itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum ItemReference {
    Id(String),
    Catalog(CatalogItem),
}

impl ItemReference {
    /// The catalog id, if one is present and non-empty.
    pub fn catalog_id(&self) -> Option<&str> {
        let id = match self {
            ItemReference::Id(id) => Some(id.as_str()),
            ItemReference::Catalog(item) => item.id.as_deref(),
        };
        id.map(str::trim).filter(|s| !s.is_empty())
    }

    fn catalog(&self) -> Option<&CatalogItem> {
        match self {
            ItemReference::Catalog(item) => Some(item),
            ItemReference::Id(_) => None,
        }
    }
}

/// A populated catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CatalogItem {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, alias = "hsnCode", skip_serializing_if = "Option::is_none")]
    pub hsn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_unit: Option<String>,

    /// Catalog fields this crate does not interpret (price, stock, ...).
    #[serde(flatten)]
    #[ts(skip)]
    pub extra: Map<String, Value>,
}

// =============================================================================
// Item Image
// =============================================================================

/// An uploaded product image. The asset itself is owned by the image host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ItemImage {
    pub url: String,

    #[serde(default)]
    pub public_id: String,
}

// =============================================================================
// Line Item
// =============================================================================

/// One row of a quotation.
///
/// ## Tax Mode
/// ```text
/// withTax = false  →  rate is PRE-tax   →  forward:  total = taxable × (1 + g)
/// withTax = true   →  rate INCLUDES tax →  reverse:  base  = gross ÷ (1 + g)
/// ```
/// Exactly one path is active per line; see [`crate::pricing::compute_line`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItem {
    #[serde(rename = "itemId", default, skip_serializing_if = "Option::is_none")]
    pub item_reference: Option<ItemReference>,

    #[serde(rename = "itemName", default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hsn_code: Option<String>,

    #[serde(rename = "itemUnit", default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    /// Absent or unparseable means 1.
    #[serde(default, deserialize_with = "lenient_decimal::deserialize", skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | null")]
    pub quantity: Option<Decimal>,

    /// Absent or unparseable means 0.
    #[serde(default, deserialize_with = "lenient_decimal::deserialize", skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | null")]
    pub rate: Option<Decimal>,

    #[serde(rename = "withTax", default, deserialize_with = "lenient_bool::deserialize")]
    pub tax_inclusive: bool,

    #[serde(rename = "discount", default, deserialize_with = "lenient_decimal::deserialize", skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | null")]
    pub discount_percent: Option<Decimal>,

    #[serde(rename = "taxGST", default, deserialize_with = "lenient_decimal::deserialize", skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | null")]
    pub gst_percent: Option<Decimal>,

    /// Non-taxable lines (exempt goods) carry no GST in either mode.
    #[serde(default = "default_taxable")]
    pub taxable: bool,

    #[serde(rename = "itemImage", default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ItemImage>,
}

fn default_taxable() -> bool {
    true
}

impl Default for LineItem {
    fn default() -> Self {
        LineItem::blank()
    }
}

impl LineItem {
    /// A blank form row: quantity 1, GST 18%, tax-exclusive.
    pub fn blank() -> Self {
        LineItem {
            item_reference: None,
            name: String::new(),
            description: None,
            hsn_code: None,
            unit: None,
            quantity: Some(Decimal::ONE),
            rate: None,
            tax_inclusive: false,
            discount_percent: None,
            gst_percent: Some(DEFAULT_GST_PERCENT),
            taxable: true,
            image: None,
        }
    }

    /// Convenience constructor used by tests and the CLI.
    pub fn priced(name: &str, quantity: Decimal, rate: Decimal) -> Self {
        LineItem {
            name: name.to_string(),
            quantity: Some(quantity),
            rate: Some(rate),
            ..LineItem::blank()
        }
    }

    #[inline]
    pub fn quantity(&self) -> Decimal {
        self.quantity.unwrap_or(Decimal::ONE)
    }

    #[inline]
    pub fn rate(&self) -> Decimal {
        self.rate.unwrap_or(Decimal::ZERO)
    }

    #[inline]
    pub fn discount_percent(&self) -> Decimal {
        self.discount_percent.unwrap_or(Decimal::ZERO)
    }

    #[inline]
    pub fn gst_percent(&self) -> Decimal {
        self.gst_percent.unwrap_or(DEFAULT_GST_PERCENT)
    }

    /// GST rate that actually applies: zero for non-taxable lines.
    pub fn effective_gst_percent(&self) -> Decimal {
        if self.taxable {
            self.gst_percent()
        } else {
            Decimal::ZERO
        }
    }

    /// The line's own name, else the catalog entry's name.
    pub fn display_name(&self) -> Option<&str> {
        non_blank(Some(self.name.as_str())).or_else(|| {
            self.catalog()
                .and_then(|c| non_blank(c.item_name.as_deref()))
        })
    }

    /// Catalog description wins over the line's own copy.
    pub fn description_or_placeholder(&self) -> &str {
        self.catalog()
            .and_then(|c| non_blank(c.description.as_deref()))
            .or_else(|| non_blank(self.description.as_deref()))
            .unwrap_or(NO_DESCRIPTION)
    }

    pub fn hsn_or_placeholder(&self) -> &str {
        self.catalog()
            .and_then(|c| non_blank(c.hsn.as_deref()))
            .or_else(|| non_blank(self.hsn_code.as_deref()))
            .unwrap_or(NOT_AVAILABLE)
    }

    pub fn unit_or_default(&self) -> &str {
        self.catalog()
            .and_then(|c| non_blank(c.item_unit.as_deref()))
            .or_else(|| non_blank(self.unit.as_deref()))
            .unwrap_or(DEFAULT_ITEM_UNIT)
    }

    /// Image location, if the line has a non-empty one.
    pub fn image_url(&self) -> Option<&str> {
        self.image.as_ref().and_then(|img| non_blank(Some(img.url.as_str())))
    }

    fn catalog(&self) -> Option<&CatalogItem> {
        self.item_reference.as_ref().and_then(ItemReference::catalog)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

// =============================================================================
// Quotation Record
// =============================================================================

/// A quotation as stored by the API.
///
/// ## Lifecycle
/// ```text
/// new() / API fetch ──► edited in memory ──► recompute_total() ──► POST
///                                   │
///                                   └──► render + embed ──► PDF download
///                                                              │
///                          into_template() ◄── extract ◄───────┘
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct QuotationRecord {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Server-assigned business reference; absent for new records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_no: Option<String>,

    pub customer_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_address: Option<String>,

    #[serde(deserialize_with = "business_date::deserialize")]
    #[ts(as = "String")]
    pub date: DateTime<Utc>,

    pub items: Vec<LineItem>,

    /// Derived; recomputed before every save or render.
    #[serde(default, deserialize_with = "lenient_decimal::deserialize", skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | null")]
    pub total_amount: Option<Decimal>,

    #[serde(default, deserialize_with = "optional_instant::deserialize", skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "optional_instant::deserialize", skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Top-level fields this crate does not interpret (status, notes, ...).
    #[serde(flatten)]
    #[ts(skip)]
    pub extra: Map<String, Value>,
}

impl QuotationRecord {
    /// A fresh quotation with one blank line item.
    pub fn new(customer_name: impl Into<String>, date: NaiveDate) -> Self {
        QuotationRecord {
            id: None,
            ref_no: None,
            customer_name: customer_name.into(),
            customer_address: None,
            date: date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc(),
            items: vec![LineItem::blank()],
            total_amount: None,
            created_at: None,
            updated_at: None,
            extra: Map::new(),
        }
    }

    /// Calendar date of the quotation (UTC).
    pub fn business_date(&self) -> NaiveDate {
        self.date.date_naive()
    }

    /// Last day the quoted prices hold.
    pub fn valid_until(&self) -> NaiveDate {
        let date = self.business_date();
        date.checked_add_days(Days::new(QUOTATION_VALIDITY_DAYS))
            .unwrap_or(date)
    }

    /// Re-derives `totalAmount` from the items.
    ///
    /// The stored total is never trusted; this runs before every save.
    pub fn recompute_total(&mut self) -> CoreResult<Money> {
        let priced = crate::pricing::price_quotation(&self.items)?;
        let total = priced.summary.grand_total;
        self.total_amount = Some(total.to_decimal());
        Ok(total)
    }

    /// Drops server identity and audit fields so the record can be
    /// posted as a brand-new quotation.
    pub fn into_template(mut self) -> Self {
        self.id = None;
        self.created_at = None;
        self.updated_at = None;
        for key in SERVER_MANAGED_KEYS {
            self.extra.remove(key);
        }
        self
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const API_RECORD: &str = r#"{
        "_id": "65f1c0ffee0000000000abcd",
        "refNo": "QT-0042",
        "customerName": "Acme Interiors",
        "date": "2025-01-15T00:00:00.000Z",
        "status": "Pending",
        "__v": 0,
        "createdAt": "2025-01-15T09:12:00.000Z",
        "updatedAt": "2025-01-16T11:00:00.000Z",
        "totalAmount": "212.40",
        "items": [
            {
                "itemId": { "_id": "65f1aa", "itemName": "Smart Switch", "hsn": "8536", "itemUnit": "Pcs", "price": 999 },
                "itemName": "",
                "quantity": "2",
                "rate": "100",
                "withTax": false,
                "subTotal": "212.40",
                "discount": "10",
                "taxGST": "18",
                "SGST": "16.20",
                "CGST": "16.20",
                "itemImage": { "url": "/uploads/switch.png", "publicId": "" }
            },
            {
                "itemId": "",
                "itemName": "Installation",
                "quantity": "",
                "rate": 500,
                "discount": "",
                "taxGST": 18,
                "itemImage": null
            }
        ]
    }"#;

    #[test]
    fn test_decodes_api_record() {
        let record: QuotationRecord = serde_json::from_str(API_RECORD).unwrap();

        assert_eq!(record.id.as_deref(), Some("65f1c0ffee0000000000abcd"));
        assert_eq!(record.ref_no.as_deref(), Some("QT-0042"));
        assert_eq!(record.items.len(), 2);
        assert_eq!(record.extra.get("status"), Some(&Value::from("Pending")));

        let first = &record.items[0];
        assert_eq!(first.display_name(), Some("Smart Switch"));
        assert_eq!(first.hsn_or_placeholder(), "8536");
        assert_eq!(first.unit_or_default(), "Pcs");
        assert_eq!(first.quantity(), Decimal::new(2, 0));
        assert_eq!(first.discount_percent(), Decimal::new(10, 0));
        assert_eq!(first.image_url(), Some("/uploads/switch.png"));

        let second = &record.items[1];
        assert_eq!(second.quantity(), Decimal::ONE);
        assert_eq!(second.discount_percent(), Decimal::ZERO);
        assert_eq!(second.unit_or_default(), "Nos");
        assert_eq!(second.description_or_placeholder(), "No description available");
        assert_eq!(second.hsn_or_placeholder(), "N/A");
        assert!(second.item_reference.as_ref().unwrap().catalog_id().is_none());
    }

    #[test]
    fn test_accepts_plain_form_date() {
        let json = r#"{"customerName": "Walk-in", "date": "2025-03-01", "items": []}"#;
        let record: QuotationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.business_date(), NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    }

    #[test]
    fn test_valid_until_is_thirty_days_later() {
        let record = QuotationRecord::new("Acme", NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
        assert_eq!(record.valid_until(), NaiveDate::from_ymd_opt(2025, 2, 14).unwrap());
    }

    #[test]
    fn test_new_record_has_one_blank_line() {
        let record = QuotationRecord::new("Acme", NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
        assert_eq!(record.items.len(), 1);
        assert_eq!(record.items[0].quantity(), Decimal::ONE);
        assert_eq!(record.items[0].gst_percent(), DEFAULT_GST_PERCENT);
        assert!(!record.items[0].tax_inclusive);
    }

    #[test]
    fn test_into_template_strips_server_fields() {
        let record: QuotationRecord = serde_json::from_str(API_RECORD).unwrap();
        let template = record.clone().into_template();

        assert!(template.id.is_none());
        assert!(template.created_at.is_none());
        assert!(template.updated_at.is_none());
        assert!(!template.extra.contains_key("__v"));

        assert_eq!(template.ref_no, record.ref_no);
        assert_eq!(template.items, record.items);
        assert_eq!(template.extra.get("status"), record.extra.get("status"));

        let json = serde_json::to_value(&template).unwrap();
        assert!(json.get("_id").is_none());
        assert!(json.get("createdAt").is_none());
    }

    #[test]
    fn test_recompute_total_ignores_stored_total() {
        let mut record: QuotationRecord = serde_json::from_str(API_RECORD).unwrap();
        record.total_amount = Some(Decimal::new(1, 0));

        let total = record.recompute_total().unwrap();

        // 212.40 (switches) + 590.00 (installation)
        assert_eq!(total, Money::from_paise(80240));
        assert_eq!(record.total_amount, Some(Decimal::new(80240, 2)));
    }

    #[test]
    fn test_wire_round_trip_is_lossless() {
        let record: QuotationRecord = serde_json::from_str(API_RECORD).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        let back: QuotationRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
