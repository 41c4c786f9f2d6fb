//! Issuer details printed in the document header and terms block.

use serde::{Deserialize, Serialize};

/// Currency label used on the PDF. The builtin fonts have no ₹ glyph.
pub const DEFAULT_CURRENCY_LABEL: &str = "Rs.";

/// The business issuing quotations.
///
/// Loaded from the `[company]` table of the CLI config; every field is
/// optional there and falls back to [`CompanyProfile::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyProfile {
    pub name: String,
    pub tagline: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub prepared_by: String,
    /// Jurisdiction named in the last standard term.
    pub city: String,
    pub currency_label: String,
    /// Overrides the standard terms when non-empty.
    pub terms: Vec<String>,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        CompanyProfile {
            name: "Quotation app".to_string(),
            tagline: None,
            address: None,
            phone: None,
            email: None,
            website: None,
            prepared_by: "Quotations".to_string(),
            city: "Mumbai".to_string(),
            currency_label: DEFAULT_CURRENCY_LABEL.to_string(),
            terms: Vec::new(),
        }
    }
}

impl CompanyProfile {
    /// Terms printed under the totals.
    pub fn terms_and_conditions(&self) -> Vec<String> {
        if !self.terms.is_empty() {
            return self.terms.clone();
        }
        vec![
            format!("This quotation is valid for {} days from the date of issue.", qdesk_core::QUOTATION_VALIDITY_DAYS),
            "Prices are subject to change without prior notice.".to_string(),
            "Delivery timeline will be confirmed upon order confirmation.".to_string(),
            "Payment terms: 50% advance, 50% before delivery.".to_string(),
            format!("All disputes are subject to {} jurisdiction.", self.city),
        ]
    }

    /// Phone, email and website joined for the header contact line.
    pub fn contact_line(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.phone, &self.email, &self.website]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        (!parts.is_empty()).then(|| parts.join("  |  "))
    }
}
