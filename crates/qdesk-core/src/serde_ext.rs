//! Permissive decoders for form-entered JSON.
//!
//! The console posts whatever the form fields hold: `"2"`, `2`, `""`,
//! `null`, or nothing at all. Every numeric field decodes to
//! `Option<Decimal>` and the caller applies the documented default.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

/// Parses a decimal from JSON text, accepting scientific notation.
fn parse_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// `Option<Decimal>` that treats empty or non-numeric input as absent.
pub mod lenient_decimal {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Number(n)) => parse_decimal(&n.to_string()),
            Some(Value::String(s)) => parse_decimal(&s),
            _ => None,
        })
    }
}

/// Booleans that may arrive as `"true"`/`"false"` strings.
pub mod lenient_bool {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Bool(b)) => b,
            Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
            _ => false,
        })
    }
}

/// Parses `YYYY-MM-DD` (form input) or an RFC 3339 instant (API) into UTC.
pub fn parse_business_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(instant.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Quotation date: either form of [`parse_business_date`].
pub mod business_date {
    use super::*;
    use serde::de::Error;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        parse_business_date(&text)
            .ok_or_else(|| D::Error::custom(format!("invalid date '{}'", text)))
    }
}

/// Optional audit timestamp; unparseable values are dropped.
pub mod optional_instant {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(s)) => parse_business_date(&s),
            _ => None,
        })
    }
}
