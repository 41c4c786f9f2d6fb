//! Display formatting for amounts (en-IN grouping).
//!
//! Grouping is a presentation concern: nothing in [`crate::pricing`]
//! produces or parses these strings.
//!
//! ```text
//! 1234567.5  ──►  12,34,567.50
//!                 └┬┘ └┬┘ └┬┘
//!                  2   2   3   (last group of three, then pairs)
//! ```

use rust_decimal::Decimal;

use crate::money::Money;

/// Inserts Indian-style separators into a run of ASCII digits.
///
/// ## Example
/// ```rust
/// use qdesk_core::format::group_indian;
///
/// assert_eq!(group_indian("1234567"), "12,34,567");
/// assert_eq!(group_indian("999"), "999");
/// ```
pub fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, last_three) = digits.split_at(digits.len() - 3);
    let mut pairs: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        pairs.push(&head[start..end]);
        end = start;
    }
    pairs.reverse();

    format!("{},{}", pairs.join(","), last_three)
}

/// Grouped amount with exactly two decimals, e.g. `-1,05,000.00`.
pub fn format_money(amount: Money) -> String {
    let sign = if amount.is_negative() { "-" } else { "" };
    let abs = amount.abs();
    format!(
        "{sign}{}.{:02}",
        group_indian(&abs.rupees().to_string()),
        abs.paise_part()
    )
}

/// [`format_money`] after rounding to paise.
pub fn format_amount(amount: Decimal) -> String {
    format_money(Money::from_decimal(amount))
}

/// Amount with a currency label, e.g. `Rs. 2,12,400.00`.
///
/// The sign goes before the label.
pub fn format_currency(amount: Decimal, symbol: &str) -> String {
    format_money_with(Money::from_decimal(amount), symbol)
}

pub fn format_money_with(amount: Money, symbol: &str) -> String {
    let sign = if amount.is_negative() { "-" } else { "" };
    format!("{sign}{symbol} {}", format_money(amount.abs()))
}
