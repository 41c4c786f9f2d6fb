//! # Amount in Words
//!
//! Indian numbering: the scale words after thousand are lakh (10⁵) and
//! crore (10⁷), and everything above a crore is counted in crores.
//!
//! ```text
//! 1,23,45,67,890
//! └┬─┘ └┬┘ └┬┘ └┬─┘
//!  │    │   │   └── Eight Hundred Ninety
//!  │    │   └────── Sixty Seven Thousand
//!  │    └────────── Forty Five Lakh
//!  └─────────────── One Hundred Twenty Three Crore
//! ```

use rust_decimal::Decimal;

use crate::money::Money;

const ONES: [&str; 20] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten", "Eleven",
    "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen", "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

const CRORE: u64 = 10_000_000;
const LAKH: u64 = 100_000;
const THOUSAND: u64 = 1_000;

/// Spells out a whole number using lakh and crore.
///
/// Words are separated by single spaces; no trailing "Only".
///
/// ## Example
/// ```rust
/// use qdesk_core::words::number_to_words;
///
/// assert_eq!(number_to_words(0), "Zero");
/// assert_eq!(number_to_words(100_000), "One Lakh");
/// assert_eq!(number_to_words(1_234_567), "Twelve Lakh Thirty Four Thousand Five Hundred Sixty Seven");
/// ```
pub fn number_to_words(n: u64) -> String {
    if n == 0 {
        return "Zero".to_string();
    }
    let mut words = Vec::new();
    push_words(n, &mut words);
    words.join(" ")
}

fn push_words(n: u64, out: &mut Vec<&'static str>) {
    if n >= CRORE {
        push_words(n / CRORE, out);
        out.push("Crore");
        push_words(n % CRORE, out);
    } else if n >= LAKH {
        push_below_hundred(n / LAKH, out);
        out.push("Lakh");
        push_words(n % LAKH, out);
    } else if n >= THOUSAND {
        push_below_hundred(n / THOUSAND, out);
        out.push("Thousand");
        push_words(n % THOUSAND, out);
    } else if n >= 100 {
        out.push(ONES[(n / 100) as usize]);
        out.push("Hundred");
        push_below_hundred(n % 100, out);
    } else {
        push_below_hundred(n, out);
    }
}

fn push_below_hundred(n: u64, out: &mut Vec<&'static str>) {
    match n {
        0 => {}
        1..=19 => out.push(ONES[n as usize]),
        _ => {
            out.push(TENS[(n / 10) as usize]);
            if n % 10 != 0 {
                out.push(ONES[(n % 10) as usize]);
            }
        }
    }
}

/// Rupees and paisa in words, as printed under the grand total.
///
/// The amount is first rounded to paise. Negative amounts are prefixed
/// with "Minus".
///
/// ## Example
/// ```rust
/// use qdesk_core::words::amount_in_words;
/// use rust_decimal::Decimal;
///
/// assert_eq!(
///     amount_in_words(Decimal::new(21240, 2)),
///     "Two Hundred Twelve Rupees and Forty Paisa Only"
/// );
/// assert_eq!(amount_in_words(Decimal::ZERO), "Zero Rupees Only");
/// ```
pub fn amount_in_words(amount: Decimal) -> String {
    money_in_words(Money::from_decimal(amount))
}

/// [`amount_in_words`] for an already-rounded amount.
pub fn money_in_words(amount: Money) -> String {
    let sign = if amount.is_negative() { "Minus " } else { "" };
    let amount = amount.abs();
    let rupees = number_to_words(amount.rupees().unsigned_abs());

    match amount.paise_part() {
        0 => format!("{sign}{rupees} Rupees Only"),
        paise => format!(
            "{sign}{rupees} Rupees and {} Paisa Only",
            number_to_words(paise.unsigned_abs())
        ),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
