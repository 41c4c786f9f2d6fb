//! # Validation Module
//!
//! Business rule validation for quotation input.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (serde_ext)                                  │
//! │  ├── "" / "abc" / null  →  absent  →  documented default               │
//! │  └── Never fails on a numeric field                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── validate_line: ranges checked BEFORE any arithmetic               │
//! │  └── validate_record: customer, names, at least one line               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: REST API                                                     │
//! │  └── Server-side schema checks on save                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use qdesk_core::types::LineItem;
//! use qdesk_core::validation::validate_line;
//! use rust_decimal::Decimal;
//!
//! let mut item = LineItem::priced("Cable", Decimal::ONE, Decimal::new(50, 0));
//! assert!(validate_line(&item).is_ok());
//!
//! item.discount_percent = Some(Decimal::new(150, 0));
//! assert!(validate_line(&item).is_err());
//! ```

use rust_decimal::Decimal;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{LineItem, QuotationRecord};
use crate::{MAX_LINE_QUANTITY, MAX_REF_NO_LEN, MAX_UNIT_RATE};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a percentage (discount or GST).
///
/// ## Rules
/// - Must be between 0 and 100 inclusive
pub fn validate_percent(field: &str, value: Decimal) -> ValidationResult<()> {
    if value < Decimal::ZERO || value > HUNDRED {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: 100,
        });
    }
    Ok(())
}

/// Validates a quantity.
///
/// ## Rules
/// - Must be positive (> 0); fractional quantities (metres, kg) are fine
/// - Must not exceed MAX_LINE_QUANTITY
pub fn validate_quantity(qty: Decimal) -> ValidationResult<()> {
    if qty <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > Decimal::from(MAX_LINE_QUANTITY) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit rate.
///
/// ## Rules
/// - Zero is allowed (free items, samples)
/// - Must not exceed MAX_UNIT_RATE
pub fn validate_rate(rate: Decimal) -> ValidationResult<()> {
    if rate < Decimal::ZERO {
        return Err(ValidationError::MustNotBeNegative {
            field: "rate".to_string(),
        });
    }

    if rate > Decimal::from(MAX_UNIT_RATE) {
        return Err(ValidationError::OutOfRange {
            field: "rate".to_string(),
            min: 0,
            max: MAX_UNIT_RATE,
        });
    }

    Ok(())
}

/// Validates a flat money amount (invoice discount, advance).
pub fn validate_non_negative(field: &str, value: Decimal) -> ValidationResult<()> {
    if value < Decimal::ZERO {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Line and Record Validators
// =============================================================================

/// Validates the numeric inputs of one line item.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Form: edit line 3                                                      │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_line(item) ← THIS FUNCTION                                   │
/// │       │                                                                 │
/// │       ├── qty <= 0?          → "quantity must be positive"             │
/// │       ├── rate < 0?          → "rate cannot be negative"               │
/// │       ├── discount ∉ 0..100? → "discount must be between 0 and 100"    │
/// │       ├── GST ∉ 0..100?      → "GST must be between 0 and 100"         │
/// │       │                                                                 │
/// │       └── OK → compute_line                                            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
///
/// Absent values are checked as their defaults, so a blank form row passes.
pub fn validate_line(item: &LineItem) -> ValidationResult<()> {
    validate_quantity(item.quantity())?;
    validate_rate(item.rate())?;
    validate_percent("discount", item.discount_percent())?;
    validate_percent("GST", item.gst_percent())?;
    Ok(())
}

/// Validates a customer name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 200 characters
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "customer name".to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "customer name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a whole quotation before save, render or import.
///
/// Line errors carry the 1-based line number.
pub fn validate_record(record: &QuotationRecord) -> CoreResult<()> {
    validate_customer_name(&record.customer_name)?;

    if record.items.is_empty() {
        return Err(CoreError::EmptyQuotation);
    }

    for (index, item) in record.items.iter().enumerate() {
        let line = index + 1;

        if item.display_name().is_none() {
            return Err(CoreError::InvalidLine {
                line,
                source: ValidationError::Required {
                    field: "item name".to_string(),
                },
            });
        }

        validate_line(item).map_err(|source| CoreError::InvalidLine { line, source })?;
    }

    // A blank refNo is a record the server has not numbered yet.
    if let Some(ref_no) = record.ref_no.as_deref().filter(|r| !r.trim().is_empty()) {
        validate_ref_no(ref_no)?;
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a server reference number.
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
///
/// Any characters are allowed; the download name sanitizes its own copy.
///
/// ## Example
/// ```rust
/// use qdesk_core::validation::validate_ref_no;
///
/// assert!(validate_ref_no("QT 2025/0042").is_ok());
/// assert!(validate_ref_no("  ").is_err());
/// ```
pub fn validate_ref_no(ref_no: &str) -> ValidationResult<()> {
    let ref_no = ref_no.trim();

    if ref_no.is_empty() {
        return Err(ValidationError::Required {
            field: "reference number".to_string(),
        });
    }

    if ref_no.chars().count() > MAX_REF_NO_LEN {
        return Err(ValidationError::TooLong {
            field: "reference number".to_string(),
            max: MAX_REF_NO_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
