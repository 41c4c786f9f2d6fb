//! # Error Types
//!
//! Domain-specific error types for qdesk-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  qdesk-core errors (this file)                                         │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  qdesk-doc errors (separate crate)                                     │
//! │  ├── DocError         - Rendering failures                             │
//! │  └── ExtractError     - Embedded record recovery failures              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DocError → CliError → stderr      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, line number)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to an inline form message

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A single line item failed validation.
    ///
    /// ## When This Occurs
    /// - Quantity typed as 0 or negative
    /// - Discount or GST outside 0..=100
    /// - Blank item name on submit
    ///
    /// ```text
    /// Line 3: discount 150
    ///      │
    ///      ▼
    /// InvalidLine { line: 3, source: OutOfRange { field: "discount", .. } }
    ///      │
    ///      ▼
    /// Form shows: "Line 3: discount must be between 0 and 100"
    /// ```
    #[error("Line {line}: {source}")]
    InvalidLine {
        line: usize,
        #[source]
        source: ValidationError,
    },

    /// The quotation has no line items at all.
    #[error("Quotation must contain at least one line item")]
    EmptyQuotation,

    /// A flat invoice deduction is larger than what it is deducted from.
    #[error("{field} ({amount}) exceeds {limit_name} ({limit})")]
    ExceedsAmount {
        field: String,
        amount: Money,
        limit_name: String,
        limit: Money,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before any arithmetic runs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., reference number with path separators).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
