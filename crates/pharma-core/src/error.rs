//! # Error Types
//!
//! Domain-specific error types for pharma-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  pharma-core errors (this file)                                        │
//! │  ├── CoreError        - Business rule violations (stock, invoice)      │
//! │  └── ValidationError  - Form input failures                            │
//! │                                                                         │
//! │  pharma-store errors (separate crate)                                  │
//! │  └── StoreError       - JSON file read/write failures                  │
//! │                                                                         │
//! │  HTTP API errors (in apps/server)                                      │
//! │  └── ApiError         - What the dashboard sees (serialized)           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Dashboard              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product name, barcode, ID)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations, mostly raised while a
/// cashier is building a quick invoice.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product has no stock left at all.
    ///
    /// ## User Workflow
    /// ```text
    /// Scan barcode 6291041500213
    ///      │
    ///      ▼
    /// Panadol Extra: quantityInStock = 0
    ///      │
    ///      ▼
    /// OutOfStock { name: "Panadol Extra" }
    ///      │
    ///      ▼
    /// Dashboard toast: "Panadol Extra is out of stock"
    /// ```
    #[error("{name} is out of stock")]
    OutOfStock { name: String },

    /// Scanning again would sell more units than are on the shelf.
    #[error("Maximum stock reached for {name}: only {available} available")]
    MaxStockReached { name: String, available: i64 },

    /// The draft invoice has no lines.
    #[error("At least one item is required for a sale.")]
    EmptyInvoice,

    /// Draft invoice has exceeded maximum allowed lines.
    #[error("Invoice cannot have more than {max} items")]
    InvoiceTooLarge { max: usize },

    /// A draft invoice operation referenced a product that is not on it.
    #[error("Product {0} is not on the invoice")]
    NotOnInvoice(String),

    /// A reorder suggestion did not match the data it was built from.
    #[error("Invalid order suggestion: {reason}")]
    InvalidSuggestion { reason: String },

    /// Validation error (wraps ValidationError).
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when form input doesn't meet requirements.
/// Product and sale forms report every failing field at once through
/// [`ValidationError::Multiple`].
#[derive(Debug, Error)]
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

    /// Value must not be negative.
    #[error("{field} must be non-negative")]
    Negative { field: String },

    /// Invalid format (e.g., invalid UUID, invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// A free-form rule message, used where the form has fixed wording.
    #[error("{0}")]
    Rule(String),

    /// Several fields failed; messages are joined with ", ".
    #[error("{}", join_messages(.0))]
    Multiple(Vec<ValidationError>),
}

impl ValidationError {
    /// Folds a list of failures into a single error.
    ///
    /// ## Returns
    /// * `None` - the list is empty
    /// * `Some(single)` - exactly one failure, returned as-is
    /// * `Some(Multiple)` - two or more failures
    pub fn collect(mut errors: Vec<ValidationError>) -> Option<ValidationError> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(ValidationError::Multiple(errors)),
        }
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
