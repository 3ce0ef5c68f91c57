//! # pharma-core: Pure Business Logic for PharmaEase
//!
//! Domain types and rules for a pharmacy's inventory and counter sales.
//! Nothing in this crate touches the disk, the network or the clock.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        PharmaEase Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Dashboard (browser)                          │   │
//! │  │   Inventory ──► Quick Invoice ──► Reports ──► Smart Order       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP / JSON                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/server (axum)                           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ pharma-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ inventory │  │  invoice  │  │  reorder  │  │   │
//! │  │   │  Product  │  │  Summary  │  │  Invoice  │  │  Advisor  │  │   │
//! │  │   │   Sale    │  │  Filters  │  │   Lines   │  │ Suggested │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   money • validation • reports • error                          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                pharma-store (JSON files)                        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Records (Product, Sale, Supplier, ...) and form drafts
//! - [`money`] - Integer cents
//! - [`validation`] - Form checks with collected messages
//! - [`inventory`] - Stock/expiry status, summary, search
//! - [`invoice`] - Quick-invoice draft
//! - [`reorder`] - Smart order input, advisor, output checks
//! - [`reports`] - Financial summary, daily sales, top products
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use pharma_core::money::Money;
//!
//! let strip = Money::from_cents(250);
//! assert_eq!(strip.multiply_quantity(4).to_string(), "10.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod inventory;
pub mod invoice;
pub mod money;
pub mod reorder;
pub mod reports;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use inventory::{InventoryPolicy, InventorySummary, ProductFilter};
pub use invoice::{Invoice, InvoiceView};
pub use money::Money;
pub use reorder::{HeuristicAdvisor, ReorderAdvisor, ReorderInput, SuggestedOrder};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Low stock threshold for products that do not set their own.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

/// Days ahead of expiry at which a product is flagged as expiring soon.
pub const EXPIRY_WARNING_DAYS: i64 = 30;

/// Maximum lines on one draft invoice.
pub const MAX_INVOICE_ITEMS: usize = 100;

/// Maximum length of product, supplier and customer names.
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum length of a product barcode.
pub const MAX_BARCODE_LENGTH: usize = 64;

/// Maximum length of an inventory search query.
pub const MAX_SEARCH_LENGTH: usize = 100;

/// Largest unit price accepted on a product or sale line (100,000,000.00).
pub const MAX_PRICE_CENTS: i64 = 10_000_000_000;

/// Largest sale total or ledger amount accepted from a form.
pub const MAX_AMOUNT_CENTS: i64 = 1_000_000_000_000_000;

/// Largest unit count accepted for stock levels, sale lines and adjustments.
///
/// With `MAX_PRICE_CENTS` and `MAX_INVOICE_ITEMS` this keeps every sale total
/// well inside `i64`.
pub const MAX_QUANTITY: i64 = 1_000_000;
