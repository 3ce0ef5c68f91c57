//! # Domain Types
//!
//! Core domain types used throughout PharmaEase.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │   Transaction   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │◄──│  items[]        │◄──│  relatedSaleId  │       │
//! │  │  barcode        │   │  invoiceNumber  │   │  type           │       │
//! │  │  expiryDate     │   │  paymentMethod  │   │  amountCents    │       │
//! │  │  supplierId ──┐ │   │  customerId ──┐ │   └─────────────────┘       │
//! │  └───────────────┼─┘   └───────────────┼─┘                             │
//! │                  ▼                     ▼                                │
//! │  ┌─────────────────┐   ┌─────────────────┐                              │
//! │  │    Supplier     │   │    Customer     │                              │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Records vs Drafts
//! A record (`Product`, `Supplier`, ...) is what lives in the JSON files.
//! A draft (`ProductDraft`, ...) is what a dashboard form submits: no id,
//! no timestamps. Drafts are validated in [`crate::validation`] and then
//! turned into records with `from_draft` / `apply_draft`.
//!
//! References between records (`supplierId`, `productId`, ...) are plain
//! strings. Nothing enforces them; a sale item can outlive its product.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::money::Money;

/// Generates a new record identifier.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Trims an optional form field, mapping blank input to `None`.
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a sale was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash at the counter.
    Cash,
    /// Card on the pharmacy's terminal.
    Card,
}

impl PaymentMethod {
    /// Wire names accepted by [`FromStr`].
    pub const ALLOWED: [&'static str; 2] = ["cash", "card"];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            "" => Err(ValidationError::Rule(
                "Payment method is required.".to_string(),
            )),
            _ => Err(ValidationError::NotAllowed {
                field: "Payment method".to_string(),
                allowed: Self::ALLOWED.iter().map(|s| s.to_string()).collect(),
            }),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// An inventory item on the pharmacy's shelves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name, e.g. "Amoxil 500mg Capsules".
    pub name: String,

    /// Barcode text printed on the pack. Unique across products.
    pub barcode: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Supplier this product is usually ordered from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<String>,

    /// What the pharmacy pays per unit, in cents.
    pub purchase_price_cents: i64,

    /// What the customer pays per unit, in cents.
    pub selling_price_cents: i64,

    /// Selling unit: box, strip, tablet, bottle...
    pub unit: String,

    /// Units currently on the shelf.
    pub quantity_in_stock: i64,

    /// Expiry date of the stock on the shelf.
    #[ts(as = "String")]
    pub expiry_date: NaiveDate,

    /// Stock level below which the product counts as low stock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_stock_threshold: Option<i64>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Builds a new product from a validated draft.
    ///
    /// `expiry_date` is the date returned by
    /// [`validate_product_draft`](crate::validation::validate_product_draft).
    pub fn from_draft(draft: ProductDraft, expiry_date: NaiveDate, now: DateTime<Utc>) -> Self {
        Product {
            id: new_id(),
            name: draft.name.trim().to_string(),
            barcode: draft.barcode.trim().to_string(),
            description: non_empty(draft.description),
            category: non_empty(draft.category),
            supplier_id: non_empty(draft.supplier_id),
            purchase_price_cents: draft.purchase_price_cents,
            selling_price_cents: draft.selling_price_cents,
            unit: draft.unit.trim().to_string(),
            quantity_in_stock: draft.quantity_in_stock,
            expiry_date,
            low_stock_threshold: draft.low_stock_threshold,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites every editable field from a validated draft.
    ///
    /// `id` and `created_at` are kept; `updated_at` moves to `now`.
    pub fn apply_draft(&mut self, draft: ProductDraft, expiry_date: NaiveDate, now: DateTime<Utc>) {
        let id = std::mem::take(&mut self.id);
        let created_at = self.created_at;
        *self = Product::from_draft(draft, expiry_date, now);
        self.id = id;
        self.created_at = created_at;
    }

    /// Returns the selling price as Money.
    #[inline]
    pub fn selling_price(&self) -> Money {
        Money::from_cents(self.selling_price_cents)
    }

    /// Returns the purchase price as Money.
    #[inline]
    pub fn purchase_price(&self) -> Money {
        Money::from_cents(self.purchase_price_cents)
    }

    /// The low stock threshold, or `default` when the product has none.
    #[inline]
    pub fn threshold_or(&self, default: i64) -> i64 {
        self.low_stock_threshold.unwrap_or(default)
    }
}

/// Product form payload.
///
/// `expiryDate` stays a string here: the form sends whatever the date
/// picker produced and validation decides whether it parses.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub barcode: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub supplier_id: Option<String>,
    #[serde(default)]
    pub purchase_price_cents: i64,
    #[serde(default)]
    pub selling_price_cents: i64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub quantity_in_stock: i64,
    #[serde(default)]
    pub expiry_date: String,
    #[serde(default)]
    pub low_stock_threshold: Option<i64>,
}

// =============================================================================
// Sale
// =============================================================================

/// A line on a completed sale.
///
/// The price is frozen at the moment of sale so later price edits do not
/// rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub product_id: String,
    pub quantity_sold: i64,
    pub selling_price_at_sale_cents: i64,
}

impl SaleItem {
    /// Line total (price at sale × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.selling_price_at_sale_cents).multiply_quantity(self.quantity_sold)
    }
}

/// A completed sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[ts(as = "String")]
    pub sale_date: DateTime<Utc>,
    pub total_amount_cents: i64,
    pub items: Vec<SaleItem>,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Sale {
    /// Builds a quick-invoice sale stamped at `now`.
    ///
    /// The invoice number is `INV-<unix epoch millis>`.
    pub fn quick(
        items: Vec<SaleItem>,
        total: Money,
        payment_method: PaymentMethod,
        now: DateTime<Utc>,
    ) -> Self {
        Sale {
            id: new_id(),
            customer_id: None,
            sale_date: now,
            total_amount_cents: total.cents(),
            items,
            payment_method,
            invoice_number: Some(invoice_number_at(now)),
            created_at: now,
            updated_at: now,
        }
    }

    /// The stored total.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }

    /// Sum of the line totals; can differ from [`Sale::total`] when the
    /// client submitted a different total.
    pub fn items_total(&self) -> Money {
        self.items.iter().map(SaleItem::line_total).sum()
    }
}

/// Formats the invoice number used by quick sales.
pub fn invoice_number_at(now: DateTime<Utc>) -> String {
    format!("INV-{}", now.timestamp_millis())
}

// =============================================================================
// Customer
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    pub fn from_draft(draft: CustomerDraft, now: DateTime<Utc>) -> Self {
        Customer {
            id: new_id(),
            name: draft.name.trim().to_string(),
            phone_number: non_empty(draft.phone_number),
            address: non_empty(draft.address),
            notes: non_empty(draft.notes),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

// =============================================================================
// Supplier
// =============================================================================

/// A vendor the pharmacy orders stock from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Supplier {
    pub fn from_draft(draft: SupplierDraft, now: DateTime<Utc>) -> Self {
        Supplier {
            id: new_id(),
            name: draft.name.trim().to_string(),
            contact_person: non_empty(draft.contact_person),
            phone_number: non_empty(draft.phone_number),
            email: non_empty(draft.email),
            address: non_empty(draft.address),
            notes: non_empty(draft.notes),
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites every editable field, keeping `id` and `created_at`.
    pub fn apply_draft(&mut self, draft: SupplierDraft, now: DateTime<Utc>) {
        self.name = draft.name.trim().to_string();
        self.contact_person = non_empty(draft.contact_person);
        self.phone_number = non_empty(draft.phone_number);
        self.email = non_empty(draft.email);
        self.address = non_empty(draft.address);
        self.notes = non_empty(draft.notes);
        self.updated_at = now;
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SupplierDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

// =============================================================================
// Transaction (ledger entry)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Revenue,
    Expense,
}

/// A revenue or expense entry in the pharmacy's ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub amount_cents: i64,
    pub description: String,
    /// Set on revenue entries written for a sale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_sale_id: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// The revenue entry recorded alongside a quick sale.
    pub fn revenue_for_sale(sale: &Sale, description: String, now: DateTime<Utc>) -> Self {
        Transaction {
            id: new_id(),
            kind: TransactionType::Revenue,
            date: now,
            amount_cents: sale.total_amount_cents,
            description,
            related_sale_id: Some(sale.id.clone()),
            created_at: now,
            updated_at: now,
        }
    }

    /// A manual ledger entry. `date` defaults to `now`.
    pub fn from_draft(draft: TransactionDraft, now: DateTime<Utc>) -> Self {
        Transaction {
            id: new_id(),
            kind: draft.kind,
            date: draft.date.unwrap_or(now),
            amount_cents: draft.amount_cents,
            description: draft.description.trim().to_string(),
            related_sale_id: non_empty(draft.related_sale_id),
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDraft {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub amount_cents: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub related_sale_id: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================
