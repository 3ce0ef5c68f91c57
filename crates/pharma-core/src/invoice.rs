//! # Quick Invoice Draft
//!
//! The basket a cashier builds by scanning barcodes before taking payment.
//!
//! ## Draft Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Invoice Draft Operations                             │
//! │                                                                         │
//! │  Cashier Action        Operation              Draft Change              │
//! │  ──────────────        ─────────              ────────────              │
//! │                                                                         │
//! │  Scan barcode ───────► scan() ──────────────► new line (qty 1)          │
//! │                                               or existing line +1       │
//! │                                                                         │
//! │  Type quantity ──────► set_quantity() ──────► qty = clamp(n, 1, stock)  │
//! │                                                                         │
//! │  Click remove ───────► remove() ────────────► line dropped              │
//! │                                                                         │
//! │  Click clear ────────► clear() ─────────────► no lines                  │
//! │                                                                         │
//! │  Take payment ───────► sale_items() ────────► Vec<SaleItem> for the     │
//! │                                               sale, then clear()        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by `product_id` (scanning again increments)
//! - Every line has `1 <= quantity <= available_stock`
//! - At most [`MAX_INVOICE_ITEMS`](crate::MAX_INVOICE_ITEMS) lines

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Product, SaleItem};
use crate::MAX_INVOICE_ITEMS;

/// A line on the draft invoice.
///
/// Name, barcode and price are frozen when the product is first scanned.
/// `available_stock` is refreshed on every scan and quantity change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    pub product_id: String,
    pub barcode: String,
    pub name: String,
    pub selling_price_at_sale_cents: i64,
    pub quantity: i64,
    pub available_stock: i64,
}

impl InvoiceLine {
    fn from_product(product: &Product) -> Self {
        InvoiceLine {
            product_id: product.id.clone(),
            barcode: product.barcode.clone(),
            name: product.name.clone(),
            selling_price_at_sale_cents: product.selling_price_cents,
            quantity: 1,
            available_stock: product.quantity_in_stock,
        }
    }

    pub fn line_total(&self) -> Money {
        Money::from_cents(self.selling_price_at_sale_cents).multiply_quantity(self.quantity)
    }
}

/// What a scan did to the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum ScanOutcome {
    /// A new line with quantity 1.
    Added,
    /// An existing line went up by one.
    Incremented { quantity: i64 },
}

/// Result of a quantity edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct QuantityChange {
    pub quantity: i64,
    /// The requested quantity exceeded stock and was lowered to it.
    pub clamped: bool,
}

/// The draft invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    lines: Vec<InvoiceLine>,
}

impl Invoice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[InvoiceLine] {
        &self.lines
    }

    /// Adds one unit of a scanned product.
    ///
    /// ## Errors
    /// - `OutOfStock` when the product has nothing on the shelf
    /// - `MaxStockReached` when the line already holds all available units
    /// - `InvoiceTooLarge` when a new line would exceed the line limit
    pub fn scan(&mut self, product: &Product) -> CoreResult<ScanOutcome> {
        if product.quantity_in_stock <= 0 {
            return Err(CoreError::OutOfStock {
                name: product.name.clone(),
            });
        }

        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product.id) {
            line.available_stock = product.quantity_in_stock;
            if line.quantity >= product.quantity_in_stock {
                return Err(CoreError::MaxStockReached {
                    name: line.name.clone(),
                    available: product.quantity_in_stock,
                });
            }
            line.quantity += 1;
            return Ok(ScanOutcome::Incremented {
                quantity: line.quantity,
            });
        }

        if self.lines.len() >= MAX_INVOICE_ITEMS {
            return Err(CoreError::InvoiceTooLarge {
                max: MAX_INVOICE_ITEMS,
            });
        }

        self.lines.push(InvoiceLine::from_product(product));
        Ok(ScanOutcome::Added)
    }

    /// Sets a line's quantity.
    ///
    /// `available` is the product's current stock when known; otherwise the
    /// stock seen at the last scan is used. Requests above stock are
    /// clamped to it, requests below 1 become 1.
    pub fn set_quantity(
        &mut self,
        product_id: &str,
        requested: i64,
        available: Option<i64>,
    ) -> CoreResult<QuantityChange> {
        let line = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product_id)
            .ok_or_else(|| CoreError::NotOnInvoice(product_id.to_string()))?;

        if let Some(stock) = available {
            line.available_stock = stock;
        }
        if line.available_stock <= 0 {
            return Err(CoreError::OutOfStock {
                name: line.name.clone(),
            });
        }

        let change = if requested > line.available_stock {
            QuantityChange {
                quantity: line.available_stock,
                clamped: true,
            }
        } else {
            QuantityChange {
                quantity: requested.max(1),
                clamped: false,
            }
        };
        line.quantity = change.quantity;
        Ok(change)
    }

    /// Drops a line and returns it.
    pub fn remove(&mut self, product_id: &str) -> CoreResult<InvoiceLine> {
        let index = self
            .lines
            .iter()
            .position(|l| l.product_id == product_id)
            .ok_or_else(|| CoreError::NotOnInvoice(product_id.to_string()))?;
        Ok(self.lines.remove(index))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().fold(0i64, |acc, l| acc.saturating_add(l.quantity))
    }

    /// Σ quantity × price at sale.
    pub fn total(&self) -> Money {
        self.lines.iter().map(InvoiceLine::line_total).sum()
    }

    /// Converts the lines into sale items, rejecting an empty draft.
    pub fn sale_items(&self) -> CoreResult<Vec<SaleItem>> {
        if self.is_empty() {
            return Err(CoreError::EmptyInvoice);
        }
        Ok(self
            .lines
            .iter()
            .map(|l| SaleItem {
                product_id: l.product_id.clone(),
                quantity_sold: l.quantity,
                selling_price_at_sale_cents: l.selling_price_at_sale_cents,
            })
            .collect())
    }
}

/// Draft invoice as returned to the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceView {
    pub lines: Vec<InvoiceLine>,
    pub item_count: usize,
    pub total_quantity: i64,
    pub total_cents: i64,
}

impl From<&Invoice> for InvoiceView {
    fn from(invoice: &Invoice) -> Self {
        InvoiceView {
            lines: invoice.lines.clone(),
            item_count: invoice.line_count(),
            total_quantity: invoice.total_quantity(),
            total_cents: invoice.total().cents(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn product(id: &str, stock: i64, price_cents: i64) -> Product {
        let now = Utc::now();
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            barcode: format!("BC{}", id),
            description: None,
            category: None,
            supplier_id: None,
            purchase_price_cents: price_cents / 2,
            selling_price_cents: price_cents,
            unit: "strip".to_string(),
            quantity_in_stock: stock,
            expiry_date: NaiveDate::from_ymd_opt(2028, 1, 1).unwrap(),
            low_stock_threshold: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_scan_adds_then_increments() {
        let mut invoice = Invoice::new();
        let p = product("1", 3, 250);

        assert_eq!(invoice.scan(&p).unwrap(), ScanOutcome::Added);
        assert_eq!(
            invoice.scan(&p).unwrap(),
            ScanOutcome::Incremented { quantity: 2 }
        );
        assert_eq!(invoice.line_count(), 1);
        assert_eq!(invoice.total().cents(), 500);
    }

    #[test]
    fn test_scan_stops_at_stock() {
        let mut invoice = Invoice::new();
        let p = product("1", 1, 250);

        invoice.scan(&p).unwrap();
        let err = invoice.scan(&p).unwrap_err();
        assert!(matches!(err, CoreError::MaxStockReached { available: 1, .. }));
        assert_eq!(invoice.total_quantity(), 1);
    }

    #[test]
    fn test_scan_out_of_stock() {
        let mut invoice = Invoice::new();
        let err = invoice.scan(&product("1", 0, 250)).unwrap_err();
        assert_eq!(err.to_string(), "Product 1 is out of stock");
        assert!(invoice.is_empty());
    }

    #[test]
    fn test_scan_line_limit() {
        let mut invoice = Invoice::new();
        for i in 0..MAX_INVOICE_ITEMS {
            invoice.scan(&product(&i.to_string(), 5, 100)).unwrap();
        }
        let err = invoice.scan(&product("extra", 5, 100)).unwrap_err();
        assert!(matches!(err, CoreError::InvoiceTooLarge { .. }));
    }

    #[test]
    fn test_set_quantity_clamps() {
        let mut invoice = Invoice::new();
        invoice.scan(&product("1", 4, 100)).unwrap();

        let change = invoice.set_quantity("1", 10, None).unwrap();
        assert_eq!(change, QuantityChange { quantity: 4, clamped: true });

        let change = invoice.set_quantity("1", 0, None).unwrap();
        assert_eq!(change, QuantityChange { quantity: 1, clamped: false });

        // Fresh stock figure wins over the one seen at scan time.
        let change = invoice.set_quantity("1", 3, Some(2)).unwrap();
        assert_eq!(change, QuantityChange { quantity: 2, clamped: true });
    }

    #[test]
    fn test_set_quantity_unknown_line() {
        let mut invoice = Invoice::new();
        assert!(matches!(
            invoice.set_quantity("nope", 1, None),
            Err(CoreError::NotOnInvoice(_))
        ));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut invoice = Invoice::new();
        invoice.scan(&product("1", 4, 100)).unwrap();
        invoice.scan(&product("2", 4, 100)).unwrap();

        let removed = invoice.remove("1").unwrap();
        assert_eq!(removed.product_id, "1");
        assert!(invoice.remove("1").is_err());

        invoice.clear();
        assert!(invoice.is_empty());
    }

    #[test]
    fn test_sale_items_freeze_price() {
        let mut invoice = Invoice::new();
        let mut p = product("1", 5, 300);
        invoice.scan(&p).unwrap();

        p.selling_price_cents = 999;
        invoice.scan(&p).unwrap();

        let items = invoice.sale_items().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity_sold, 2);
        assert_eq!(items[0].selling_price_at_sale_cents, 300);

        let view = InvoiceView::from(&invoice);
        assert_eq!(view.total_cents, 600);
    }

    #[test]
    fn test_empty_draft_has_no_sale_items() {
        assert!(matches!(
            Invoice::new().sale_items(),
            Err(CoreError::EmptyInvoice)
        ));
    }
}
