//! # Sale Repository
//!
//! Operations on `sales.json`, plus the stock decrement on `products.json`
//! that recording a sale implies.
//!
//! ## Recording a Sale
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    record_sale(sale)                                    │
//! │                                                                         │
//! │  0. products.json   ── must load, else nothing is written               │
//! │                                                                         │
//! │  1. sales.json      ── append sale                                      │
//! │                                                                         │
//! │  2. products.json   ── for each item:                                   │
//! │                          known product   → stock -= qty (min 0)         │
//! │                          unknown product → skipped, logged              │
//! │                                                                         │
//! │  The two writes are separate: a crash between them leaves the sale     │
//! │  recorded and stock untouched.                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use pharma_core::{Product, Sale};

use crate::collection::JsonCollection;
use crate::error::StoreResult;

#[derive(Debug, Clone)]
pub struct SaleRepository {
    sales: JsonCollection<Sale>,
    products: JsonCollection<Product>,
}

impl SaleRepository {
    pub fn new(sales: JsonCollection<Sale>, products: JsonCollection<Product>) -> Self {
        SaleRepository { sales, products }
    }

    pub async fn all(&self) -> StoreResult<Vec<Sale>> {
        let sales = self.sales.load().await?;
        debug!(count = sales.len(), "Loaded sales");
        Ok(sales)
    }

    pub async fn get_by_id(&self, id: &str) -> StoreResult<Option<Sale>> {
        Ok(self.sales.load().await?.into_iter().find(|s| s.id == id))
    }

    /// Appends a sale, then takes its items out of stock.
    pub async fn record_sale(&self, sale: Sale) -> StoreResult<Sale> {
        debug!(id = %sale.id, items = sale.items.len(), "Recording sale");

        self.products.load().await?;

        let sale = self
            .sales
            .mutate(|sales| {
                sales.push(sale.clone());
                Ok(sale)
            })
            .await?;

        // Several lines may name the same product.
        let mut sold: HashMap<&str, i64> = HashMap::new();
        for item in &sale.items {
            let units = sold.entry(item.product_id.as_str()).or_default();
            *units = units.saturating_add(item.quantity_sold);
        }

        let now = Utc::now();
        let skipped = self
            .products
            .mutate(|products| {
                let mut skipped = Vec::new();
                for (product_id, quantity) in &sold {
                    match products.iter_mut().find(|p| p.id == *product_id) {
                        Some(product) => {
                            product.quantity_in_stock =
                                product.quantity_in_stock.saturating_sub(*quantity).max(0);
                            product.updated_at = now;
                        }
                        None => skipped.push(product_id.to_string()),
                    }
                }
                Ok(skipped)
            })
            .await?;

        for product_id in &skipped {
            warn!(sale_id = %sale.id, product_id = %product_id, "Sold product not in inventory, stock not updated");
        }

        info!(
            id = %sale.id,
            invoice = sale.invoice_number.as_deref().unwrap_or("-"),
            total_cents = sale.total_amount_cents,
            "Sale recorded"
        );
        Ok(sale)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
