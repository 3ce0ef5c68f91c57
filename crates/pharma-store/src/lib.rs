//! # pharma-store: JSON File Store for PharmaEase
//!
//! Persistence for PharmaEase. Each entity type lives in its own JSON array
//! file inside one data directory.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        PharmaEase Data Flow                             │
//! │                                                                         │
//! │  HTTP handler (POST /api/quick-invoice/sales)                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   pharma-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │    Store      │    │  Repositories │    │ JsonCollection│ │   │
//! │  │   │  (store.rs)   │    │ (product.rs)  │    │(collection.rs)│ │   │
//! │  │   │               │    │               │    │               │ │   │
//! │  │   │ open()        │───►│ ProductRepo   │───►│ load()        │ │   │
//! │  │   │ health_check()│    │ SaleRepo      │    │ mutate()      │ │   │
//! │  │   │               │    │ SupplierRepo  │    │ atomic write  │ │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │   <data_dir>/products.json, sales.json, customers.json, ...    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - Opening the data directory, repository accessors
//! - [`collection`] - One JSON array file, locked read-modify-write
//! - [`error`] - Store error types
//! - [`repository`] - Repository implementations (product, sale, etc.)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pharma_store::{Store, StoreConfig};
//!
//! let store = Store::open(StoreConfig::new("./data")).await?;
//! let low = store.products().search("amox").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod collection;
pub mod error;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use store::{Store, StoreConfig};

pub use repository::customer::CustomerRepository;
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
pub use repository::supplier::SupplierRepository;
pub use repository::transaction::TransactionRepository;

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{NaiveDate, Utc};
    use pharma_core::{Money, PaymentMethod, Product, Sale, SaleItem};
    use tempfile::TempDir;

    use crate::{Store, StoreConfig};

    /// A store in a fresh temp directory. Keep the `TempDir` alive.
    pub async fn open_store() -> (TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(StoreConfig::new(dir.path())).await.unwrap();
        (dir, store)
    }

    pub fn product(name: &str, barcode: &str, stock: i64) -> Product {
        let now = Utc::now();
        Product {
            id: pharma_core::new_id(),
            name: name.to_string(),
            barcode: barcode.to_string(),
            description: None,
            category: None,
            supplier_id: None,
            purchase_price_cents: 100,
            selling_price_cents: 150,
            unit: "box".to_string(),
            quantity_in_stock: stock,
            expiry_date: NaiveDate::from_ymd_opt(2028, 12, 31).unwrap(),
            low_stock_threshold: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// A cash sale of `(product_id, quantity, price_cents)` lines.
    pub fn sale_of(lines: &[(&str, i64, i64)]) -> Sale {
        let items: Vec<SaleItem> = lines
            .iter()
            .map(|(id, qty, price)| SaleItem {
                product_id: id.to_string(),
                quantity_sold: *qty,
                selling_price_at_sale_cents: *price,
            })
            .collect();
        let total: Money = items.iter().map(SaleItem::line_total).sum();
        Sale::quick(items, total, PaymentMethod::Cash, Utc::now())
    }
}
