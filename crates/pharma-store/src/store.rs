//! # Store Handle
//!
//! Opens the data directory and hands out repositories.
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Data Directory                                     │
//! │                                                                         │
//! │  Server startup                                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreConfig::new(dir).pretty(true)                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Store::open(config).await ← creates dir + missing files as []          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  <data_dir>/                                                            │
//! │    ├── products.json      ◄── store.products()                          │
//! │    ├── sales.json         ◄── store.sales()  (also edits products.json) │
//! │    ├── customers.json     ◄── store.customers()                         │
//! │    ├── suppliers.json     ◄── store.suppliers()                         │
//! │    └── transactions.json  ◄── store.transactions()                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use pharma_core::{Customer, Product, Sale, Supplier, Transaction};

use crate::collection::JsonCollection;
use crate::error::{StoreError, StoreResult};
use crate::repository::customer::CustomerRepository;
use crate::repository::product::ProductRepository;
use crate::repository::sale::SaleRepository;
use crate::repository::supplier::SupplierRepository;
use crate::repository::transaction::TransactionRepository;

pub const PRODUCTS_FILE: &str = "products.json";
pub const SALES_FILE: &str = "sales.json";
pub const CUSTOMERS_FILE: &str = "customers.json";
pub const SUPPLIERS_FILE: &str = "suppliers.json";
pub const TRANSACTIONS_FILE: &str = "transactions.json";

// =============================================================================
// Configuration
// =============================================================================

/// Store configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = StoreConfig::new("./data").pretty(false);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding the collection files. Created if missing.
    pub data_dir: PathBuf,

    /// Write indented JSON.
    /// Default: true (the files are meant to be readable by hand)
    pub pretty: bool,
}

impl StoreConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        StoreConfig {
            data_dir: data_dir.into(),
            pretty: true,
        }
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

// =============================================================================
// Store
// =============================================================================

/// Main store handle providing repository access.
///
/// Cheap to clone; clones share the per-file locks, so every handle in the
/// process serializes writes to the same file.
#[derive(Debug, Clone)]
pub struct Store {
    data_dir: PathBuf,
    products: JsonCollection<Product>,
    sales: JsonCollection<Sale>,
    customers: JsonCollection<Customer>,
    suppliers: JsonCollection<Supplier>,
    transactions: JsonCollection<Transaction>,
}

impl Store {
    /// Opens (and if needed initializes) a data directory.
    ///
    /// ## What This Does
    /// 1. Creates the directory if it doesn't exist
    /// 2. Creates each missing collection file as `[]`
    /// 3. Leaves existing files untouched
    pub async fn open(config: StoreConfig) -> StoreResult<Self> {
        info!(
            path = %config.data_dir.display(),
            "Opening data directory"
        );

        tokio::fs::create_dir_all(&config.data_dir)
            .await
            .map_err(|e| StoreError::io(&config.data_dir, e))?;

        let dir = &config.data_dir;
        let store = Store {
            data_dir: dir.clone(),
            products: JsonCollection::new(dir.join(PRODUCTS_FILE), config.pretty),
            sales: JsonCollection::new(dir.join(SALES_FILE), config.pretty),
            customers: JsonCollection::new(dir.join(CUSTOMERS_FILE), config.pretty),
            suppliers: JsonCollection::new(dir.join(SUPPLIERS_FILE), config.pretty),
            transactions: JsonCollection::new(dir.join(TRANSACTIONS_FILE), config.pretty),
        };

        store.products.ensure_exists().await?;
        store.sales.ensure_exists().await?;
        store.customers.ensure_exists().await?;
        store.suppliers.ensure_exists().await?;
        store.transactions.ensure_exists().await?;

        debug!("Collection files ready");
        Ok(store)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the product repository.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let product = store.products().get_by_barcode("6291041500213").await?;
    /// ```
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.products.clone())
    }

    /// Returns the sale repository. Recording a sale also updates stock.
    pub fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.sales.clone(), self.products.clone())
    }

    pub fn customers(&self) -> CustomerRepository {
        CustomerRepository::new(self.customers.clone())
    }

    pub fn suppliers(&self) -> SupplierRepository {
        SupplierRepository::new(self.suppliers.clone())
    }

    pub fn transactions(&self) -> TransactionRepository {
        TransactionRepository::new(self.transactions.clone())
    }

    /// Checks that every collection file can be read and parsed.
    pub async fn health_check(&self) -> bool {
        self.products.is_readable().await
            && self.sales.is_readable().await
            && self.customers.is_readable().await
            && self.suppliers.is_readable().await
            && self.transactions.is_readable().await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_creates_collection_files() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("nested").join("data");

        let store = Store::open(StoreConfig::new(&data_dir)).await.unwrap();

        for file in [PRODUCTS_FILE, SALES_FILE, CUSTOMERS_FILE, SUPPLIERS_FILE, TRANSACTIONS_FILE] {
            let text = std::fs::read_to_string(data_dir.join(file)).unwrap();
            assert_eq!(text, "[]", "{} should start empty", file);
        }
        assert!(store.health_check().await);
        assert_eq!(store.data_dir(), data_dir.as_path());
    }

    #[tokio::test]
    async fn test_health_check_fails_on_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(StoreConfig::new(dir.path())).await.unwrap();

        std::fs::write(dir.path().join(SALES_FILE), "not json").unwrap();
        assert!(!store.health_check().await);
    }

    #[test]
    fn test_config_builder() {
        let config = StoreConfig::new("/tmp/pharma").pretty(false);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/pharma"));
        assert!(!config.pretty);
    }
}
