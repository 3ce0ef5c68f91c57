//! # Product Repository
//!
//! Operations on `products.json`.
//!
//! ## Key Operations
//! - Exact barcode lookup for the scanner
//! - CRUD with barcode uniqueness
//! - Stock adjustments clamped at zero
//! - Case-insensitive search on name, barcode and category

use chrono::Utc;
use tracing::debug;

use pharma_core::inventory::matches_query;
use pharma_core::Product;

use crate::collection::JsonCollection;
use crate::error::{StoreError, StoreResult};

/// Repository for product records.
///
/// ## Usage
/// ```rust,ignore
/// let repo = store.products();
///
/// let hits = repo.search("amox").await?;
/// let scanned = repo.get_by_barcode("5000158062924").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    products: JsonCollection<Product>,
}

impl ProductRepository {
    pub fn new(products: JsonCollection<Product>) -> Self {
        ProductRepository { products }
    }

    /// Every product, in file order.
    pub async fn all(&self) -> StoreResult<Vec<Product>> {
        let products = self.products.load().await?;
        debug!(count = products.len(), "Loaded products");
        Ok(products)
    }

    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> StoreResult<Option<Product>> {
        Ok(self.products.load().await?.into_iter().find(|p| p.id == id))
    }

    /// Exact match on the barcode (no trimming here, validation does that).
    pub async fn get_by_barcode(&self, barcode: &str) -> StoreResult<Option<Product>> {
        debug!(barcode = %barcode, "Looking up barcode");
        Ok(self
            .products
            .load()
            .await?
            .into_iter()
            .find(|p| p.barcode == barcode))
    }

    /// Case-insensitive substring search on name, barcode and category.
    pub async fn search(&self, query: &str) -> StoreResult<Vec<Product>> {
        let needle = query.trim().to_lowercase();
        let products = self.products.load().await?;
        if needle.is_empty() {
            return Ok(products);
        }

        let hits: Vec<Product> = products
            .into_iter()
            .filter(|p| matches_query(p, &needle))
            .collect();
        debug!(query = %needle, count = hits.len(), "Search returned products");
        Ok(hits)
    }

    /// Appends a product.
    ///
    /// ## Errors
    /// * `Duplicate` - another product already uses the barcode
    pub async fn insert(&self, product: Product) -> StoreResult<Product> {
        debug!(id = %product.id, barcode = %product.barcode, "Inserting product");

        self.products
            .mutate(|products| {
                if products.iter().any(|p| p.barcode == product.barcode) {
                    return Err(StoreError::duplicate("barcode", &product.barcode));
                }
                products.push(product.clone());
                Ok(product)
            })
            .await
    }

    /// Replaces the product with the same id.
    ///
    /// ## Errors
    /// * `NotFound` - no product has this id
    /// * `Duplicate` - the new barcode belongs to a different product
    pub async fn update(&self, product: Product) -> StoreResult<Product> {
        debug!(id = %product.id, "Updating product");

        self.products
            .mutate(|products| {
                if products
                    .iter()
                    .any(|p| p.barcode == product.barcode && p.id != product.id)
                {
                    return Err(StoreError::duplicate("barcode", &product.barcode));
                }
                let slot = products
                    .iter_mut()
                    .find(|p| p.id == product.id)
                    .ok_or_else(|| StoreError::not_found("Product", &product.id))?;
                *slot = product.clone();
                Ok(product)
            })
            .await
    }

    /// Removes a product. Returns whether anything was removed.
    ///
    /// Sales that reference the product keep their lines.
    pub async fn delete(&self, id: &str) -> StoreResult<bool> {
        debug!(id = %id, "Deleting product");

        self.products
            .mutate(|products| {
                let before = products.len();
                products.retain(|p| p.id != id);
                Ok(products.len() < before)
            })
            .await
    }

    /// Adds `delta` (negative to take away) to a product's stock.
    ///
    /// Stock never goes below zero and saturates at `i64::MAX`.
    pub async fn adjust_stock(&self, id: &str, delta: i64) -> StoreResult<Product> {
        debug!(id = %id, delta = delta, "Adjusting stock");

        self.products
            .mutate(|products| {
                let product = products
                    .iter_mut()
                    .find(|p| p.id == id)
                    .ok_or_else(|| StoreError::not_found("Product", id))?;
                product.quantity_in_stock = product.quantity_in_stock.saturating_add(delta).max(0);
                product.updated_at = Utc::now();
                Ok(product.clone())
            })
            .await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::test_support::{open_store, product};
    use crate::StoreError;

    #[tokio::test]
    async fn test_insert_then_list() {
        let (_dir, store) = open_store().await;
        let repo = store.products();

        let inserted = repo.insert(product("Amoxil 500mg", "111", 10)).await.unwrap();

        let all = repo.all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], inserted);
        assert_eq!(repo.get_by_id(&inserted.id).await.unwrap(), Some(inserted));
    }

    #[tokio::test]
    async fn test_duplicate_barcode_rejected() {
        let (_dir, store) = open_store().await;
        let repo = store.products();

        repo.insert(product("Panadol", "222", 5)).await.unwrap();
        let err = repo.insert(product("Panadol Extra", "222", 5)).await.unwrap_err();

        assert!(matches!(err, StoreError::Duplicate { .. }));
        assert_eq!(repo.all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_missing_product() {
        let (_dir, store) = open_store().await;
        let err = store
            .products()
            .update(product("Ghost", "000", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_replaces_record() {
        let (_dir, store) = open_store().await;
        let repo = store.products();
        let mut p = repo.insert(product("Brufen", "333", 8)).await.unwrap();

        p.selling_price_cents = 999;
        repo.update(p.clone()).await.unwrap();

        let stored = repo.get_by_id(&p.id).await.unwrap().unwrap();
        assert_eq!(stored.selling_price_cents, 999);
    }

    #[tokio::test]
    async fn test_barcode_lookup_is_exact() {
        let (_dir, store) = open_store().await;
        let repo = store.products();
        repo.insert(product("Flagyl", "6291041500213", 4)).await.unwrap();

        assert!(repo.get_by_barcode("6291041500213").await.unwrap().is_some());
        assert!(repo.get_by_barcode("629104150021").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let (_dir, store) = open_store().await;
        let repo = store.products();
        let p = repo.insert(product("Zyrtec", "444", 3)).await.unwrap();

        assert!(repo.delete(&p.id).await.unwrap());
        assert!(!repo.delete(&p.id).await.unwrap());
        assert!(repo.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_adjust_stock_clamps_at_zero() {
        let (_dir, store) = open_store().await;
        let repo = store.products();
        let p = repo.insert(product("Ventolin", "555", 3)).await.unwrap();

        assert_eq!(repo.adjust_stock(&p.id, 4).await.unwrap().quantity_in_stock, 7);
        assert_eq!(repo.adjust_stock(&p.id, -10).await.unwrap().quantity_in_stock, 0);
        assert!(repo.adjust_stock("missing", 1).await.is_err());
    }

    #[tokio::test]
    async fn test_adjust_stock_extreme_deltas() {
        let (_dir, store) = open_store().await;
        let repo = store.products();
        let p = repo.insert(product("Ventolin", "555", 3)).await.unwrap();

        let raised = repo.adjust_stock(&p.id, i64::MAX).await.unwrap();
        assert_eq!(raised.quantity_in_stock, i64::MAX);
        assert_eq!(repo.adjust_stock(&p.id, 1).await.unwrap().quantity_in_stock, i64::MAX);
        assert_eq!(repo.adjust_stock(&p.id, i64::MIN).await.unwrap().quantity_in_stock, 0);
    }

    #[tokio::test]
    async fn test_search() {
        let (_dir, store) = open_store().await;
        let repo = store.products();
        repo.insert(product("Amoxil 500mg", "111", 10)).await.unwrap();
        repo.insert(product("Panadol", "222", 10)).await.unwrap();

        assert_eq!(repo.search("AMOX").await.unwrap().len(), 1);
        assert_eq!(repo.search("22").await.unwrap().len(), 1);
        assert_eq!(repo.search("  ").await.unwrap().len(), 2);
    }
}
