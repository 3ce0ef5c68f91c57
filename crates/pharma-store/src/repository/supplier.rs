//! # Supplier Repository
//!
//! Operations on `suppliers.json`.
//!
//! Deleting a supplier leaves `supplierId` on its products as-is.

use tracing::debug;

use pharma_core::Supplier;

use crate::collection::JsonCollection;
use crate::error::{StoreError, StoreResult};

#[derive(Debug, Clone)]
pub struct SupplierRepository {
    suppliers: JsonCollection<Supplier>,
}

impl SupplierRepository {
    pub fn new(suppliers: JsonCollection<Supplier>) -> Self {
        SupplierRepository { suppliers }
    }

    pub async fn all(&self) -> StoreResult<Vec<Supplier>> {
        self.suppliers.load().await
    }

    pub async fn get_by_id(&self, id: &str) -> StoreResult<Option<Supplier>> {
        Ok(self.suppliers.load().await?.into_iter().find(|s| s.id == id))
    }

    pub async fn insert(&self, supplier: Supplier) -> StoreResult<Supplier> {
        debug!(id = %supplier.id, name = %supplier.name, "Inserting supplier");
        self.suppliers
            .mutate(|suppliers| {
                suppliers.push(supplier.clone());
                Ok(supplier)
            })
            .await
    }

    /// Replaces the supplier with the same id.
    ///
    /// ## Errors
    /// * `NotFound` - no supplier has this id
    pub async fn update(&self, supplier: Supplier) -> StoreResult<Supplier> {
        debug!(id = %supplier.id, "Updating supplier");
        self.suppliers
            .mutate(|suppliers| {
                let slot = suppliers
                    .iter_mut()
                    .find(|s| s.id == supplier.id)
                    .ok_or_else(|| StoreError::not_found("Supplier", &supplier.id))?;
                *slot = supplier.clone();
                Ok(supplier)
            })
            .await
    }

    /// Returns whether anything was removed.
    pub async fn delete(&self, id: &str) -> StoreResult<bool> {
        debug!(id = %id, "Deleting supplier");
        self.suppliers
            .mutate(|suppliers| {
                let before = suppliers.len();
                suppliers.retain(|s| s.id != id);
                Ok(suppliers.len() < before)
            })
            .await
    }
}
