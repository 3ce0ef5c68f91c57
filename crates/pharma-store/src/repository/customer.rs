//! # Customer Repository
//!
//! Operations on `customers.json`.

use tracing::debug;

use pharma_core::Customer;

use crate::collection::JsonCollection;
use crate::error::StoreResult;

#[derive(Debug, Clone)]
pub struct CustomerRepository {
    customers: JsonCollection<Customer>,
}

impl CustomerRepository {
    pub fn new(customers: JsonCollection<Customer>) -> Self {
        CustomerRepository { customers }
    }

    pub async fn all(&self) -> StoreResult<Vec<Customer>> {
        self.customers.load().await
    }

    pub async fn get_by_id(&self, id: &str) -> StoreResult<Option<Customer>> {
        Ok(self.customers.load().await?.into_iter().find(|c| c.id == id))
    }

    pub async fn insert(&self, customer: Customer) -> StoreResult<Customer> {
        debug!(id = %customer.id, "Inserting customer");
        self.customers
            .mutate(|customers| {
                customers.push(customer.clone());
                Ok(customer)
            })
            .await
    }
}
