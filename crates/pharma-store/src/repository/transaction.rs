//! # Transaction Repository
//!
//! Operations on `transactions.json`, the revenue/expense ledger.

use tracing::debug;

use pharma_core::Transaction;

use crate::collection::JsonCollection;
use crate::error::StoreResult;

#[derive(Debug, Clone)]
pub struct TransactionRepository {
    transactions: JsonCollection<Transaction>,
}

impl TransactionRepository {
    pub fn new(transactions: JsonCollection<Transaction>) -> Self {
        TransactionRepository { transactions }
    }

    pub async fn all(&self) -> StoreResult<Vec<Transaction>> {
        self.transactions.load().await
    }

    pub async fn insert(&self, transaction: Transaction) -> StoreResult<Transaction> {
        debug!(
            id = %transaction.id,
            kind = ?transaction.kind,
            amount_cents = transaction.amount_cents,
            "Inserting transaction"
        );
        self.transactions
            .mutate(|transactions| {
                transactions.push(transaction.clone());
                Ok(transaction)
            })
            .await
    }

    /// Ledger entries linked to a sale.
    pub async fn for_sale(&self, sale_id: &str) -> StoreResult<Vec<Transaction>> {
        Ok(self
            .transactions
            .load()
            .await?
            .into_iter()
            .filter(|t| t.related_sale_id.as_deref() == Some(sale_id))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pharma_core::{Transaction, TransactionDraft, TransactionType};

    use crate::test_support::{open_store, sale_of};

    #[tokio::test]
    async fn test_insert_and_for_sale() {
        let (_dir, store) = open_store().await;
        let repo = store.transactions();
        let now = Utc::now();

        let sale = sale_of(&[("p1", 1, 500)]);
        repo.insert(Transaction::revenue_for_sale(&sale, "Sale".to_string(), now))
            .await
            .unwrap();
        repo.insert(Transaction::from_draft(
            TransactionDraft {
                kind: TransactionType::Expense,
                date: None,
                amount_cents: 12_000,
                description: "Rent".to_string(),
                related_sale_id: None,
            },
            now,
        ))
        .await
        .unwrap();

        assert_eq!(repo.all().await.unwrap().len(), 2);
        let linked = repo.for_sale(&sale.id).await.unwrap();
        assert_eq!(linked.len(), 1);
        assert_eq!(linked[0].amount_cents, 500);
    }
}
