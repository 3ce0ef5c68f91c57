//! # Ledger Handlers
//!
//! Manual revenue and expense entries. Sale revenue is written by the
//! quick invoice, not here.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use tracing::info;

use pharma_core::validation::validate_transaction_draft;
use pharma_core::{Transaction, TransactionDraft};

use crate::error::ApiError;
use crate::handlers::{or_empty, ActionResponse};
use crate::state::AppState;

/// `GET /api/transactions`, newest first.
pub async fn list_transactions(State(state): State<AppState>) -> Json<Vec<Transaction>> {
    let mut transactions = or_empty(state.store.transactions().all().await, "transactions");
    transactions.sort_by(|a, b| b.date.cmp(&a.date));
    Json(transactions)
}

/// `POST /api/transactions`
pub async fn create_transaction(
    State(state): State<AppState>,
    payload: Result<Json<TransactionDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<ActionResponse<Transaction>>), ApiError> {
    let Json(draft) = payload?;
    validate_transaction_draft(&draft)?;

    let transaction = state
        .store
        .transactions()
        .insert(Transaction::from_draft(draft, Utc::now()))
        .await?;
    info!(
        id = %transaction.id,
        kind = ?transaction.kind,
        amount = %transaction.amount(),
        "Ledger entry recorded"
    );
    Ok((
        StatusCode::CREATED,
        Json(ActionResponse::ok("Transaction recorded successfully.", transaction)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::test_support::test_state;
    use chrono::Duration;
    use pharma_core::TransactionType;

    fn expense(amount_cents: i64, description: &str) -> TransactionDraft {
        TransactionDraft {
            kind: TransactionType::Expense,
            date: None,
            amount_cents,
            description: description.to_string(),
            related_sale_id: None,
        }
    }

    #[tokio::test]
    async fn test_record_and_list_newest_first() {
        let (_dir, state) = test_state().await;
        let mut older = expense(45_000, "Rent");
        older.date = Some(Utc::now() - Duration::days(3));
        create_transaction(State(state.clone()), Ok(Json(older))).await.unwrap();
        create_transaction(State(state.clone()), Ok(Json(expense(2_000, "Electricity"))))
            .await
            .unwrap();

        let Json(list) = list_transactions(State(state)).await;
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].description, "Electricity");
        assert_eq!(list[1].description, "Rent");
    }

    #[tokio::test]
    async fn test_validation() {
        let (_dir, state) = test_state().await;
        let err = create_transaction(State(state), Ok(Json(expense(-1, " "))))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("Amount must be non-negative"));
        assert!(err.message.contains("Description is required"));
    }
}
