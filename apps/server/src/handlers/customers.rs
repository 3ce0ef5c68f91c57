//! # Customer Handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use tracing::{debug, info};

use pharma_core::validation::validate_customer_draft;
use pharma_core::{Customer, CustomerDraft};

use crate::error::ApiError;
use crate::handlers::{or_empty, ActionResponse};
use crate::state::AppState;

/// `GET /api/customers`
pub async fn list_customers(State(state): State<AppState>) -> Json<Vec<Customer>> {
    Json(or_empty(state.store.customers().all().await, "customers"))
}

/// `GET /api/customers/{id}`
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Customer>, ApiError> {
    debug!(id = %id, "get_customer");
    state
        .store
        .customers()
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Customer not found."))
}

/// `POST /api/customers`
pub async fn create_customer(
    State(state): State<AppState>,
    payload: Result<Json<CustomerDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<ActionResponse<Customer>>), ApiError> {
    let Json(draft) = payload?;
    validate_customer_draft(&draft)?;

    let customer = state
        .store
        .customers()
        .insert(Customer::from_draft(draft, Utc::now()))
        .await?;
    info!(id = %customer.id, "Customer added");
    Ok((
        StatusCode::CREATED,
        Json(ActionResponse::ok("Customer added successfully.", customer)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::test_support::test_state;

    #[tokio::test]
    async fn test_create_list_get() {
        let (_dir, state) = test_state().await;
        let draft = CustomerDraft {
            name: "  Sara Malik ".to_string(),
            phone_number: Some("0300-1234567".to_string()),
            ..Default::default()
        };
        let (_, Json(resp)) = create_customer(State(state.clone()), Ok(Json(draft)))
            .await
            .unwrap();
        let customer = resp.data.unwrap();
        assert_eq!(customer.name, "Sara Malik");

        let Json(list) = list_customers(State(state.clone())).await;
        assert_eq!(list.len(), 1);

        let Json(found) = get_customer(State(state.clone()), Path(customer.id.clone()))
            .await
            .unwrap();
        assert_eq!(found, customer);

        let err = get_customer(State(state), Path("missing".to_string())).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_name_required() {
        let (_dir, state) = test_state().await;
        let err = create_customer(State(state), Ok(Json(CustomerDraft::default())))
            .await
            .unwrap_err();
        assert_eq!(err.message, "Customer name is required");
    }
}
