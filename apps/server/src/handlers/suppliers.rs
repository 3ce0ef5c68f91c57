//! # Supplier Handlers
//!
//! Deleting a supplier does not touch products; their `supplierId` keeps
//! pointing at the removed record.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use tracing::{debug, info};

use pharma_core::validation::validate_supplier_draft;
use pharma_core::{Supplier, SupplierDraft};

use crate::error::ApiError;
use crate::handlers::{or_empty, ActionResponse};
use crate::state::AppState;

/// `GET /api/suppliers`
pub async fn list_suppliers(State(state): State<AppState>) -> Json<Vec<Supplier>> {
    Json(or_empty(state.store.suppliers().all().await, "suppliers"))
}

/// `GET /api/suppliers/{id}`
pub async fn get_supplier(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Supplier>, ApiError> {
    debug!(id = %id, "get_supplier");
    state
        .store
        .suppliers()
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Supplier not found."))
}

/// `POST /api/suppliers`
pub async fn create_supplier(
    State(state): State<AppState>,
    payload: Result<Json<SupplierDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<ActionResponse<Supplier>>), ApiError> {
    let Json(draft) = payload?;
    validate_supplier_draft(&draft)?;

    let supplier = state
        .store
        .suppliers()
        .insert(Supplier::from_draft(draft, Utc::now()))
        .await?;
    info!(id = %supplier.id, name = %supplier.name, "Supplier added");
    Ok((
        StatusCode::CREATED,
        Json(ActionResponse::ok("Supplier added successfully.", supplier)),
    ))
}

/// `PUT /api/suppliers/{id}`
pub async fn update_supplier(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<SupplierDraft>, JsonRejection>,
) -> Result<Json<ActionResponse<Supplier>>, ApiError> {
    let Json(draft) = payload?;
    validate_supplier_draft(&draft)?;

    let repo = state.store.suppliers();
    let mut supplier = repo
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Supplier not found."))?;
    supplier.apply_draft(draft, Utc::now());

    let supplier = repo.update(supplier).await?;
    info!(id = %supplier.id, "Supplier updated");
    Ok(Json(ActionResponse::ok("Supplier updated successfully.", supplier)))
}

/// `DELETE /api/suppliers/{id}`
pub async fn delete_supplier(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ActionResponse<()>>, ApiError> {
    if !state.store.suppliers().delete(&id).await? {
        return Err(ApiError::not_found(
            "Failed to delete supplier or supplier not found.",
        ));
    }
    info!(id = %id, "Supplier deleted");
    Ok(Json(ActionResponse::done("Supplier deleted successfully.")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::test_support::test_state;

    fn draft(name: &str, email: Option<&str>) -> SupplierDraft {
        SupplierDraft {
            name: name.to_string(),
            email: email.map(str::to_string),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_supplier_lifecycle() {
        let (_dir, state) = test_state().await;
        let (status, Json(resp)) = create_supplier(
            State(state.clone()),
            Ok(Json(draft("MedSupply Co", Some("orders@medsupply.example")))),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        let supplier = resp.data.unwrap();

        let Json(resp) = update_supplier(
            State(state.clone()),
            Path(supplier.id.clone()),
            Ok(Json(draft("MedSupply Ltd", None))),
        )
        .await
        .unwrap();
        let updated = resp.data.unwrap();
        assert_eq!(updated.name, "MedSupply Ltd");
        assert_eq!(updated.email, None);
        assert_eq!(updated.created_at, supplier.created_at);

        let Json(list) = list_suppliers(State(state.clone())).await;
        assert_eq!(list.len(), 1);

        delete_supplier(State(state.clone()), Path(supplier.id.clone()))
            .await
            .unwrap();
        let err = get_supplier(State(state), Path(supplier.id)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_invalid_email_rejected() {
        let (_dir, state) = test_state().await;
        let err = create_supplier(State(state), Ok(Json(draft("MedSupply", Some("nope")))))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let (_dir, state) = test_state().await;
        let err = update_supplier(
            State(state.clone()),
            Path("missing".to_string()),
            Ok(Json(draft("X", None))),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = delete_supplier(State(state), Path("missing".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
