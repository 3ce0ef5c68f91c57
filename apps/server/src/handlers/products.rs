//! # Product Handlers
//!
//! Inventory page CRUD plus the barcode lookup used by the scanner.
//!
//! ## Product Form Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Add / Edit Product form                                                │
//! │       │  POST /api/products  or  PUT /api/products/{id}                 │
//! │       ▼                                                                 │
//! │  validate_product_draft() ── any failure ──► 400 "a, b, c"              │
//! │       │ ok (parsed expiry date)                                         │
//! │       ▼                                                                 │
//! │  Product::from_draft / apply_draft                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  products.json ── barcode taken ──► 409                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  { success: true, message: "Product added successfully.", data }        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, error, info};

use pharma_core::inventory::filter_products;
use pharma_core::validation::{
    validate_barcode, validate_product_draft, validate_search_query, validate_stock_adjustment,
};
use pharma_core::{Product, ProductDraft, ProductFilter};

use crate::error::ApiError;
use crate::handlers::{or_empty, ActionResponse};
use crate::state::AppState;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub q: Option<String>,
    pub filter: Option<String>,
}

/// Stock correction, e.g. a delivery arriving (`delta > 0`) or breakage.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAdjustment {
    pub delta: i64,
}

/// `GET /api/products?q=&filter=`
///
/// ## Query
/// * `q` - case-insensitive match on name, barcode or category
/// * `filter` - `lowStock`, `expired` or `expiringSoon`
pub async fn list_products(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let Query(params) = params?;
    let query = validate_search_query(params.q.as_deref())?;
    let filter = params
        .filter
        .as_deref()
        .filter(|f| !f.is_empty())
        .map(str::parse::<ProductFilter>)
        .transpose()?;
    debug!(query = ?query, filter = ?filter, "list_products");

    let repo = state.store.products();
    let products = match &query {
        Some(q) => or_empty(repo.search(q).await, "products"),
        None => or_empty(repo.all().await, "products"),
    };
    let policy = state.policy();
    Ok(Json(filter_products(products, None, filter, state.today(), &policy)))
}

/// `GET /api/products/{id}`
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    debug!(id = %id, "get_product");
    state
        .store
        .products()
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Product not found."))
}

/// `GET /api/products/barcode/{barcode}`
///
/// Answers `null` when nothing matches. Storage failures are logged and
/// also answer `null`, the scanner treats both as "not found".
pub async fn get_product_by_barcode(
    State(state): State<AppState>,
    Path(barcode): Path<String>,
) -> Result<Json<Option<Product>>, ApiError> {
    let barcode = validate_barcode(&barcode)?;
    debug!(barcode = %barcode, "get_product_by_barcode");

    match state.store.products().get_by_barcode(barcode).await {
        Ok(product) => Ok(Json(product)),
        Err(err) => {
            error!(error = %err, barcode = %barcode, "Barcode lookup failed");
            Ok(Json(None))
        }
    }
}

/// `POST /api/products`
pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<ProductDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<ActionResponse<Product>>), ApiError> {
    let Json(draft) = payload?;
    let expiry = validate_product_draft(&draft)?;

    let product = state
        .store
        .products()
        .insert(Product::from_draft(draft, expiry, Utc::now()))
        .await?;
    info!(id = %product.id, name = %product.name, "Product added");

    Ok((
        StatusCode::CREATED,
        Json(ActionResponse::ok("Product added successfully.", product)),
    ))
}

/// `PUT /api/products/{id}`
///
/// Replaces every editable field; `id` and `createdAt` are kept.
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ProductDraft>, JsonRejection>,
) -> Result<Json<ActionResponse<Product>>, ApiError> {
    let Json(draft) = payload?;
    let expiry = validate_product_draft(&draft)?;

    let repo = state.store.products();
    let mut product = repo
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product not found."))?;
    product.apply_draft(draft, expiry, Utc::now());

    let product = repo.update(product).await?;
    info!(id = %product.id, "Product updated");
    Ok(Json(ActionResponse::ok("Product updated successfully.", product)))
}

/// `DELETE /api/products/{id}`
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ActionResponse<()>>, ApiError> {
    if !state.store.products().delete(&id).await? {
        return Err(ApiError::not_found(
            "Failed to delete product or product not found.",
        ));
    }
    info!(id = %id, "Product deleted");
    Ok(Json(ActionResponse::done("Product deleted successfully.")))
}

/// `POST /api/products/{id}/stock`
pub async fn adjust_stock(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<StockAdjustment>, JsonRejection>,
) -> Result<Json<ActionResponse<Product>>, ApiError> {
    let Json(adjustment) = payload?;
    let delta = validate_stock_adjustment(adjustment.delta)?;

    let product = state.store.products().adjust_stock(&id, delta).await?;
    info!(
        id = %product.id,
        delta,
        stock = product.quantity_in_stock,
        "Stock adjusted"
    );
    Ok(Json(ActionResponse::ok("Stock updated successfully.", product)))
}
