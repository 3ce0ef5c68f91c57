//! # Sales Handlers
//!
//! Read-only views of recorded sales. Sales are only written through the
//! quick invoice.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use tracing::{debug, warn};

use pharma_core::{Sale, Transaction};

use crate::error::ApiError;
use crate::handlers::or_empty;
use crate::state::AppState;

/// A sale with the ledger entries that reference it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDetail {
    #[serde(flatten)]
    pub sale: Sale,
    pub ledger_entries: Vec<Transaction>,
}

/// `GET /api/sales`, newest first.
pub async fn list_sales(State(state): State<AppState>) -> Json<Vec<Sale>> {
    let mut sales = or_empty(state.store.sales().all().await, "sales");
    sales.sort_by(|a, b| b.sale_date.cmp(&a.sale_date));
    debug!(count = sales.len(), "list_sales");
    Json(sales)
}

/// `GET /api/sales/{id}`
pub async fn get_sale(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SaleDetail>, ApiError> {
    debug!(id = %id, "get_sale");
    let sale = state
        .store
        .sales()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Sale not found."))?;

    let ledger_entries = match state.store.transactions().for_sale(&sale.id).await {
        Ok(entries) => entries,
        Err(err) => {
            warn!(error = %err, sale_id = %sale.id, "Could not load ledger entries for sale");
            Vec::new()
        }
    };
    Ok(Json(SaleDetail {
        sale,
        ledger_entries,
    }))
}
