//! # Smart Order Handlers
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET /api/smart-order/prefill                                           │
//! │       │  { products, sales, input: { salesData, stockLevels,            │
//! │       │                              expirationDates } }                │
//! │       ▼                                                                 │
//! │  Dashboard form (user may edit the three sections)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  POST /api/smart-order/suggest                                          │
//! │       │                                                                 │
//! │       ├── section missing ──► 400 "Missing data: …"                     │
//! │       ▼                                                                 │
//! │  ReorderAdvisor::suggest ──► validate_suggestion                        │
//! │       │                            │                                    │
//! │       │                            └── bad output ──► 422               │
//! │       ▼                                                                 │
//! │  { success, message, data: { suggestedOrder, reasoning } }              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use pharma_core::reorder::{suggest_order, ReorderRequest};
use pharma_core::{Product, ReorderInput, Sale, SuggestedOrder};

use crate::error::ApiError;
use crate::handlers::{or_empty, ActionResponse};
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrefillResponse {
    pub products: Vec<Product>,
    pub sales: Vec<Sale>,
    pub input: ReorderInput,
}

/// `GET /api/smart-order/prefill`
pub async fn prefill(State(state): State<AppState>) -> Json<PrefillResponse> {
    let products = or_empty(state.store.products().all().await, "products");
    let sales = or_empty(state.store.sales().all().await, "sales");
    let input = ReorderInput::from_records(&products, &sales);
    debug!(
        sales_records = input.sales_data.len(),
        stock_levels = input.stock_levels.len(),
        "smart order prefill"
    );
    Json(PrefillResponse {
        products,
        sales,
        input,
    })
}

/// `POST /api/smart-order/suggest`
pub async fn suggest(
    State(state): State<AppState>,
    payload: Result<Json<ReorderRequest>, JsonRejection>,
) -> Result<Json<ActionResponse<SuggestedOrder>>, ApiError> {
    let Json(request) = payload?;
    let input = request.into_input()?;

    let suggestion = suggest_order(state.advisor.as_ref(), &input, Utc::now())?;
    info!(
        products = suggestion.suggested_order.len(),
        units = suggestion
            .suggested_order
            .values()
            .fold(0i64, |acc, q| acc.saturating_add(*q)),
        "Reorder suggestion generated"
    );
    Ok(Json(ActionResponse::ok("Suggestion generated.", suggestion)))
}
