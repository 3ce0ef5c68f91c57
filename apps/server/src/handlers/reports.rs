//! # Report Handlers
//!
//! Dashboard charts. All three read whole collections and aggregate in
//! memory; unreadable files count as empty.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use tracing::debug;

use pharma_core::reports::{daily_sales as daily_totals, top_products as rank_products};
use pharma_core::reports::{DailySales, FinancialSummary, TopProduct};

use crate::error::ApiError;
use crate::handlers::or_empty;
use crate::state::AppState;

const DEFAULT_TOP_PRODUCTS: usize = 10;
const MAX_TOP_PRODUCTS: usize = 50;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopProductsParams {
    pub limit: Option<usize>,
}

/// `GET /api/reports/summary`
pub async fn summary(State(state): State<AppState>) -> Json<FinancialSummary> {
    let transactions = or_empty(state.store.transactions().all().await, "transactions");
    let sales = or_empty(state.store.sales().all().await, "sales");
    let summary = FinancialSummary::compute(&transactions, &sales);
    debug!(
        revenue_cents = summary.total_revenue_cents,
        expenses_cents = summary.total_expenses_cents,
        "financial summary"
    );
    Json(summary)
}

/// `GET /api/reports/daily-sales`
pub async fn daily_sales(State(state): State<AppState>) -> Json<Vec<DailySales>> {
    let sales = or_empty(state.store.sales().all().await, "sales");
    Json(daily_totals(&sales))
}

/// `GET /api/reports/top-products?limit=`
///
/// `limit` defaults to 10 and is capped at 50.
pub async fn top_products(
    State(state): State<AppState>,
    params: Result<Query<TopProductsParams>, QueryRejection>,
) -> Result<Json<Vec<TopProduct>>, ApiError> {
    let Query(params) = params?;
    let limit = match params.limit {
        Some(0) => return Err(ApiError::validation("limit must be positive")),
        Some(n) => n.min(MAX_TOP_PRODUCTS),
        None => DEFAULT_TOP_PRODUCTS,
    };

    let sales = or_empty(state.store.sales().all().await, "sales");
    let products = or_empty(state.store.products().all().await, "products");
    Ok(Json(rank_products(&sales, &products, limit)))
}
