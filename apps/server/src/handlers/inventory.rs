//! # Inventory Summary

use axum::extract::State;
use axum::Json;
use tracing::debug;

use pharma_core::InventorySummary;

use crate::handlers::or_empty;
use crate::state::AppState;

/// `GET /api/inventory/summary`: the dashboard's stock tiles.
pub async fn summary(State(state): State<AppState>) -> Json<InventorySummary> {
    let products = or_empty(state.store.products().all().await, "products");
    let summary = InventorySummary::from_products(&products, state.today(), &state.policy());
    debug!(
        total = summary.total_products,
        low = summary.low_stock_count,
        expired = summary.expired_count,
        "inventory summary"
    );
    Json(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{stock_product, test_state};
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_summary_counts() {
        let (_dir, state) = test_state().await;
        let today = Utc::now().date_naive();
        let repo = state.store.products();

        repo.insert(stock_product("Panadol", "111", 50, today + Duration::days(365)))
            .await
            .unwrap();
        repo.insert(stock_product("Amoxil", "222", 2, today + Duration::days(10)))
            .await
            .unwrap();
        repo.insert(stock_product("Flagyl", "333", 0, today - Duration::days(1)))
            .await
            .unwrap();

        let Json(summary) = summary(State(state)).await;
        assert_eq!(summary.total_products, 3);
        assert_eq!(summary.low_stock_count, 2);
        assert_eq!(summary.out_of_stock_count, 1);
        assert_eq!(summary.expired_count, 1);
        assert_eq!(summary.expiring_soon_count, 1);
        // purchase price 100 each
        assert_eq!(summary.stock_value_cents, 5_200);
    }

    #[tokio::test]
    async fn test_summary_on_empty_store() {
        let (_dir, state) = test_state().await;
        let Json(summary) = summary(State(state)).await;
        assert_eq!(summary, InventorySummary::default());
    }
}
