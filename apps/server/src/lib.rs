//! # PharmaEase Server
//!
//! JSON API consumed by the PharmaEase dashboard.
//!
//! ## Module Organization
//! ```text
//! pharma_server/
//! ├── config.rs       # ServerConfig (TOML + PHARMA__* environment)
//! ├── error.rs        # ApiError, ErrorCode, conversions
//! ├── state.rs        # AppState, register draft invoice
//! └── handlers/       # One module per dashboard area
//!     ├── health.rs
//!     ├── products.rs
//!     ├── inventory.rs
//!     ├── quick_invoice.rs
//!     ├── sales.rs
//!     ├── customers.rs
//!     ├── suppliers.rs
//!     ├── transactions.rs
//!     ├── reports.rs
//!     └── smart_order.rs
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use handlers::{
    customers, health, inventory, products, quick_invoice, reports, sales, smart_order, suppliers,
    transactions,
};
pub use state::AppState;

/// Builds the full API router.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        // Products
        .route(
            "/api/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/api/products/barcode/{barcode}",
            get(products::get_product_by_barcode),
        )
        .route(
            "/api/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/api/products/{id}/stock", post(products::adjust_stock))
        .route("/api/inventory/summary", get(inventory::summary))
        // Quick invoice
        .route("/api/quick-invoice/sales", post(quick_invoice::create_quick_sale))
        .route(
            "/api/quick-invoice/draft",
            get(quick_invoice::get_draft).delete(quick_invoice::clear_draft),
        )
        .route("/api/quick-invoice/draft/scan", post(quick_invoice::scan_barcode))
        .route(
            "/api/quick-invoice/draft/items/{product_id}",
            put(quick_invoice::set_line_quantity).delete(quick_invoice::remove_line),
        )
        .route(
            "/api/quick-invoice/draft/complete",
            post(quick_invoice::complete_draft),
        )
        // Sales, customers, suppliers, ledger
        .route("/api/sales", get(sales::list_sales))
        .route("/api/sales/{id}", get(sales::get_sale))
        .route(
            "/api/customers",
            get(customers::list_customers).post(customers::create_customer),
        )
        .route("/api/customers/{id}", get(customers::get_customer))
        .route(
            "/api/suppliers",
            get(suppliers::list_suppliers).post(suppliers::create_supplier),
        )
        .route(
            "/api/suppliers/{id}",
            get(suppliers::get_supplier)
                .put(suppliers::update_supplier)
                .delete(suppliers::delete_supplier),
        )
        .route(
            "/api/transactions",
            get(transactions::list_transactions).post(transactions::create_transaction),
        )
        // Reports
        .route("/api/reports/summary", get(reports::summary))
        .route("/api/reports/daily-sales", get(reports::daily_sales))
        .route("/api/reports/top-products", get(reports::top_products))
        // Smart order
        .route("/api/smart-order/prefill", get(smart_order::prefill))
        .route("/api/smart-order/suggest", post(smart_order::suggest))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{Duration, NaiveDate, Utc};
    use tempfile::TempDir;

    use pharma_core::{Product, ProductDraft};
    use pharma_store::{Store, StoreConfig};

    use crate::config::ServerConfig;
    use crate::state::AppState;

    /// State over a fresh temp data directory. Keep the `TempDir` alive.
    pub async fn test_state() -> (TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(StoreConfig::new(dir.path())).await.unwrap();
        (dir, AppState::new(store, ServerConfig::default()))
    }

    /// A valid product form expiring in about two years.
    pub fn draft(name: &str, barcode: &str, stock: i64) -> ProductDraft {
        let expiry = Utc::now().date_naive() + Duration::days(730);
        ProductDraft {
            name: name.to_string(),
            barcode: barcode.to_string(),
            purchase_price_cents: 100,
            selling_price_cents: 150,
            unit: "box".to_string(),
            quantity_in_stock: stock,
            expiry_date: expiry.format("%Y-%m-%d").to_string(),
            ..Default::default()
        }
    }

    pub fn stock_product(name: &str, barcode: &str, stock: i64, expiry: NaiveDate) -> Product {
        let mut form = draft(name, barcode, stock);
        form.expiry_date = String::new();
        Product::from_draft(form, expiry, Utc::now())
    }

    /// Inserts a product straight into the store.
    pub async fn seed_product(state: &AppState, name: &str, barcode: &str, stock: i64) -> Product {
        let expiry = Utc::now().date_naive() + Duration::days(730);
        state
            .store
            .products()
            .insert(stock_product(name, barcode, stock, expiry))
            .await
            .unwrap()
    }
}
