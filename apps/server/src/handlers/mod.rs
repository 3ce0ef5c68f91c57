//! # HTTP Handlers
//!
//! One module per dashboard area. Every handler takes `State<AppState>`
//! and returns either a plain JSON read model or an [`ActionResponse`].
//!
//! ## Response Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Reads      GET  /api/products        → [ {...}, {...} ]                │
//! │  Mutations  POST /api/products        → { success, message, data? }     │
//! │  Failures   any                       → { success: false, code, error } │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! List reads never fail on storage errors; they log and answer `[]` so the
//! dashboard keeps rendering. Mutations propagate every storage error.

pub mod customers;
pub mod health;
pub mod inventory;
pub mod products;
pub mod quick_invoice;
pub mod reports;
pub mod sales;
pub mod smart_order;
pub mod suppliers;
pub mod transactions;

use serde::Serialize;
use tracing::error;

use pharma_store::StoreResult;

/// Success body of a mutation.
#[derive(Debug, Clone, Serialize)]
pub struct ActionResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ActionResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        ActionResponse {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ActionResponse<()> {
    pub fn done(message: impl Into<String>) -> Self {
        ActionResponse {
            success: true,
            message: message.into(),
            data: None,
        }
    }
}

/// Unwraps a list read, logging and replacing failures with an empty list.
pub(crate) fn or_empty<T>(result: StoreResult<Vec<T>>, what: &str) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(err) => {
            error!(error = %err, collection = what, "Failed to read collection");
            Vec::new()
        }
    }
}
