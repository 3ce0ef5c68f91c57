//! # Application State
//!
//! Shared state handed to every handler through axum's `State` extractor.
//!
//! ## State Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AppState (Clone, one per request)                                      │
//! │                                                                         │
//! │  ┌────────────┐ ┌──────────────────┐ ┌──────────────┐ ┌──────────────┐ │
//! │  │ Store      │ │ Arc<ServerConfig>│ │ InvoiceState │ │ Arc<dyn      │ │
//! │  │ (file      │ │ (read-only)      │ │ Arc<Mutex<   │ │ Reorder      │ │
//! │  │  handles)  │ │                  │ │  Invoice>>   │ │ Advisor>     │ │
//! │  └────────────┘ └──────────────────┘ └──────────────┘ └──────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Draft Invoice Lock
//! The register's draft uses a tokio mutex so a handler can hold it across
//! the store calls of one scan or checkout. Two requests against the same
//! draft are served one after the other.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tokio::sync::{Mutex, MutexGuard};

use pharma_core::{InventoryPolicy, Invoice, ReorderAdvisor};
use pharma_store::Store;

use crate::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub config: Arc<ServerConfig>,
    pub invoice: InvoiceState,
    pub advisor: Arc<dyn ReorderAdvisor>,
}

impl AppState {
    /// Builds state with the advisor described by the config.
    pub fn new(store: Store, config: ServerConfig) -> Self {
        let advisor = Arc::new(config.advisor());
        AppState {
            store,
            config: Arc::new(config),
            invoice: InvoiceState::new(),
            advisor,
        }
    }

    pub fn policy(&self) -> InventoryPolicy {
        self.config.inventory_policy()
    }

    /// Calendar day used for expiry checks.
    pub fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// The register's draft invoice.
#[derive(Debug, Clone, Default)]
pub struct InvoiceState {
    inner: Arc<Mutex<Invoice>>,
}

impl InvoiceState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self) -> MutexGuard<'_, Invoice> {
        self.inner.lock().await
    }
}
