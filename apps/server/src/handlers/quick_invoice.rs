//! # Quick Invoice Handlers
//!
//! Barcode-driven checkout. The dashboard can either build the basket
//! itself and post it in one go, or drive the register's server-side draft
//! scan by scan.
//!
//! ## Checkout Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Draft Invoice Lifecycle                              │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ Scanning │────►│ Payment  │────►│ Recorded │       │
//! │  │  Draft   │     │          │     │  Method  │     │   Sale   │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                                  │             │
//! │                   scan_barcode                     complete_draft       │
//! │                   set_line_quantity                       │             │
//! │                   remove_line                             ▼             │
//! │                        │                          draft cleared        │
//! │                        ▼                                                │
//! │                   clear_draft ─────────────────► (back to empty)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Recording a Sale
//! Both entry points end in [`record_quick_sale`]:
//! 1. append the sale to `sales.json` and take its units off the shelf
//! 2. append a revenue entry "Sale from Quick Invoice - INV-..." linked to it
//!
//! Once step 1 succeeds the sale stands. A failure on step 2 is logged and
//! reported as `ledgerRecorded: false` rather than as an error, so the
//! client never retries a sale that was already taken off the shelf.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use pharma_core::invoice::{QuantityChange, ScanOutcome};
use pharma_core::validation::{validate_barcode, validate_quick_sale};
use pharma_core::{InvoiceView, Money, PaymentMethod, Sale, SaleItem, Transaction};

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Payloads
// =============================================================================

/// A basket submitted in one request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickSaleRequest {
    #[serde(default)]
    pub items: Vec<SaleItem>,
    #[serde(default)]
    pub total_amount_cents: i64,
    #[serde(default)]
    pub payment_method: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickSaleResponse {
    pub success: bool,
    pub message: String,
    pub sale_id: String,
    pub invoice_number: String,
    pub ledger_recorded: bool,
}

impl From<&RecordedSale> for QuickSaleResponse {
    fn from(recorded: &RecordedSale) -> Self {
        let message = if recorded.ledger_recorded {
            "Sale completed successfully."
        } else {
            "Sale completed, but its revenue entry could not be saved."
        };
        QuickSaleResponse {
            success: true,
            message: message.to_string(),
            sale_id: recorded.sale.id.clone(),
            invoice_number: recorded.sale.invoice_number.clone().unwrap_or_default(),
            ledger_recorded: recorded.ledger_recorded,
        }
    }
}

/// A written sale and whether its revenue entry made it to the ledger.
#[derive(Debug, Clone)]
pub(crate) struct RecordedSale {
    pub sale: Sale,
    pub ledger_recorded: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScanRequest {
    #[serde(default)]
    pub barcode: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResponse {
    pub outcome: ScanOutcome,
    pub invoice: InvoiceView,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuantityRequest {
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantityResponse {
    pub change: QuantityChange,
    pub invoice: InvoiceView,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteRequest {
    #[serde(default)]
    pub payment_method: String,
}

// =============================================================================
// One-shot Sale
// =============================================================================

/// `POST /api/quick-invoice/sales`
///
/// ## Request
/// ```json
/// {
///   "items": [{ "productId": "…", "quantitySold": 2, "sellingPriceAtSaleCents": 120 }],
///   "totalAmountCents": 240,
///   "paymentMethod": "cash"
/// }
/// ```
///
/// The submitted total is stored as sent. A total that disagrees with the
/// lines is logged but accepted.
pub async fn create_quick_sale(
    State(state): State<AppState>,
    payload: Result<Json<QuickSaleRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<QuickSaleResponse>), ApiError> {
    let Json(request) = payload?;
    let method = validate_quick_sale(&request.items, request.total_amount_cents, &request.payment_method)?;
    debug!(lines = request.items.len(), method = %method, "create_quick_sale");

    let total = Money::from_cents(request.total_amount_cents);
    let recorded = record_quick_sale(&state, request.items, total, method).await?;
    Ok((StatusCode::CREATED, Json(QuickSaleResponse::from(&recorded))))
}

/// Writes a quick sale and its revenue ledger entry.
///
/// Errors only when the sale itself was not written.
pub(crate) async fn record_quick_sale(
    state: &AppState,
    items: Vec<SaleItem>,
    total: Money,
    method: PaymentMethod,
) -> Result<RecordedSale, ApiError> {
    let now = Utc::now();
    let sale = Sale::quick(items, total, method, now);
    if sale.items_total() != sale.total() {
        warn!(
            submitted = %sale.total(),
            computed = %sale.items_total(),
            "Quick sale total differs from its lines"
        );
    }
    let sale = state.store.sales().record_sale(sale).await?;

    let invoice_number = sale.invoice_number.clone().unwrap_or_default();
    let description = format!("Sale from Quick Invoice - {}", invoice_number);
    let ledger_recorded = match state
        .store
        .transactions()
        .insert(Transaction::revenue_for_sale(&sale, description, now))
        .await
    {
        Ok(_) => true,
        Err(err) => {
            error!(
                error = %err,
                sale_id = %sale.id,
                invoice = %invoice_number,
                "Sale recorded but its revenue entry was not"
            );
            false
        }
    };

    info!(
        sale_id = %sale.id,
        invoice = %invoice_number,
        total = %sale.total(),
        ledger_recorded,
        "Quick sale completed"
    );
    Ok(RecordedSale {
        sale,
        ledger_recorded,
    })
}

// =============================================================================
// Draft Invoice
// =============================================================================

/// `GET /api/quick-invoice/draft`
pub async fn get_draft(State(state): State<AppState>) -> Json<InvoiceView> {
    let invoice = state.invoice.lock().await;
    Json(InvoiceView::from(&*invoice))
}

/// `DELETE /api/quick-invoice/draft`
pub async fn clear_draft(State(state): State<AppState>) -> Json<InvoiceView> {
    debug!("clear_draft");
    let mut invoice = state.invoice.lock().await;
    invoice.clear();
    Json(InvoiceView::from(&*invoice))
}

/// `POST /api/quick-invoice/draft/scan`
///
/// ## Behavior
/// - Unknown barcode: 404 "Product not found"
/// - Nothing on the shelf: out of stock
/// - Already on the draft: quantity + 1, unless that passes the stock
/// - Otherwise: new line of 1 at today's selling price
pub async fn scan_barcode(
    State(state): State<AppState>,
    payload: Result<Json<ScanRequest>, JsonRejection>,
) -> Result<Json<ScanResponse>, ApiError> {
    let Json(request) = payload?;
    let barcode = validate_barcode(&request.barcode)?;
    debug!(barcode = %barcode, "scan_barcode");

    let mut invoice = state.invoice.lock().await;
    let product = state
        .store
        .products()
        .get_by_barcode(barcode)
        .await?
        .ok_or_else(|| ApiError::not_found("Product not found"))?;

    let outcome = invoice.scan(&product)?;
    Ok(Json(ScanResponse {
        outcome,
        invoice: InvoiceView::from(&*invoice),
    }))
}

/// `PUT /api/quick-invoice/draft/items/{productId}`
///
/// Stock is re-read so the clamp uses the shelf as it is now. If the read
/// fails, the stock seen at scan time is used.
pub async fn set_line_quantity(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    payload: Result<Json<QuantityRequest>, JsonRejection>,
) -> Result<Json<QuantityResponse>, ApiError> {
    let Json(request) = payload?;
    debug!(product_id = %product_id, quantity = request.quantity, "set_line_quantity");

    let mut invoice = state.invoice.lock().await;
    let available = match state.store.products().get_by_id(&product_id).await {
        Ok(product) => product.map(|p| p.quantity_in_stock),
        Err(err) => {
            warn!(error = %err, product_id = %product_id, "Could not refresh stock");
            None
        }
    };

    let change = invoice.set_quantity(&product_id, request.quantity, available)?;
    Ok(Json(QuantityResponse {
        change,
        invoice: InvoiceView::from(&*invoice),
    }))
}

/// `DELETE /api/quick-invoice/draft/items/{productId}`
pub async fn remove_line(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<InvoiceView>, ApiError> {
    debug!(product_id = %product_id, "remove_line");
    let mut invoice = state.invoice.lock().await;
    invoice.remove(&product_id)?;
    Ok(Json(InvoiceView::from(&*invoice)))
}

/// `POST /api/quick-invoice/draft/complete`
///
/// Records the draft as a sale at its computed total. The draft is cleared
/// whenever the sale was written, even if its ledger entry was not.
pub async fn complete_draft(
    State(state): State<AppState>,
    payload: Result<Json<CompleteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<QuickSaleResponse>), ApiError> {
    let Json(request) = payload?;

    let mut invoice = state.invoice.lock().await;
    let items = invoice.sale_items()?;
    let method: PaymentMethod = request.payment_method.parse()?;
    debug!(lines = items.len(), method = %method, "complete_draft");

    let recorded = record_quick_sale(&state, items, invoice.total(), method).await?;
    invoice.clear();
    Ok((StatusCode::CREATED, Json(QuickSaleResponse::from(&recorded))))
}
