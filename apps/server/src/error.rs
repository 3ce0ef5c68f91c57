//! # API Error Types
//!
//! Error types returned to the dashboard.
//!
//! ## Error Response Format
//! ```json
//! {
//!   "success": false,
//!   "code": "NOT_FOUND",
//!   "error": "Product not found."
//! }
//! ```
//!
//! ## Error Code Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Source Error               ErrorCode            HTTP                   │
//! │  ─────────────────────────  ───────────────────  ────                   │
//! │  ValidationError            VALIDATION_ERROR     400                    │
//! │  JSON / query rejection     VALIDATION_ERROR     400                    │
//! │  StoreError::NotFound       NOT_FOUND            404                    │
//! │  StoreError::Duplicate      CONFLICT             409                    │
//! │  CoreError::OutOfStock      OUT_OF_STOCK         409                    │
//! │  other CoreError            BUSINESS_LOGIC       422                    │
//! │  StoreError (I/O, corrupt)  STORAGE_ERROR        500                    │
//! │  anything else              INTERNAL             500                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{error, warn};

use pharma_core::{CoreError, ValidationError};
use pharma_store::StoreError;

/// API error returned from handlers.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

/// Machine-readable error codes for client handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    ValidationError,
    Conflict,
    OutOfStock,
    BusinessLogic,
    StorageError,
    Internal,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::Conflict | ErrorCode::OutOfStock => StatusCode::CONFLICT,
            ErrorCode::BusinessLogic => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::StorageError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }
}

/// Body of every failed response.
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    success: bool,
    code: ErrorCode,
    error: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            code: self.code,
            error: &self.message,
        };
        (self.code.status(), Json(body)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Conversions
// =============================================================================

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, .. } => {
                ApiError::not_found(format!("{} not found.", entity))
            }
            StoreError::Duplicate { .. } => ApiError::new(ErrorCode::Conflict, err.to_string()),
            StoreError::Io { .. } | StoreError::Corrupt { .. } => {
                // Paths stay in the log, not in the response.
                error!(error = %err, "Storage error");
                ApiError::new(ErrorCode::StorageError, "Data storage is unavailable.")
            }
            StoreError::Serialization(_) | StoreError::Internal(_) => {
                error!(error = %err, "Internal store error");
                ApiError::internal("An internal error occurred.")
            }
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::OutOfStock { .. } | CoreError::MaxStockReached { .. } => {
                ErrorCode::OutOfStock
            }
            CoreError::Validation(_) => ErrorCode::ValidationError,
            CoreError::InvalidSuggestion { .. } => {
                warn!(error = %err, "Advisor produced an invalid suggestion");
                ErrorCode::BusinessLogic
            }
            CoreError::EmptyInvoice
            | CoreError::InvoiceTooLarge { .. }
            | CoreError::NotOnInvoice(_) => ErrorCode::BusinessLogic,
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_mapping() {
        let err: ApiError = StoreError::not_found("Supplier", "abc").into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Supplier not found.");

        let err: ApiError = StoreError::duplicate("barcode", "123").into();
        assert_eq!(err.code, ErrorCode::Conflict);
        assert_eq!(err.code.status(), StatusCode::CONFLICT);

        let err: ApiError = StoreError::Internal("boom".into()).into();
        assert_eq!(err.code, ErrorCode::Internal);
        assert!(!err.message.contains("boom"));
    }

    #[test]
    fn test_core_error_mapping() {
        let err: ApiError = CoreError::OutOfStock {
            name: "Panadol".into(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::OutOfStock);
        assert_eq!(err.message, "Panadol is out of stock");

        let err: ApiError = CoreError::EmptyInvoice.into();
        assert_eq!(err.code.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let err: ApiError = CoreError::MaxStockReached {
            name: "Panadol".into(),
            available: 2,
        }
        .into();
        assert_eq!(err.code.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_validation_error_mapping() {
        let err: ApiError = ValidationError::Rule("Invalid date format".into()).into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "Invalid date format");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_error_code_serialization() {
        let json = serde_json::to_string(&ErrorCode::ValidationError).unwrap();
        assert_eq!(json, "\"VALIDATION_ERROR\"");
    }
}
