//! # Validation Module
//!
//! Form-level checks run at the API boundary before anything is stored.
//!
//! ## Collected Errors
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Product form submitted                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  check every field ──► Vec<ValidationError>                             │
//! │       │                                                                 │
//! │       ├── empty      ──► Ok(parsed expiry date)                         │
//! │       └── non-empty  ──► Err(Multiple) ──► "Barcode is required,        │
//! │                                            Invalid date format"         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store never re-checks these rules. Anything written through a path
//! that skips this module is stored as-is.

use chrono::{DateTime, NaiveDate};

use crate::error::ValidationError;
use crate::types::{CustomerDraft, PaymentMethod, ProductDraft, SaleItem, SupplierDraft, TransactionDraft};
use crate::{
    MAX_AMOUNT_CENTS, MAX_BARCODE_LENGTH, MAX_INVOICE_ITEMS, MAX_NAME_LENGTH, MAX_PRICE_CENTS,
    MAX_QUANTITY, MAX_SEARCH_LENGTH,
};

const INVALID_DATE: &str = "Invalid date format";

fn required(field: &str) -> ValidationError {
    ValidationError::Required {
        field: field.to_string(),
    }
}

fn negative(field: &str) -> ValidationError {
    ValidationError::Negative {
        field: field.to_string(),
    }
}

fn too_large(field: &str, max: i64) -> ValidationError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        min: 0,
        max,
    }
}

fn check_length(field: &str, value: &str, max: usize, errors: &mut Vec<ValidationError>) {
    if value.chars().count() > max {
        errors.push(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
}

fn into_result<T>(errors: Vec<ValidationError>, ok: T) -> Result<T, ValidationError> {
    match ValidationError::collect(errors) {
        Some(err) => Err(err),
        None => Ok(ok),
    }
}

// =============================================================================
// Products
// =============================================================================

/// Parses an expiry date as typed into the product form.
///
/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp, in which case only
/// the date part is kept.
pub fn parse_expiry_date(input: &str) -> Result<NaiveDate, ValidationError> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(input)
        .map(|ts| ts.date_naive())
        .map_err(|_| ValidationError::Rule(INVALID_DATE.to_string()))
}

/// Validates a product form and returns its parsed expiry date.
///
/// Every failing field is reported, not just the first.
pub fn validate_product_draft(draft: &ProductDraft) -> Result<NaiveDate, ValidationError> {
    let mut errors = Vec::new();

    let name = draft.name.trim();
    if name.is_empty() {
        errors.push(required("Product name"));
    }
    check_length("Product name", name, MAX_NAME_LENGTH, &mut errors);

    let barcode = draft.barcode.trim();
    if barcode.is_empty() {
        errors.push(required("Barcode"));
    }
    check_length("Barcode", barcode, MAX_BARCODE_LENGTH, &mut errors);

    if draft.purchase_price_cents < 0 {
        errors.push(negative("Purchase price"));
    } else if draft.purchase_price_cents > MAX_PRICE_CENTS {
        errors.push(too_large("Purchase price", MAX_PRICE_CENTS));
    }
    if draft.selling_price_cents < 0 {
        errors.push(negative("Selling price"));
    } else if draft.selling_price_cents > MAX_PRICE_CENTS {
        errors.push(too_large("Selling price", MAX_PRICE_CENTS));
    }
    if draft.unit.trim().is_empty() {
        errors.push(required("Unit"));
    }
    if draft.quantity_in_stock < 0 {
        errors.push(ValidationError::Rule(
            "Quantity must be a non-negative integer".to_string(),
        ));
    } else if draft.quantity_in_stock > MAX_QUANTITY {
        errors.push(too_large("Quantity", MAX_QUANTITY));
    }

    let expiry = parse_expiry_date(&draft.expiry_date);
    if let Err(err) = &expiry {
        errors.push(ValidationError::Rule(err.to_string()));
    }

    match draft.low_stock_threshold {
        Some(t) if t < 0 => errors.push(negative("Low stock threshold")),
        Some(t) if t > MAX_QUANTITY => errors.push(too_large("Low stock threshold", MAX_QUANTITY)),
        _ => {}
    }

    match (ValidationError::collect(errors), expiry) {
        (Some(err), _) => Err(err),
        (None, Ok(date)) => Ok(date),
        (None, Err(err)) => Err(err),
    }
}

/// Trims a scanned or typed barcode, rejecting blank input.
pub fn validate_barcode(barcode: &str) -> Result<&str, ValidationError> {
    let barcode = barcode.trim();
    if barcode.is_empty() {
        return Err(required("Barcode"));
    }
    if barcode.chars().count() > MAX_BARCODE_LENGTH {
        return Err(ValidationError::TooLong {
            field: "Barcode".to_string(),
            max: MAX_BARCODE_LENGTH,
        });
    }
    Ok(barcode)
}

/// Normalizes a search box value. Blank input means "no search".
pub fn validate_search_query(query: Option<&str>) -> Result<Option<String>, ValidationError> {
    let Some(query) = query.map(str::trim).filter(|q| !q.is_empty()) else {
        return Ok(None);
    };
    if query.chars().count() > MAX_SEARCH_LENGTH {
        return Err(ValidationError::TooLong {
            field: "Search query".to_string(),
            max: MAX_SEARCH_LENGTH,
        });
    }
    Ok(Some(query.to_string()))
}

/// Checks a manual stock correction: non-zero and at most `MAX_QUANTITY`
/// units either way.
pub fn validate_stock_adjustment(delta: i64) -> Result<i64, ValidationError> {
    if delta == 0 {
        return Err(ValidationError::Rule(
            "Stock adjustment must not be zero".to_string(),
        ));
    }
    if delta.unsigned_abs() > MAX_QUANTITY.unsigned_abs() {
        return Err(ValidationError::OutOfRange {
            field: "Stock adjustment".to_string(),
            min: -MAX_QUANTITY,
            max: MAX_QUANTITY,
        });
    }
    Ok(delta)
}

// =============================================================================
// Quick Sale
// =============================================================================

/// Validates a quick-invoice submission and returns its payment method.
pub fn validate_quick_sale(
    items: &[SaleItem],
    total_amount_cents: i64,
    payment_method: &str,
) -> Result<PaymentMethod, ValidationError> {
    let mut errors = Vec::new();

    if items.is_empty() {
        errors.push(ValidationError::Rule(
            "At least one item is required for a sale.".to_string(),
        ));
    }
    if items.len() > MAX_INVOICE_ITEMS {
        errors.push(ValidationError::Rule(format!(
            "A sale cannot have more than {} items.",
            MAX_INVOICE_ITEMS
        )));
    }

    // One message per kind of failure, however many lines share it.
    if items.iter().any(|i| i.product_id.trim().is_empty()) {
        errors.push(required("Product ID"));
    }
    if items.iter().any(|i| i.quantity_sold < 1) {
        errors.push(ValidationError::Rule(
            "Quantity sold must be at least 1".to_string(),
        ));
    }
    if items.iter().any(|i| i.quantity_sold > MAX_QUANTITY) {
        errors.push(too_large("Quantity sold", MAX_QUANTITY));
    }
    if items.iter().any(|i| i.selling_price_at_sale_cents < 0) {
        errors.push(negative("Selling price at sale"));
    }
    if items.iter().any(|i| i.selling_price_at_sale_cents > MAX_PRICE_CENTS) {
        errors.push(too_large("Selling price at sale", MAX_PRICE_CENTS));
    }
    if total_amount_cents < 0 {
        errors.push(negative("Total amount"));
    } else if total_amount_cents > MAX_AMOUNT_CENTS {
        errors.push(too_large("Total amount", MAX_AMOUNT_CENTS));
    }

    let method = payment_method.parse::<PaymentMethod>();
    if let Err(err) = &method {
        errors.push(ValidationError::Rule(err.to_string()));
    }

    match (ValidationError::collect(errors), method) {
        (Some(err), _) => Err(err),
        (None, Ok(method)) => Ok(method),
        (None, Err(err)) => Err(err),
    }
}

// =============================================================================
// Suppliers, Customers, Ledger
// =============================================================================

/// Loose email shape check: something before `@`, a dot in the domain.
fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .map(|(host, tld)| !host.is_empty() && !tld.is_empty())
                    .unwrap_or(false)
        }
        None => false,
    }
}

pub fn validate_supplier_draft(draft: &SupplierDraft) -> Result<(), ValidationError> {
    let mut errors = Vec::new();

    let name = draft.name.trim();
    if name.is_empty() {
        errors.push(required("Supplier name"));
    }
    check_length("Supplier name", name, MAX_NAME_LENGTH, &mut errors);

    if let Some(email) = draft.email.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
        if !looks_like_email(email) {
            errors.push(ValidationError::InvalidFormat {
                field: "Email".to_string(),
                reason: "not a valid email address".to_string(),
            });
        }
    }

    into_result(errors, ())
}

pub fn validate_customer_draft(draft: &CustomerDraft) -> Result<(), ValidationError> {
    let mut errors = Vec::new();

    let name = draft.name.trim();
    if name.is_empty() {
        errors.push(required("Customer name"));
    }
    check_length("Customer name", name, MAX_NAME_LENGTH, &mut errors);

    into_result(errors, ())
}

pub fn validate_transaction_draft(draft: &TransactionDraft) -> Result<(), ValidationError> {
    let mut errors = Vec::new();

    if draft.amount_cents < 0 {
        errors.push(negative("Amount"));
    } else if draft.amount_cents > MAX_AMOUNT_CENTS {
        errors.push(too_large("Amount", MAX_AMOUNT_CENTS));
    }
    if draft.description.trim().is_empty() {
        errors.push(required("Description"));
    }

    into_result(errors, ())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionType;

    fn valid_draft() -> ProductDraft {
        ProductDraft {
            name: "Amoxil 500mg".to_string(),
            barcode: "5000158062924".to_string(),
            purchase_price_cents: 420,
            selling_price_cents: 650,
            unit: "box".to_string(),
            quantity_in_stock: 20,
            expiry_date: "2027-06-30".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_product_returns_expiry() {
        let date = validate_product_draft(&valid_draft()).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2027, 6, 30).unwrap());
    }

    #[test]
    fn test_expiry_accepts_rfc3339() {
        let date = parse_expiry_date("2027-06-30T00:00:00.000Z").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2027, 6, 30).unwrap());
        assert_eq!(
            parse_expiry_date("next june").unwrap_err().to_string(),
            "Invalid date format"
        );
    }

    #[test]
    fn test_product_errors_are_collected() {
        let draft = ProductDraft {
            name: "  ".to_string(),
            purchase_price_cents: -1,
            expiry_date: "31/06/2027".to_string(),
            ..valid_draft()
        };

        let err = validate_product_draft(&draft).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Product name is required, Purchase price must be non-negative, Invalid date format"
        );
    }

    #[test]
    fn test_negative_stock_and_threshold() {
        let draft = ProductDraft {
            quantity_in_stock: -3,
            low_stock_threshold: Some(-1),
            ..valid_draft()
        };

        let err = validate_product_draft(&draft).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Quantity must be a non-negative integer, Low stock threshold must be non-negative"
        );
    }

    #[test]
    fn test_barcode_is_trimmed() {
        assert_eq!(validate_barcode("  123  ").unwrap(), "123");
        assert_eq!(validate_barcode("   ").unwrap_err().to_string(), "Barcode is required");
    }

    #[test]
    fn test_search_query_blank_is_none() {
        assert_eq!(validate_search_query(None).unwrap(), None);
        assert_eq!(validate_search_query(Some("   ")).unwrap(), None);
        assert_eq!(
            validate_search_query(Some(" amox ")).unwrap().as_deref(),
            Some("amox")
        );
        let long = "x".repeat(MAX_SEARCH_LENGTH + 1);
        assert!(validate_search_query(Some(&long)).is_err());
    }

    #[test]
    fn test_stock_adjustment_bounds() {
        assert_eq!(validate_stock_adjustment(-5).unwrap(), -5);
        assert_eq!(validate_stock_adjustment(MAX_QUANTITY).unwrap(), MAX_QUANTITY);
        assert!(validate_stock_adjustment(0).is_err());
        for delta in [MAX_QUANTITY + 1, i64::MAX, i64::MIN] {
            assert!(matches!(
                validate_stock_adjustment(delta).unwrap_err(),
                ValidationError::OutOfRange { .. }
            ));
        }
    }

    #[test]
    fn test_quick_sale_rules() {
        let item = SaleItem {
            product_id: "p1".to_string(),
            quantity_sold: 1,
            selling_price_at_sale_cents: 650,
        };
        assert_eq!(
            validate_quick_sale(&[item.clone()], 650, "card").unwrap(),
            PaymentMethod::Card
        );

        let err = validate_quick_sale(&[], 0, "").unwrap_err();
        assert_eq!(
            err.to_string(),
            "At least one item is required for a sale., Payment method is required."
        );

        let bad = SaleItem {
            quantity_sold: 0,
            ..item
        };
        let err = validate_quick_sale(&[bad], -5, "cash").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Quantity sold must be at least 1, Total amount must be non-negative"
        );
    }

    #[test]
    fn test_quick_sale_upper_bounds() {
        let item = SaleItem {
            product_id: "p1".to_string(),
            quantity_sold: 3,
            selling_price_at_sale_cents: i64::MAX / 2,
        };
        let err = validate_quick_sale(&[item.clone()], i64::MAX, "cash").unwrap_err();
        assert_eq!(
            err.to_string(),
            format!(
                "Selling price at sale must be between 0 and {}, Total amount must be between 0 and {}",
                MAX_PRICE_CENTS, MAX_AMOUNT_CENTS
            )
        );

        let bulk = SaleItem {
            quantity_sold: MAX_QUANTITY + 1,
            selling_price_at_sale_cents: 100,
            ..item.clone()
        };
        assert!(matches!(
            validate_quick_sale(&[bulk], 100, "cash").unwrap_err(),
            ValidationError::OutOfRange { .. }
        ));

        let lines = vec![
            SaleItem {
                quantity_sold: 1,
                selling_price_at_sale_cents: 1,
                ..item
            };
            MAX_INVOICE_ITEMS + 1
        ];
        assert!(validate_quick_sale(&lines, 101, "cash").is_err());
    }

    #[test]
    fn test_product_upper_bounds() {
        let draft = ProductDraft {
            selling_price_cents: MAX_PRICE_CENTS + 1,
            quantity_in_stock: i64::MAX,
            low_stock_threshold: Some(i64::MAX),
            ..valid_draft()
        };
        let err = validate_product_draft(&draft).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!(
                "Selling price must be between 0 and {}, Quantity must be between 0 and {}, \
                 Low stock threshold must be between 0 and {}",
                MAX_PRICE_CENTS, MAX_QUANTITY, MAX_QUANTITY
            )
        );
    }

    #[test]
    fn test_supplier_email() {
        let mut draft = SupplierDraft {
            name: "MedSupply Co".to_string(),
            email: Some("orders@medsupply.com".to_string()),
            ..Default::default()
        };
        assert!(validate_supplier_draft(&draft).is_ok());

        draft.email = Some("orders.medsupply.com".to_string());
        assert!(validate_supplier_draft(&draft).is_err());

        draft.email = Some("   ".to_string());
        assert!(validate_supplier_draft(&draft).is_ok());
    }

    #[test]
    fn test_customer_and_transaction() {
        assert!(validate_customer_draft(&CustomerDraft::default()).is_err());

        let draft = TransactionDraft {
            kind: TransactionType::Expense,
            date: None,
            amount_cents: -100,
            description: String::new(),
            related_sale_id: None,
        };
        assert_eq!(
            validate_transaction_draft(&draft).unwrap_err().to_string(),
            "Amount must be non-negative, Description is required"
        );
    }
}
