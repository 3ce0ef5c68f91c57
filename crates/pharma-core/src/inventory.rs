//! # Inventory Rules
//!
//! Stock and expiry classification, the dashboard summary, and product
//! search/filtering.
//!
//! ## Classification
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Stock (threshold = lowStockThreshold or policy default)                │
//! │                                                                         │
//! │    qty <= 0           ──► OutOfStock                                    │
//! │    qty <  threshold   ──► LowStock                                      │
//! │    otherwise          ──► InStock                                       │
//! │                                                                         │
//! │  Expiry (window = policy.expiry_warning_days)                           │
//! │                                                                         │
//! │    expiry <  today            ──► Expired                               │
//! │    expiry <  today + window   ──► ExpiringSoon                          │
//! │    otherwise                  ──► Valid                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `lowStockCount` counts every product below its threshold, out-of-stock
//! ones included. `outOfStockCount` is reported separately.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Product;
use crate::{DEFAULT_LOW_STOCK_THRESHOLD, EXPIRY_WARNING_DAYS};

// =============================================================================
// Policy
// =============================================================================

/// Thresholds used by the classifications below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryPolicy {
    /// Used when a product has no `lowStockThreshold` of its own.
    pub default_low_stock_threshold: i64,
    /// How many days ahead an expiry counts as "soon".
    pub expiry_warning_days: i64,
}

impl Default for InventoryPolicy {
    fn default() -> Self {
        InventoryPolicy {
            default_low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            expiry_warning_days: EXPIRY_WARNING_DAYS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    pub fn of(product: &Product, policy: &InventoryPolicy) -> Self {
        let threshold = product.threshold_or(policy.default_low_stock_threshold);
        if product.quantity_in_stock <= 0 {
            StockStatus::OutOfStock
        } else if product.quantity_in_stock < threshold {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }

    /// Below threshold, including out of stock.
    pub fn is_low(&self) -> bool {
        !matches!(self, StockStatus::InStock)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum ExpiryStatus {
    Valid,
    ExpiringSoon,
    Expired,
}

impl ExpiryStatus {
    pub fn of(product: &Product, today: NaiveDate, policy: &InventoryPolicy) -> Self {
        let warn_until = today + Duration::days(policy.expiry_warning_days);
        if product.expiry_date < today {
            ExpiryStatus::Expired
        } else if product.expiry_date < warn_until {
            ExpiryStatus::ExpiringSoon
        } else {
            ExpiryStatus::Valid
        }
    }
}

// =============================================================================
// Summary
// =============================================================================

/// Dashboard inventory tiles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub total_products: usize,
    pub low_stock_count: usize,
    pub out_of_stock_count: usize,
    pub expired_count: usize,
    pub expiring_soon_count: usize,
    /// Σ purchase price × quantity on hand.
    pub stock_value_cents: i64,
    /// Σ selling price × quantity on hand.
    pub retail_value_cents: i64,
}

impl InventorySummary {
    pub fn from_products(products: &[Product], today: NaiveDate, policy: &InventoryPolicy) -> Self {
        let mut summary = InventorySummary {
            total_products: products.len(),
            ..Default::default()
        };
        let mut stock_value = Money::zero();
        let mut retail_value = Money::zero();

        for product in products {
            match StockStatus::of(product, policy) {
                StockStatus::OutOfStock => {
                    summary.out_of_stock_count += 1;
                    summary.low_stock_count += 1;
                }
                StockStatus::LowStock => summary.low_stock_count += 1,
                StockStatus::InStock => {}
            }
            match ExpiryStatus::of(product, today, policy) {
                ExpiryStatus::Expired => summary.expired_count += 1,
                ExpiryStatus::ExpiringSoon => summary.expiring_soon_count += 1,
                ExpiryStatus::Valid => {}
            }

            // Negative stock would only come from a hand-edited file.
            let on_hand = product.quantity_in_stock.max(0);
            stock_value += product.purchase_price().multiply_quantity(on_hand);
            retail_value += product.selling_price().multiply_quantity(on_hand);
        }

        summary.stock_value_cents = stock_value.cents();
        summary.retail_value_cents = retail_value.cents();
        summary
    }
}

// =============================================================================
// Search & Filters
// =============================================================================

/// Product list filters offered by the inventory page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum ProductFilter {
    LowStock,
    Expired,
    ExpiringSoon,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product, today: NaiveDate, policy: &InventoryPolicy) -> bool {
        match self {
            ProductFilter::LowStock => StockStatus::of(product, policy).is_low(),
            ProductFilter::Expired => {
                ExpiryStatus::of(product, today, policy) == ExpiryStatus::Expired
            }
            ProductFilter::ExpiringSoon => {
                ExpiryStatus::of(product, today, policy) == ExpiryStatus::ExpiringSoon
            }
        }
    }
}

impl FromStr for ProductFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lowStock" => Ok(ProductFilter::LowStock),
            "expired" => Ok(ProductFilter::Expired),
            "expiringSoon" => Ok(ProductFilter::ExpiringSoon),
            _ => Err(ValidationError::NotAllowed {
                field: "filter".to_string(),
                allowed: vec![
                    "lowStock".to_string(),
                    "expired".to_string(),
                    "expiringSoon".to_string(),
                ],
            }),
        }
    }
}

/// Case-insensitive substring match on name, barcode and category.
///
/// `needle` must already be lowercase.
pub fn matches_query(product: &Product, needle: &str) -> bool {
    product.name.to_lowercase().contains(needle)
        || product.barcode.to_lowercase().contains(needle)
        || product
            .category
            .as_deref()
            .map(|c| c.to_lowercase().contains(needle))
            .unwrap_or(false)
}

/// Applies an optional search and an optional filter, keeping file order.
pub fn filter_products(
    products: Vec<Product>,
    query: Option<&str>,
    filter: Option<ProductFilter>,
    today: NaiveDate,
    policy: &InventoryPolicy,
) -> Vec<Product> {
    let needle = query.map(str::to_lowercase);
    products
        .into_iter()
        .filter(|p| needle.as_deref().map(|n| matches_query(p, n)).unwrap_or(true))
        .filter(|p| filter.map(|f| f.matches(p, today, policy)).unwrap_or(true))
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(name: &str, qty: i64, threshold: Option<i64>, expiry: NaiveDate) -> Product {
        let now = Utc::now();
        Product {
            id: format!("id-{}", name),
            name: name.to_string(),
            barcode: format!("BC-{}", name),
            description: None,
            category: Some("Antibiotics".to_string()),
            supplier_id: None,
            purchase_price_cents: 100,
            selling_price_cents: 150,
            unit: "box".to_string(),
            quantity_in_stock: qty,
            expiry_date: expiry,
            low_stock_threshold: threshold,
            created_at: now,
            updated_at: now,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    #[test]
    fn test_stock_status_uses_default_threshold() {
        let policy = InventoryPolicy::default();
        let far = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();

        assert_eq!(StockStatus::of(&product("a", 9, None, far), &policy), StockStatus::LowStock);
        assert_eq!(StockStatus::of(&product("b", 10, None, far), &policy), StockStatus::InStock);
        assert_eq!(StockStatus::of(&product("c", 3, Some(2), far), &policy), StockStatus::InStock);
        assert_eq!(StockStatus::of(&product("d", 0, None, far), &policy), StockStatus::OutOfStock);
    }

    #[test]
    fn test_expiry_status_boundaries() {
        let policy = InventoryPolicy::default();
        let t = today();

        let yesterday = product("a", 5, None, t - Duration::days(1));
        let today_p = product("b", 5, None, t);
        let edge = product("c", 5, None, t + Duration::days(30));

        assert_eq!(ExpiryStatus::of(&yesterday, t, &policy), ExpiryStatus::Expired);
        assert_eq!(ExpiryStatus::of(&today_p, t, &policy), ExpiryStatus::ExpiringSoon);
        assert_eq!(ExpiryStatus::of(&edge, t, &policy), ExpiryStatus::Valid);
    }

    #[test]
    fn test_summary_counts_and_values() {
        let t = today();
        let far = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        let products = vec![
            product("a", 20, None, far),
            product("b", 5, None, t - Duration::days(3)),
            product("c", 0, None, t + Duration::days(7)),
        ];

        let summary = InventorySummary::from_products(&products, t, &InventoryPolicy::default());

        assert_eq!(summary.total_products, 3);
        assert_eq!(summary.low_stock_count, 2);
        assert_eq!(summary.out_of_stock_count, 1);
        assert_eq!(summary.expired_count, 1);
        assert_eq!(summary.expiring_soon_count, 1);
        assert_eq!(summary.stock_value_cents, 2500);
        assert_eq!(summary.retail_value_cents, 3750);
    }

    #[test]
    fn test_empty_summary() {
        let summary = InventorySummary::from_products(&[], today(), &InventoryPolicy::default());
        assert_eq!(summary, InventorySummary::default());
    }

    #[test]
    fn test_search_and_filter() {
        let t = today();
        let far = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        let products = vec![
            product("Amoxil", 20, None, far),
            product("Augmentin", 2, None, far),
            product("Panadol", 1, None, far),
        ];
        let policy = InventoryPolicy::default();

        let found = filter_products(products.clone(), Some("AMOX"), None, t, &policy);
        assert_eq!(found.len(), 1);

        let by_category = filter_products(products.clone(), Some("antibio"), None, t, &policy);
        assert_eq!(by_category.len(), 3);

        let low = filter_products(
            products,
            Some("a"),
            Some(ProductFilter::LowStock),
            t,
            &policy,
        );
        let names: Vec<_> = low.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Augmentin", "Panadol"]);
    }

    #[test]
    fn test_filter_parsing() {
        assert_eq!("expiringSoon".parse::<ProductFilter>().unwrap(), ProductFilter::ExpiringSoon);
        assert!("soon".parse::<ProductFilter>().is_err());
    }
}
