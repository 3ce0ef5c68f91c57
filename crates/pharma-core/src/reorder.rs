//! # Smart Order
//!
//! Stock reorder suggestions built from recent sales, stock on hand and
//! expiry dates.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  products.json ─┐                                                       │
//! │                 ├──► ReorderInput::from_records ──► prefill form        │
//! │  sales.json ────┘           │                                           │
//! │                             ▼                                           │
//! │                  { salesData, stockLevels, expirationDates }            │
//! │                             │                                           │
//! │                             ▼                                           │
//! │                  ReorderAdvisor::suggest                                │
//! │                             │                                           │
//! │                             ▼                                           │
//! │                  validate_suggestion ──► { suggestedOrder, reasoning }  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Heuristic
//! For each product in `stockLevels`:
//!
//! ```text
//! sold     = units sold in (today - lookback, today]
//! demand   = ceil(sold × cover / lookback)
//! usable   = 0                                  if expired
//!          = min(stock, ceil(sold × daysLeft / lookback))
//!                                               if it expires inside cover
//!          = stock                              otherwise
//! order    = demand - usable                    (only when > 0)
//! ```

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{Product, Sale};
use crate::MAX_QUANTITY;

// =============================================================================
// Advisor Input
// =============================================================================

/// One sold line, flattened out of a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SalesRecord {
    pub product_id: String,
    pub quantity_sold: i64,
    #[ts(as = "String")]
    pub date_of_sale: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockLevel {
    pub product_id: String,
    pub name: String,
    pub quantity_in_stock: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ExpirationRecord {
    pub product_id: String,
    pub name: String,
    #[ts(as = "String")]
    pub expiry_date: NaiveDate,
}

/// Everything an advisor looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReorderInput {
    pub sales_data: Vec<SalesRecord>,
    pub stock_levels: Vec<StockLevel>,
    pub expiration_dates: Vec<ExpirationRecord>,
}

impl ReorderInput {
    /// Derives the advisor input from stored products and sales.
    ///
    /// Sale dates are bucketed by their UTC calendar day.
    pub fn from_records(products: &[Product], sales: &[Sale]) -> Self {
        let sales_data = sales
            .iter()
            .flat_map(|sale| {
                let day = sale.sale_date.date_naive();
                sale.items.iter().map(move |item| SalesRecord {
                    product_id: item.product_id.clone(),
                    quantity_sold: item.quantity_sold,
                    date_of_sale: day,
                })
            })
            .collect();

        let stock_levels = products
            .iter()
            .map(|p| StockLevel {
                product_id: p.id.clone(),
                name: p.name.clone(),
                quantity_in_stock: p.quantity_in_stock,
            })
            .collect();

        let expiration_dates = products
            .iter()
            .map(|p| ExpirationRecord {
                product_id: p.id.clone(),
                name: p.name.clone(),
                expiry_date: p.expiry_date,
            })
            .collect();

        ReorderInput {
            sales_data,
            stock_levels,
            expiration_dates,
        }
    }
}

/// The suggest form payload. Every section must be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    #[serde(default)]
    pub sales_data: Option<Vec<SalesRecord>>,
    #[serde(default)]
    pub stock_levels: Option<Vec<StockLevel>>,
    #[serde(default)]
    pub expiration_dates: Option<Vec<ExpirationRecord>>,
}

impl ReorderRequest {
    pub fn into_input(self) -> Result<ReorderInput, ValidationError> {
        let mut missing = Vec::new();
        if self.sales_data.is_none() {
            missing.push("salesData");
        }
        if self.stock_levels.is_none() {
            missing.push("stockLevels");
        }
        if self.expiration_dates.is_none() {
            missing.push("expirationDates");
        }
        if !missing.is_empty() {
            return Err(ValidationError::Rule(format!(
                "Missing data: {}",
                missing.join(", ")
            )));
        }

        let sales = self.sales_data.as_deref().unwrap_or_default();
        if sales
            .iter()
            .any(|r| !(0..=MAX_QUANTITY).contains(&r.quantity_sold))
        {
            return Err(ValidationError::OutOfRange {
                field: "Quantity sold".to_string(),
                min: 0,
                max: MAX_QUANTITY,
            });
        }

        Ok(ReorderInput {
            sales_data: self.sales_data.unwrap_or_default(),
            stock_levels: self.stock_levels.unwrap_or_default(),
            expiration_dates: self.expiration_dates.unwrap_or_default(),
        })
    }
}

// =============================================================================
// Advisor Output
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedOrder {
    /// Product id → units to order.
    pub suggested_order: BTreeMap<String, i64>,
    pub reasoning: String,
}

/// Checks a suggestion against the input it was made from.
///
/// Every key must be a product from `stockLevels` and every quantity
/// must be positive.
pub fn validate_suggestion(suggestion: &SuggestedOrder, input: &ReorderInput) -> CoreResult<()> {
    let known: HashSet<&str> = input
        .stock_levels
        .iter()
        .map(|s| s.product_id.as_str())
        .collect();

    for (product_id, quantity) in &suggestion.suggested_order {
        if !known.contains(product_id.as_str()) {
            return Err(CoreError::InvalidSuggestion {
                reason: format!("unknown product {}", product_id),
            });
        }
        if *quantity <= 0 {
            return Err(CoreError::InvalidSuggestion {
                reason: format!("quantity for {} must be positive, got {}", product_id, quantity),
            });
        }
    }

    if suggestion.reasoning.trim().is_empty() {
        return Err(CoreError::InvalidSuggestion {
            reason: "reasoning is empty".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Advisors
// =============================================================================

/// Something that turns a [`ReorderInput`] into a [`SuggestedOrder`].
pub trait ReorderAdvisor: Send + Sync {
    fn suggest(&self, input: &ReorderInput, today: NaiveDate) -> CoreResult<SuggestedOrder>;
}

/// Average-demand advisor. Deterministic for a given input and day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeuristicAdvisor {
    pub lookback_days: i64,
    pub cover_days: i64,
}

impl Default for HeuristicAdvisor {
    fn default() -> Self {
        HeuristicAdvisor {
            lookback_days: 30,
            cover_days: 30,
        }
    }
}

/// Longest lookback or cover window an advisor accepts.
pub const MAX_PLANNING_DAYS: i64 = 3_650;

// Demand math runs in i128.
fn ceil_div(numerator: i128, denominator: i128) -> i128 {
    (numerator + denominator - 1) / denominator
}

fn clamp_units(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

impl ReorderAdvisor for HeuristicAdvisor {
    fn suggest(&self, input: &ReorderInput, today: NaiveDate) -> CoreResult<SuggestedOrder> {
        for (field, days) in [
            ("Reorder lookback days", self.lookback_days),
            ("Reorder cover days", self.cover_days),
        ] {
            if !(1..=MAX_PLANNING_DAYS).contains(&days) {
                return Err(ValidationError::OutOfRange {
                    field: field.to_string(),
                    min: 1,
                    max: MAX_PLANNING_DAYS,
                }
                .into());
            }
        }
        let lookback = i128::from(self.lookback_days);
        let cover = i128::from(self.cover_days);

        let window_start = today - Duration::days(self.lookback_days);
        let mut sold: HashMap<&str, i128> = HashMap::new();
        for record in &input.sales_data {
            if record.date_of_sale > window_start && record.date_of_sale <= today {
                *sold.entry(record.product_id.as_str()).or_default() +=
                    i128::from(record.quantity_sold.max(0));
            }
        }

        // Earliest expiry wins when a product is listed twice.
        let mut expiry: HashMap<&str, NaiveDate> = HashMap::new();
        for record in &input.expiration_dates {
            expiry
                .entry(record.product_id.as_str())
                .and_modify(|d| *d = (*d).min(record.expiry_date))
                .or_insert(record.expiry_date);
        }

        let mut order = BTreeMap::new();
        let mut reasons = Vec::new();

        for level in &input.stock_levels {
            let id = level.product_id.as_str();
            let units = sold.get(id).copied().unwrap_or(0);
            let stock = i128::from(level.quantity_in_stock.max(0));

            if units == 0 {
                reasons.push(format!(
                    "{}: no sales in the last {} days, no order.",
                    level.name, self.lookback_days
                ));
                continue;
            }

            let demand = ceil_div(units * cover, lookback);
            let (usable, note) = match expiry.get(id) {
                Some(date) if *date < today => (0, format!(" (stock expired {})", date)),
                Some(date) if *date < today + Duration::days(self.cover_days) => {
                    let days_left = (*date - today).num_days();
                    let sellable = ceil_div(units * i128::from(days_left), lookback);
                    (
                        stock.min(sellable),
                        format!(" (expires {}, {} days left)", date, days_left),
                    )
                }
                _ => (stock, String::new()),
            };

            let quantity = clamp_units(demand - usable);
            if quantity > 0 {
                order.insert(level.product_id.clone(), quantity);
                reasons.push(format!(
                    "{}: sold {} in the last {} days, needs {} for {} days, {} usable on hand{}; order {}.",
                    level.name, units, self.lookback_days, demand, self.cover_days, usable, note, quantity
                ));
            } else {
                reasons.push(format!(
                    "{}: sold {} in the last {} days, {} usable on hand covers {} days{}; no order.",
                    level.name, units, self.lookback_days, usable, self.cover_days, note
                ));
            }
        }

        let reasoning = if reasons.is_empty() {
            "No products to review.".to_string()
        } else {
            reasons.join("\n")
        };

        Ok(SuggestedOrder {
            suggested_order: order,
            reasoning,
        })
    }
}

/// Runs an advisor and checks its output.
pub fn suggest_order(
    advisor: &dyn ReorderAdvisor,
    input: &ReorderInput,
    now: DateTime<Utc>,
) -> CoreResult<SuggestedOrder> {
    let suggestion = advisor.suggest(input, now.date_naive())?;
    validate_suggestion(&suggestion, input)?;
    Ok(suggestion)
}

// =============================================================================
// Unit Tests
// =============================================================================
