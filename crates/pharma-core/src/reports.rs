//! # Reports
//!
//! Read-only aggregates over sales and the ledger.
//!
//! - [`FinancialSummary`] - revenue, expenses, profit, sale count
//! - [`daily_sales`] - totals per UTC calendar day, oldest first
//! - [`top_products`] - best sellers by units

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Product, Sale, Transaction, TransactionType};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub total_revenue_cents: i64,
    pub total_expenses_cents: i64,
    pub net_profit_cents: i64,
    pub sale_count: usize,
    pub average_sale_cents: i64,
}

impl FinancialSummary {
    /// Revenue and expenses come from the ledger; sale figures from sales.
    pub fn compute(transactions: &[Transaction], sales: &[Sale]) -> Self {
        let mut revenue = Money::zero();
        let mut expenses = Money::zero();
        for tx in transactions {
            match tx.kind {
                TransactionType::Revenue => revenue += tx.amount(),
                TransactionType::Expense => expenses += tx.amount(),
            }
        }

        let sales_total: Money = sales.iter().map(Sale::total).sum();

        FinancialSummary {
            total_revenue_cents: revenue.cents(),
            total_expenses_cents: expenses.cents(),
            net_profit_cents: (revenue - expenses).cents(),
            sale_count: sales.len(),
            average_sale_cents: sales_total.average_over(sales.len()).cents(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DailySales {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub total_cents: i64,
    pub sale_count: usize,
}

pub fn daily_sales(sales: &[Sale]) -> Vec<DailySales> {
    let mut days: BTreeMap<NaiveDate, (Money, usize)> = BTreeMap::new();
    for sale in sales {
        let entry = days.entry(sale.sale_date.date_naive()).or_default();
        entry.0 += sale.total();
        entry.1 += 1;
    }

    days.into_iter()
        .map(|(date, (total, count))| DailySales {
            date,
            total_cents: total.cents(),
            sale_count: count,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub product_id: String,
    /// `None` when the product has since been deleted.
    pub name: Option<String>,
    pub quantity_sold: i64,
    pub revenue_cents: i64,
}

/// Best sellers by units sold, then revenue, then id.
pub fn top_products(sales: &[Sale], products: &[Product], limit: usize) -> Vec<TopProduct> {
    let mut totals: HashMap<&str, (i64, Money)> = HashMap::new();
    for item in sales.iter().flat_map(|s| s.items.iter()) {
        let entry = totals.entry(item.product_id.as_str()).or_default();
        entry.0 = entry.0.saturating_add(item.quantity_sold);
        entry.1 += item.line_total();
    }

    let names: HashMap<&str, &str> = products
        .iter()
        .map(|p| (p.id.as_str(), p.name.as_str()))
        .collect();

    let mut ranked: Vec<TopProduct> = totals
        .into_iter()
        .map(|(id, (qty, revenue))| TopProduct {
            product_id: id.to_string(),
            name: names.get(id).map(|n| n.to_string()),
            quantity_sold: qty,
            revenue_cents: revenue.cents(),
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.quantity_sold
            .cmp(&a.quantity_sold)
            .then(b.revenue_cents.cmp(&a.revenue_cents))
            .then(a.product_id.cmp(&b.product_id))
    });
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PaymentMethod, SaleItem};
    use chrono::{TimeZone, Utc};

    fn item(id: &str, qty: i64, price: i64) -> SaleItem {
        SaleItem {
            product_id: id.to_string(),
            quantity_sold: qty,
            selling_price_at_sale_cents: price,
        }
    }

    fn sale_on(day: u32, hour: u32, items: Vec<SaleItem>) -> Sale {
        let at = Utc.with_ymd_and_hms(2026, 10, day, hour, 0, 0).unwrap();
        let total: Money = items.iter().map(SaleItem::line_total).sum();
        Sale::quick(items, total, PaymentMethod::Cash, at)
    }

    #[test]
    fn test_financial_summary() {
        let s1 = sale_on(1, 9, vec![item("a", 2, 500)]);
        let s2 = sale_on(2, 9, vec![item("b", 1, 250)]);
        let now = Utc::now();
        let mut rent = Transaction::revenue_for_sale(&s1, "x".to_string(), now);
        rent.kind = TransactionType::Expense;
        rent.amount_cents = 300;
        let txs = vec![
            Transaction::revenue_for_sale(&s1, "Sale 1".to_string(), now),
            Transaction::revenue_for_sale(&s2, "Sale 2".to_string(), now),
            rent,
        ];

        let summary = FinancialSummary::compute(&txs, &[s1, s2]);
        assert_eq!(summary.total_revenue_cents, 1250);
        assert_eq!(summary.total_expenses_cents, 300);
        assert_eq!(summary.net_profit_cents, 950);
        assert_eq!(summary.sale_count, 2);
        assert_eq!(summary.average_sale_cents, 625);
    }

    #[test]
    fn test_empty_summary() {
        assert_eq!(FinancialSummary::compute(&[], &[]), FinancialSummary::default());
    }

    #[test]
    fn test_daily_sales_buckets() {
        let sales = vec![
            sale_on(3, 18, vec![item("a", 1, 100)]),
            sale_on(1, 9, vec![item("a", 1, 200)]),
            sale_on(3, 8, vec![item("a", 1, 300)]),
        ];

        let days = daily_sales(&sales);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2026, 10, 1).unwrap());
        assert_eq!(days[1].total_cents, 400);
        assert_eq!(days[1].sale_count, 2);
    }

    #[test]
    fn test_top_products() {
        let sales = vec![
            sale_on(1, 9, vec![item("a", 2, 100), item("b", 5, 100)]),
            sale_on(2, 9, vec![item("a", 3, 200), item("c", 1, 50)]),
        ];
        let now = Utc::now();
        let products = vec![Product {
            id: "a".to_string(),
            name: "Amoxil".to_string(),
            barcode: "1".to_string(),
            description: None,
            category: None,
            supplier_id: None,
            purchase_price_cents: 50,
            selling_price_cents: 200,
            unit: "box".to_string(),
            quantity_in_stock: 10,
            expiry_date: NaiveDate::from_ymd_opt(2028, 1, 1).unwrap(),
            low_stock_threshold: None,
            created_at: now,
            updated_at: now,
        }];

        let top = top_products(&sales, &products, 2);
        assert_eq!(top.len(), 2);
        // a and b both sold 5; a earned more.
        assert_eq!(top[0].product_id, "a");
        assert_eq!(top[0].name.as_deref(), Some("Amoxil"));
        assert_eq!(top[0].revenue_cents, 800);
        assert_eq!(top[1].product_id, "b");
        assert_eq!(top[1].name, None);
    }

    #[test]
    fn test_extreme_stored_values_saturate() {
        let sales = vec![
            sale_on(1, 9, vec![item("a", i64::MAX, i64::MAX)]),
            sale_on(1, 10, vec![item("a", i64::MAX, 2)]),
        ];

        let top = top_products(&sales, &[], 5);
        assert_eq!(top[0].quantity_sold, i64::MAX);
        assert_eq!(top[0].revenue_cents, i64::MAX);

        let days = daily_sales(&sales);
        assert_eq!(days[0].total_cents, i64::MAX);

        let summary = FinancialSummary::compute(&[], &sales);
        assert_eq!(summary.sale_count, 2);
        assert_eq!(summary.average_sale_cents, i64::MAX / 2);
    }
}
