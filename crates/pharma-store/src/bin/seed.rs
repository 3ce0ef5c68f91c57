//! # Seed Data Generator
//!
//! Fills an empty data directory with a small sample pharmacy.
//!
//! ## Usage
//! ```bash
//! # Seed ./data (default)
//! cargo run -p pharma-store --bin seed
//!
//! # Seed another directory
//! cargo run -p pharma-store --bin seed -- --data-dir /tmp/pharma
//! ```
//!
//! ## Generated Data
//! - 3 suppliers
//! - Products across analgesics, antibiotics, allergy, respiratory and
//!   vitamins, with a mix of healthy, low, empty, expiring and expired stock
//! - Quick-invoice sales spread over the last three weeks, each with its
//!   revenue ledger entry
//! - One rent expense

use anyhow::Context;
use chrono::{Duration, Utc};
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pharma_core::{
    Money, PaymentMethod, Product, ProductDraft, Sale, SaleItem, Supplier, SupplierDraft,
    Transaction, TransactionDraft, TransactionType,
};
use pharma_store::{Store, StoreConfig};

/// (name, contact, email)
const SUPPLIERS: &[(&str, &str, &str)] = &[
    ("MedSupply Co", "Imran Qureshi", "orders@medsupply.example"),
    ("HealthWholesale", "Ayesha Khan", "sales@healthwholesale.example"),
    ("CareDistributors", "Bilal Ahmed", "hello@caredist.example"),
];

/// (name, category, unit, purchase cents, selling cents, stock, days to expiry, threshold)
const PRODUCTS: &[(&str, &str, &str, i64, i64, i64, i64, Option<i64>)] = &[
    ("Panadol 500mg", "Analgesics", "strip", 80, 120, 150, 400, None),
    ("Panadol Extra", "Analgesics", "strip", 110, 160, 6, 300, None),
    ("Brufen 400mg", "Analgesics", "strip", 140, 210, 45, 20, None),
    ("Disprin", "Analgesics", "strip", 40, 60, 0, 500, None),
    ("Amoxil 500mg", "Antibiotics", "box", 420, 650, 18, 250, Some(20)),
    ("Augmentin 625mg", "Antibiotics", "box", 900, 1350, 9, 180, None),
    ("Flagyl 400mg", "Antibiotics", "box", 260, 390, 30, -12, None),
    ("Zyrtec 10mg", "Allergy", "box", 300, 460, 25, 365, None),
    ("Softin 10mg", "Allergy", "box", 280, 420, 4, 14, Some(5)),
    ("Ventolin Inhaler", "Respiratory", "piece", 450, 690, 12, 540, Some(5)),
    ("Benylin Syrup", "Respiratory", "bottle", 210, 320, 20, 60, None),
    ("Surbex-Z", "Vitamins", "bottle", 520, 780, 40, 700, None),
    ("CaC-1000 Plus", "Vitamins", "tube", 350, 520, 3, 90, None),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().collect();
    let mut data_dir = String::from("./data");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-d" | "--data-dir" => {
                if i + 1 < args.len() {
                    data_dir = args[i + 1].clone();
                    i += 1;
                }
            }
            "-h" | "--help" => {
                println!("PharmaEase Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --data-dir <PATH>  Data directory (default: ./data)");
                println!("  -h, --help             Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 PharmaEase Seed Data Generator");
    println!("=================================");
    println!("Data directory: {}", data_dir);
    println!();

    let store = Store::open(StoreConfig::new(&data_dir))
        .await
        .with_context(|| format!("opening data directory {}", data_dir))?;

    let existing = store.products().all().await?.len();
    if existing > 0 {
        println!("⚠ Data directory already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the JSON files to regenerate.");
        return Ok(());
    }

    let now = Utc::now();
    let today = now.date_naive();

    // Suppliers
    let mut supplier_ids = Vec::new();
    for (name, contact, email) in SUPPLIERS {
        let draft = SupplierDraft {
            name: name.to_string(),
            contact_person: Some(contact.to_string()),
            email: Some(email.to_string()),
            ..Default::default()
        };
        let supplier = store.suppliers().insert(Supplier::from_draft(draft, now)).await?;
        supplier_ids.push(supplier.id);
    }
    println!("✓ {} suppliers", supplier_ids.len());

    // Products
    let mut products = Vec::new();
    for (idx, (name, category, unit, purchase, selling, stock, expiry_days, threshold)) in
        PRODUCTS.iter().enumerate()
    {
        let draft = ProductDraft {
            name: name.to_string(),
            barcode: format!("629{:010}", 1_000 + idx * 37),
            description: None,
            category: Some(category.to_string()),
            supplier_id: Some(supplier_ids[idx % supplier_ids.len()].clone()),
            purchase_price_cents: *purchase,
            selling_price_cents: *selling,
            unit: unit.to_string(),
            quantity_in_stock: *stock,
            expiry_date: String::new(),
            low_stock_threshold: *threshold,
        };
        let expiry = today + Duration::days(*expiry_days);
        let product = store
            .products()
            .insert(Product::from_draft(draft, expiry, now))
            .await?;
        products.push(product);
    }
    println!("✓ {} products", products.len());

    // Sales: a couple per day over the last 21 days, only on in-stock items
    let sellable: Vec<&Product> = products.iter().filter(|p| p.quantity_in_stock > 5).collect();
    let mut sale_count = 0;
    for day in (1..=21).rev() {
        for slot in 0..2 {
            let seed = day * 7 + slot * 3;
            let first = sellable[seed as usize % sellable.len()];
            let second = sellable[(seed as usize + 3) % sellable.len()];

            let mut items = vec![SaleItem {
                product_id: first.id.clone(),
                quantity_sold: 1 + seed % 3,
                selling_price_at_sale_cents: first.selling_price_cents,
            }];
            if second.id != first.id && slot == 1 {
                items.push(SaleItem {
                    product_id: second.id.clone(),
                    quantity_sold: 1,
                    selling_price_at_sale_cents: second.selling_price_cents,
                });
            }

            let at = now - Duration::days(day) + Duration::hours(slot * 4);
            let total: Money = items.iter().map(SaleItem::line_total).sum();
            let method = if slot == 0 { PaymentMethod::Cash } else { PaymentMethod::Card };
            let sale = store.sales().record_sale(Sale::quick(items, total, method, at)).await?;

            let description = format!(
                "Sale from Quick Invoice - {}",
                sale.invoice_number.as_deref().unwrap_or_default()
            );
            store
                .transactions()
                .insert(Transaction::revenue_for_sale(&sale, description, at))
                .await?;
            sale_count += 1;
        }
    }
    println!("✓ {} sales with revenue entries", sale_count);

    store
        .transactions()
        .insert(Transaction::from_draft(
            TransactionDraft {
                kind: TransactionType::Expense,
                date: Some(now - Duration::days(15)),
                amount_cents: 45_000,
                description: "Monthly shop rent".to_string(),
                related_sale_id: None,
            },
            now,
        ))
        .await?;
    println!("✓ 1 expense");

    info!(data_dir = %data_dir, "Seed complete");
    println!();
    println!("✓ Seed complete!");

    Ok(())
}
