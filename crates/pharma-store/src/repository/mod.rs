//! # Repository Module
//!
//! Collection-file repositories for PharmaEase.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  HTTP handler                                                           │
//! │       │                                                                 │
//! │       │  store.products().get_by_barcode("6291041500213")               │
//! │       ▼                                                                 │
//! │  ProductRepository                                                      │
//! │  ├── all / get_by_id / get_by_barcode / search                          │
//! │  ├── insert / update / delete                                           │
//! │  └── adjust_stock                                                       │
//! │       │                                                                 │
//! │       │  JsonCollection<Product>                                        │
//! │       ▼                                                                 │
//! │  products.json                                                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Product CRUD, barcode lookup, stock
//! - [`sale::SaleRepository`] - Sales and the stock decrement they cause
//! - [`customer::CustomerRepository`] - Customer records
//! - [`supplier::SupplierRepository`] - Supplier CRUD
//! - [`transaction::TransactionRepository`] - Revenue/expense ledger

pub mod customer;
pub mod product;
pub mod sale;
pub mod supplier;
pub mod transaction;
