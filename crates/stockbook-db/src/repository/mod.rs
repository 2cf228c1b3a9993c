//! # Repository Module
//!
//! Database repository implementations for Stockbook.
//!
//! Each repository owns the SQL for one collection; transactional
//! invariants that span the item row and an audit row (sell, restock)
//! live in the repository of the audit record, so the stock mutation and
//! the history insert always commit together.
//!
//! ## Available Repositories
//!
//! - [`catalog::CatalogRepository`] - Category/brand/seller name registry
//! - [`item::ItemRepository`] - Item CRUD and filtered listing
//! - [`stock::StockMovementRepository`] - Restock transaction + history
//! - [`sale::SaleRepository`] - Atomic sell transaction, sale records
//! - [`stats::StatsRepository`] - Aggregates over items and sales

pub mod catalog;
pub mod item;
pub mod sale;
pub mod stats;
pub mod stock;
