//! # stockbook-db: Storage Layer + Inventory Engine
//!
//! This crate provides database access and the transactional inventory
//! engine for Stockbook. It uses SQLite for storage with sqlx for async
//! operations.
//!
//! ## Architecture Position
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                     Stockbook Data Flow                        │
//! │                                                                │
//! │  External routing layer (HTTP handlers, CLI, ...)              │
//! │       │                                                        │
//! │       ▼                                                        │
//! │  ┌──────────────────────────────────────────────────────────┐  │
//! │  │                 stockbook-db (THIS CRATE)                │  │
//! │  │                                                          │  │
//! │  │  InventoryService (service.rs)                           │  │
//! │  │    validation ──► catalog resolution ──► transactions    │  │
//! │  │       │                                                  │  │
//! │  │  ┌────▼──────────┐  ┌───────────────┐  ┌──────────────┐  │  │
//! │  │  │   Database    │  │ Repositories  │  │  Migrations  │  │  │
//! │  │  │   (pool.rs)   │◄─│ item / sale / │  │  (embedded)  │  │  │
//! │  │  │  SqlitePool   │  │ stock / stats │  │ 001_init.sql │  │  │
//! │  │  └───────────────┘  └───────────────┘  └──────────────┘  │  │
//! │  └──────────────────────────────────────────────────────────┘  │
//! │       │                                                        │
//! │       ▼                                                        │
//! │  SQLite database (WAL mode)                                    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (catalog, item, stock, sale, stats)
//! - [`service`] - InventoryService: the public operation surface
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stockbook_db::{DbConfig, InventoryService};
//!
//! let service = InventoryService::connect(DbConfig::new("stockbook.db")).await?;
//! let receipt = service.sell(&item_id, 3).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};
pub use service::InventoryService;

// Repository re-exports for callers that need raw storage access
pub use repository::catalog::CatalogRepository;
pub use repository::item::ItemRepository;
pub use repository::sale::SaleRepository;
pub use repository::stats::StatsRepository;
pub use repository::stock::StockMovementRepository;
