//! # stockbook-core: Pure Domain Logic for Stockbook
//!
//! This crate is the heart of the Stockbook inventory engine. It contains
//! domain types and business rules as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                  External routing layer (HTTP, ...)            │
//! │                               │                                │
//! │  ┌────────────────────────────▼───────────────────────────┐    │
//! │  │            ★ stockbook-core (THIS CRATE) ★             │    │
//! │  │                                                        │    │
//! │  │   ┌─────────┐ ┌─────────┐ ┌────────────┐ ┌─────────┐   │    │
//! │  │   │  types  │ │  money  │ │ validation │ │  error  │   │    │
//! │  │   │  Item   │ │  Money  │ │   rules    │ │taxonomy │   │    │
//! │  │   │  Sale   │ │ (cents) │ │   checks   │ │         │   │    │
//! │  │   └─────────┘ └─────────┘ └────────────┘ └─────────┘   │    │
//! │  │                                                        │    │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS   │    │
//! │  └────────────────────────────┬───────────────────────────┘    │
//! │                               │                                │
//! │  ┌────────────────────────────▼───────────────────────────┐    │
//! │  │              stockbook-db (Storage + Engine)           │    │
//! │  │        SQLite queries, migrations, InventoryService    │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Item, Sale, StockMovement, CatalogEntry, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: every function is deterministic
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are cents (i64), never floats
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of item and catalog entry names.
pub const MAX_NAME_LEN: usize = 200;

/// Default page size for item listings when the caller does not specify one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Upper bound on page size, keeps a single listing request bounded.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Attempts made on a contended stock update before giving up.
pub const MAX_STOCK_UPDATE_ATTEMPTS: u32 = 3;
