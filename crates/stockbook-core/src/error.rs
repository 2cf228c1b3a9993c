//! # Error Types
//!
//! Domain-specific error types for stockbook-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  stockbook-core errors (this file)                           │
//! │  ├── CoreError        - Engine operation failures            │
//! │  └── ValidationError  - Input validation failures            │
//! │                                                              │
//! │  stockbook-db errors (separate crate)                        │
//! │  └── DbError          - Database operation failures          │
//! │                                                              │
//! │  Flow: ValidationError → CoreError ← DbError (mapped at the  │
//! │  InventoryService boundary)                                  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (item name, id, quantities)
//! 3. Errors are enum variants, never bare strings

use thiserror::Error;

use crate::types::CatalogKind;

// =============================================================================
// Core Error
// =============================================================================

/// Engine operation errors returned at the `InventoryService` boundary.
///
/// Every failure is a structured value with a human-readable message;
/// operations never report partial success.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A referenced entity id does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A named category/brand/seller could not be resolved.
    #[error("{kind} not found: {name}")]
    ReferenceNotFound { kind: CatalogKind, name: String },

    /// Sell quantity exceeds the available stock.
    ///
    /// The check and the decrement are a single atomic update, so `available`
    /// is the stock the sale was actually refused against.
    #[error("insufficient stock for {item}: available {available}, requested {requested}")]
    InsufficientStock {
        item: String,
        available: i64,
        requested: i64,
    },

    /// Concurrent-update contention on the stock field survived the bounded
    /// internal retries. Transient; the caller may retry the whole operation.
    #[error("stock update contention persisted after {attempts} attempts")]
    Conflict { attempts: u32 },

    /// Malformed or out-of-range input (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Unexpected persistence-layer failure. The current operation was
    /// aborted without partial effects.
    #[error("storage error: {0}")]
    Storage(String),
}

impl CoreError {
    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Creates a ReferenceNotFound error for a catalog lookup.
    pub fn reference_not_found(kind: CatalogKind, name: impl Into<String>) -> Self {
        CoreError::ReferenceNotFound {
            kind,
            name: name.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when caller input doesn't meet requirements, before any
/// business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: &'static str },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: &'static str },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: &'static str },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
    },

    /// Duplicate value (e.g. duplicate catalog entry name).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: &'static str, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_message() {
        let err = CoreError::InsufficientStock {
            item: "Widget".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "insufficient stock for Widget: available 3, requested 5"
        );
    }

    #[test]
    fn test_reference_not_found_message() {
        let err = CoreError::reference_not_found(CatalogKind::Brand, "Acme");
        assert_eq!(err.to_string(), "brand not found: Acme");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required { field: "name" };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.to_string(), "validation error: name is required");
    }
}
