//! # Validation Module
//!
//! Input validation for the inventory engine.
//!
//! ## Validation Strategy
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                       │
//! │                                                              │
//! │  Layer 1: InventoryService (THIS MODULE)                     │
//! │  ├── field presence, ranges, name length                     │
//! │  └── catalog reference resolution (ReferenceNotFound)        │
//! │           │                                                  │
//! │           ▼                                                  │
//! │  Layer 2: Database (SQLite)                                  │
//! │  ├── NOT NULL constraints                                    │
//! │  ├── UNIQUE (kind, name) on catalog entries                  │
//! │  └── CHECK (stock >= 0), CHECK (quantity > 0)                │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::NewItem;
use crate::MAX_NAME_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display name (item or catalog entry).
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most [`MAX_NAME_LEN`] characters
///
/// ## Returns
/// The trimmed name.
pub fn validate_name(field: &'static str, name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required { field });
    }

    if name.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a sell/restock quantity: must be strictly positive.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive { field: "quantity" });
    }

    Ok(())
}

/// Validates a price in cents: must be non-negative (zero allowed).
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustBeNonNegative { field: "price" });
    }

    Ok(())
}

/// Validates an initial stock level: must be non-negative.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::MustBeNonNegative { field: "stock" });
    }

    Ok(())
}

/// Validates pagination parameters.
///
/// ## Rules
/// - `page` is 1-based
/// - `page_size` between 1 and the given maximum
pub fn validate_page(page: u32, page_size: u32, max_page_size: u32) -> ValidationResult<()> {
    if page == 0 {
        return Err(ValidationError::MustBePositive { field: "page" });
    }

    if page_size == 0 || page_size > max_page_size {
        return Err(ValidationError::OutOfRange {
            field: "page_size",
            min: 1,
            max: i64::from(max_page_size),
        });
    }

    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates an item draft before reference resolution.
///
/// Returns the draft with trimmed names so the engine persists canonical
/// values. Reference existence is checked separately against the catalog.
pub fn validate_new_item(draft: &NewItem) -> ValidationResult<NewItem> {
    let name = validate_name("name", &draft.name)?;
    validate_stock(draft.stock)?;
    validate_price_cents(draft.price_cents)?;
    let category = validate_name("category", &draft.category)?;
    let brand = validate_name("brand", &draft.brand)?;
    let seller = validate_name("seller", &draft.seller)?;

    Ok(NewItem {
        name,
        stock: draft.stock,
        price_cents: draft.price_cents,
        category,
        brand,
        seller,
        description: draft
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> NewItem {
        NewItem {
            name: "  Widget  ".to_string(),
            stock: 10,
            price_cents: 500,
            category: "Tools".to_string(),
            brand: "Acme".to_string(),
            seller: "Main St".to_string(),
            description: Some("   ".to_string()),
        }
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("name", " Widget ").unwrap(), "Widget");
        assert!(validate_name("name", "").is_err());
        assert!(validate_name("name", "   ").is_err());
        assert!(validate_name("name", &"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok()); // free item
        assert!(validate_price_cents(1099).is_ok());
        assert!(validate_price_cents(-100).is_err());
    }

    #[test]
    fn test_validate_page() {
        assert!(validate_page(1, 10, 100).is_ok());
        assert!(validate_page(0, 10, 100).is_err());
        assert!(validate_page(1, 0, 100).is_err());
        assert!(validate_page(1, 101, 100).is_err());
    }

    #[test]
    fn test_validate_new_item_trims_and_drops_blank_description() {
        let validated = validate_new_item(&draft()).unwrap();
        assert_eq!(validated.name, "Widget");
        assert_eq!(validated.description, None);
    }

    #[test]
    fn test_validate_new_item_rejects_negative_stock() {
        let mut d = draft();
        d.stock = -1;
        assert!(matches!(
            validate_new_item(&d),
            Err(ValidationError::MustBeNonNegative { field: "stock" })
        ));
    }
}
