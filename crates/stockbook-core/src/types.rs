//! # Domain Types
//!
//! Core domain types used throughout Stockbook.
//!
//! ## Type Hierarchy
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                             │
//! │                                                                  │
//! │  ┌───────────────┐  ┌────────────────┐  ┌──────────────────┐     │
//! │  │     Item      │  │      Sale      │  │  StockMovement   │     │
//! │  │ ───────────── │  │ ────────────── │  │ ──────────────── │     │
//! │  │ id (UUID)     │  │ id (UUID)      │  │ id (UUID)        │     │
//! │  │ name          │  │ item_id (weak) │  │ item_id (weak)   │     │
//! │  │ stock (>= 0)  │  │ item_name snap │  │ quantity (> 0)   │     │
//! │  │ price_cents   │  │ total_cents    │  │ created_at       │     │
//! │  └───────────────┘  └────────────────┘  └──────────────────┘     │
//! │                                                                  │
//! │  ┌───────────────┐  ┌────────────────┐                           │
//! │  │ CatalogEntry  │  │  CatalogKind   │                           │
//! │  │ ───────────── │  │ ────────────── │                           │
//! │  │ id (UUID)     │  │  Category      │                           │
//! │  │ kind + name   │  │  Brand         │                           │
//! │  │ (unique pair) │  │  Seller        │                           │
//! │  └───────────────┘  └────────────────┘                           │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sales and stock movements are append-only audit records. They keep the
//! item id as a *weak* reference: deleting an item leaves history intact,
//! and history reads resolve display names best-effort.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::Money;

// =============================================================================
// Catalog Kind
// =============================================================================

/// The three reference registries an item points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    Category,
    Brand,
    Seller,
}

impl CatalogKind {
    /// Stable lowercase name, matches the database representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            CatalogKind::Category => "category",
            CatalogKind::Brand => "brand",
            CatalogKind::Seller => "seller",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Catalog Entry
// =============================================================================

/// A named reference record (category, brand, or seller).
///
/// `(kind, name)` is unique; items reference entries by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CatalogEntry {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Which registry this entry belongs to.
    pub kind: CatalogKind,

    /// Unique display name within the registry.
    pub name: String,

    /// When the entry was created.
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Item
// =============================================================================

/// An inventory item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Item {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name, non-empty.
    pub name: String,

    /// Current stock level. Never negative; only mutated through the
    /// atomic sell/restock updates.
    pub stock: i64,

    /// Unit price in cents (smallest currency unit), non-negative.
    pub price_cents: i64,

    /// Catalog references, resolved by name at write time.
    pub category_id: String,
    pub brand_id: String,
    pub seller_id: String,

    /// Optional free-form description.
    pub description: Option<String>,

    /// When the item was created.
    pub created_at: DateTime<Utc>,

    /// When the item was last updated (edits, sales, restocks).
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Returns the unit price as a Money value.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Stock Movement
// =============================================================================

/// An append-only record of a stock increase (restock).
///
/// Created exactly once per restock, in the same transaction as the stock
/// increment; never mutated or deleted afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockMovement {
    pub id: String,

    /// Weak reference to the restocked item.
    pub item_id: String,

    /// Quantity added, always positive.
    pub quantity: i64,

    pub created_at: DateTime<Utc>,
}

/// A stock movement annotated with the item's display name at read time.
///
/// `item_name` is `None` when the item has since been deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockMovementView {
    pub id: String,
    pub item_id: String,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
    pub item_name: Option<String>,
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale transaction.
///
/// Uses the snapshot pattern: `item_name` and `unit_price_cents` are frozen
/// at sale time, independent of later item edits or deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: String,

    /// Weak reference to the sold item.
    pub item_id: String,

    /// Item name at time of sale (frozen).
    pub item_name: String,

    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,

    /// Quantity sold, always positive.
    pub quantity: i64,

    /// Line total: exactly `unit_price_cents * quantity`.
    pub total_cents: i64,

    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the frozen unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// A sale enriched with the item's category and brand names at read time.
///
/// Enrichment is best-effort: a deleted item (or dangling catalog reference)
/// yields `None`, never an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleView {
    pub id: String,
    pub item_id: String,
    pub item_name: String,
    pub unit_price_cents: i64,
    pub quantity: i64,
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
    pub category_name: Option<String>,
    pub brand_name: Option<String>,
}

/// The result of a successful sell operation: the updated item alongside
/// the newly recorded sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleReceipt {
    pub item: Item,
    pub sale: Sale,
}

// =============================================================================
// Inputs: drafts and filters
// =============================================================================

/// Input for creating or fully replacing an item.
///
/// `category`/`brand`/`seller` are catalog *names*; the engine resolves them
/// to entry ids and fails with `ReferenceNotFound` when any is missing.
/// Update re-validates the full set, so referential integrity is re-checked
/// on every edit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub stock: i64,
    pub price_cents: i64,
    pub category: String,
    pub brand: String,
    pub seller: String,
    pub description: Option<String>,
}

/// Filter for item listings. All fields optional; empty filter lists all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemFilter {
    /// Catalog entry id of the category.
    pub category_id: Option<String>,
    /// Catalog entry id of the brand.
    pub brand_id: Option<String>,
    /// Inclusive lower price bound, in cents.
    pub min_price_cents: Option<i64>,
    /// Inclusive upper price bound, in cents.
    pub max_price_cents: Option<i64>,
    /// Case-insensitive substring match on the item name.
    pub name_contains: Option<String>,
}

/// One page of an item listing plus the unpaginated match count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemPage {
    pub items: Vec<Item>,
    pub total_count: i64,
}

impl ItemPage {
    /// Number of pages at the given page size (matches the original API's
    /// `totalPages = ceil(totalItems / limit)`).
    pub fn total_pages(&self, page_size: u32) -> i64 {
        if page_size == 0 {
            return 0;
        }
        (self.total_count + i64::from(page_size) - 1) / i64::from(page_size)
    }
}

/// Filter for sale listings. All fields optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaleFilter {
    /// Case-insensitive substring match on the snapshotted item name.
    pub name_contains: Option<String>,
    /// Restrict to sales on this UTC calendar day.
    pub on_date: Option<NaiveDate>,
}

// =============================================================================
// Aggregates
// =============================================================================

/// Summary statistics over the whole system.
///
/// Each total defaults to 0 when no records exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryTotals {
    /// Sum of `Item.stock` over all items.
    pub total_stock: i64,
    /// Sum of `Sale.quantity` over all sales.
    pub total_items_sold: i64,
    /// Sum of `Sale.total_cents` over all sales.
    pub total_revenue_cents: i64,
}

impl InventoryTotals {
    /// Returns the total revenue as Money.
    #[inline]
    pub fn total_revenue(&self) -> Money {
        Money::from_cents(self.total_revenue_cents)
    }
}

/// One calendar-day bucket of the daily sales series.
///
/// The day boundary is UTC; days with no sales produce no bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct DailySalesBucket {
    /// UTC calendar day.
    pub date: NaiveDate,
    /// Revenue summed over the day, in cents.
    pub revenue_cents: i64,
    /// Units sold over the day.
    pub quantity: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_kind_as_str() {
        assert_eq!(CatalogKind::Category.as_str(), "category");
        assert_eq!(CatalogKind::Brand.as_str(), "brand");
        assert_eq!(CatalogKind::Seller.as_str(), "seller");
        assert_eq!(CatalogKind::Seller.to_string(), "seller");
    }

    #[test]
    fn test_sale_money_accessors() {
        let sale = Sale {
            id: "s1".to_string(),
            item_id: "i1".to_string(),
            item_name: "Widget".to_string(),
            unit_price_cents: 500,
            quantity: 3,
            total_cents: 1500,
            created_at: Utc::now(),
        };
        assert_eq!(sale.unit_price(), Money::from_cents(500));
        assert_eq!(sale.total(), sale.unit_price().multiply_quantity(3));
    }

    #[test]
    fn test_totals_default_to_zero() {
        let totals = InventoryTotals::default();
        assert_eq!(totals.total_stock, 0);
        assert_eq!(totals.total_items_sold, 0);
        assert_eq!(totals.total_revenue(), Money::zero());
    }

    #[test]
    fn test_catalog_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&CatalogKind::Brand).unwrap(),
            "\"brand\""
        );
        let kind: CatalogKind = serde_json::from_str("\"seller\"").unwrap();
        assert_eq!(kind, CatalogKind::Seller);
    }

    #[test]
    fn test_item_page_total_pages() {
        let page = ItemPage {
            items: vec![],
            total_count: 21,
        };
        assert_eq!(page.total_pages(10), 3);
        assert_eq!(page.total_pages(21), 1);
        assert_eq!(page.total_pages(0), 0);
    }
}
