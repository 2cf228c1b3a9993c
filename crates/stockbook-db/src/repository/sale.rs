//! # Sale Repository
//!
//! The sale transaction and the sale record log.
//!
//! ## The Atomic Sell
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                       │
//! │    UPDATE items SET stock = stock - q                        │
//! │      WHERE id = ?item AND stock >= q   ← check + decrement   │
//! │    │                                     in ONE statement    │
//! │    ├── 0 rows → missing item or insufficient stock           │
//! │    │            (disambiguated inside the transaction,       │
//! │    │             nothing written)                            │
//! │    └── 1 row  → INSERT sale (name/price snapshot)            │
//! │  COMMIT                                                      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Two concurrent sells of the same item serialize on the row write, so
//! both can never pass the sufficiency check against the same
//! pre-decrement stock value. Sells of different items share no lock.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use stockbook_core::{Item, Money, Sale, SaleFilter, SaleView};

/// Outcome of an attempted sale transaction.
///
/// A missing item is an `Err(DbError::NotFound)`; insufficient stock is a
/// normal outcome, not a storage error, and carries the stock the request
/// was refused against.
#[derive(Debug)]
pub enum SaleAttempt {
    /// Stock decremented and sale recorded; both committed together.
    Completed { item: Item, sale: Sale },
    /// Requested quantity exceeds available stock; nothing was written.
    InsufficientStock { item_name: String, available: i64 },
}

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Executes a sale as one atomic unit: conditional stock decrement plus
    /// sale insert snapshotting the item's current name and price.
    ///
    /// ## Arguments
    /// * `item_id` - item to sell
    /// * `quantity` - units to sell, already validated > 0
    pub async fn execute(&self, item_id: &str, quantity: i64) -> DbResult<SaleAttempt> {
        debug!(item_id = %item_id, quantity = %quantity, "Executing sale");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        // Check-and-decrement in a single conditional update. Zero rows
        // affected means the item is missing or the stock is short.
        let result = sqlx::query(
            r#"
            UPDATE items
            SET stock = stock - ?2, updated_at = ?3
            WHERE id = ?1 AND stock >= ?2
            "#,
        )
        .bind(item_id)
        .bind(quantity)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            // Disambiguate inside the same transaction: the row is either
            // absent or its stock is below the requested quantity.
            let existing = sqlx::query_as::<_, Item>(ITEM_SELECT)
                .bind(item_id)
                .fetch_optional(&mut *tx)
                .await?;

            return match existing {
                None => Err(DbError::not_found("Item", item_id)),
                Some(item) => Ok(SaleAttempt::InsufficientStock {
                    item_name: item.name,
                    available: item.stock,
                }),
            };
        }

        let item = sqlx::query_as::<_, Item>(ITEM_SELECT)
            .bind(item_id)
            .fetch_one(&mut *tx)
            .await?;

        let total = Money::from_cents(item.price_cents)
            .checked_multiply_quantity(quantity)
            .ok_or_else(|| DbError::Internal("sale total overflows".to_string()))?;

        let sale = Sale {
            id: Uuid::new_v4().to_string(),
            item_id: item.id.clone(),
            item_name: item.name.clone(),
            unit_price_cents: item.price_cents,
            quantity,
            total_cents: total.cents(),
            created_at: now,
        };

        insert_sale(&mut tx, &sale).await?;

        tx.commit().await?;

        debug!(sale_id = %sale.id, total = %sale.total(), "Sale committed");
        Ok(SaleAttempt::Completed { item, sale })
    }

    /// Gets a sale by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, item_id, item_name, unit_price_cents, quantity, total_cents, created_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Inserts a complete sale row directly.
    ///
    /// Used by the seed binary and tests; `execute` is the production path.
    pub async fn insert(&self, sale: &Sale) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;
        insert_sale(&mut tx, sale).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Deletes a sale record (a reversal of the bookkeeping entry).
    ///
    /// Deliberately does NOT restore item stock.
    ///
    /// ## Returns
    /// * `Ok(Sale)` - the removed record
    /// * `Err(DbError::NotFound)` - no such sale
    pub async fn delete(&self, id: &str) -> DbResult<Sale> {
        debug!(id = %id, "Deleting sale record");

        let sale = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Sale", id))?;

        sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(sale)
    }

    /// Lists sales newest first, enriched with the item's category and
    /// brand names at read time.
    ///
    /// Enrichment is best-effort via LEFT JOINs: a deleted item (or a
    /// dangling catalog reference) yields NULL names, never an error.
    pub async fn list(&self, filter: &SaleFilter) -> DbResult<Vec<SaleView>> {
        let name_pattern = filter
            .name_contains
            .as_deref()
            .map(|n| format!("%{}%", n.to_lowercase()));
        let on_date = filter.on_date.map(|d| d.to_string());

        let sales = sqlx::query_as::<_, SaleView>(
            r#"
            SELECT s.id, s.item_id, s.item_name, s.unit_price_cents,
                   s.quantity, s.total_cents, s.created_at,
                   c.name AS category_name,
                   b.name AS brand_name
            FROM sales s
            LEFT JOIN items i ON i.id = s.item_id
            LEFT JOIN catalog_entries c ON c.id = i.category_id
            LEFT JOIN catalog_entries b ON b.id = i.brand_id
            WHERE (?1 IS NULL OR lower(s.item_name) LIKE ?1)
              AND (?2 IS NULL OR substr(s.created_at, 1, 10) = ?2)
            ORDER BY s.created_at DESC
            "#,
        )
        .bind(name_pattern)
        .bind(on_date)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }
}

const ITEM_SELECT: &str = r#"
    SELECT id, name, stock, price_cents, category_id, brand_id, seller_id,
           description, created_at, updated_at
    FROM items
    WHERE id = ?1
"#;

async fn insert_sale(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    sale: &Sale,
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO sales (
            id, item_id, item_name, unit_price_cents, quantity, total_cents, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&sale.id)
    .bind(&sale.item_id)
    .bind(&sale.item_name)
    .bind(sale.unit_price_cents)
    .bind(sale.quantity)
    .bind(sale.total_cents)
    .bind(sale.created_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
