//! # Stock Movement Repository
//!
//! The append-only restock log and its transaction.
//!
//! A restock is one transaction: the stock increment on the item row and
//! the movement insert both commit or neither does, so no reader ever sees
//! a partial restock.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use stockbook_core::{Item, StockMovement, StockMovementView};

/// Repository for stock movement database operations.
#[derive(Debug, Clone)]
pub struct StockMovementRepository {
    pool: SqlitePool,
}

impl StockMovementRepository {
    /// Creates a new StockMovementRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StockMovementRepository { pool }
    }

    /// Records a restock: increments the item's stock and appends the
    /// movement, atomically.
    ///
    /// The increment is a delta update (`stock = stock + ?`), never a
    /// read-then-write from Rust, so concurrent restocks and sales on the
    /// same item cannot lose updates.
    ///
    /// ## Returns
    /// * `Ok((Item, StockMovement))` - updated item and the new log entry
    /// * `Err(DbError::NotFound)` - item doesn't exist (nothing written)
    pub async fn record(&self, item_id: &str, quantity: i64) -> DbResult<(Item, StockMovement)> {
        debug!(item_id = %item_id, quantity = %quantity, "Recording restock");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE items
            SET stock = stock + ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(item_id)
        .bind(quantity)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", item_id));
        }

        let item = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, stock, price_cents, category_id, brand_id, seller_id,
                   description, created_at, updated_at
            FROM items
            WHERE id = ?1
            "#,
        )
        .bind(item_id)
        .fetch_one(&mut *tx)
        .await?;

        let movement = StockMovement {
            id: Uuid::new_v4().to_string(),
            item_id: item_id.to_string(),
            quantity,
            created_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO stock_movements (id, item_id, quantity, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&movement.id)
        .bind(&movement.item_id)
        .bind(movement.quantity)
        .bind(movement.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((item, movement))
    }

    /// Lists the restock history, oldest first, optionally for one item.
    ///
    /// Each entry is annotated with the item's *current* display name;
    /// a deleted item yields `None` (weak reference, never an error).
    pub async fn list(&self, item_id: Option<&str>) -> DbResult<Vec<StockMovementView>> {
        let movements = match item_id {
            Some(item_id) => {
                sqlx::query_as::<_, StockMovementView>(
                    r#"
                    SELECT m.id, m.item_id, m.quantity, m.created_at,
                           i.name AS item_name
                    FROM stock_movements m
                    LEFT JOIN items i ON i.id = m.item_id
                    WHERE m.item_id = ?1
                    ORDER BY m.created_at ASC
                    "#,
                )
                .bind(item_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, StockMovementView>(
                    r#"
                    SELECT m.id, m.item_id, m.quantity, m.created_at,
                           i.name AS item_name
                    FROM stock_movements m
                    LEFT JOIN items i ON i.id = m.item_id
                    ORDER BY m.created_at ASC
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(movements)
    }
}
