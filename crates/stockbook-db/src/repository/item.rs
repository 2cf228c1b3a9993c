//! # Item Repository
//!
//! Database operations for inventory items: CRUD plus the filtered,
//! paginated listing behind `list_items`.
//!
//! Stock is *not* mutated here outside of full-row updates; the atomic
//! sell/restock deltas live in the sale and stock repositories so the
//! decrement/increment always commits together with its audit record.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use stockbook_core::{Item, ItemFilter};

const ITEM_COLUMNS: &str = "id, name, stock, price_cents, category_id, brand_id, seller_id, \
                            description, created_at, updated_at";

/// Repository for item database operations.
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    /// Creates a new ItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Gets an item by its id.
    ///
    /// ## Returns
    /// * `Ok(Some(Item))` - item found
    /// * `Ok(None)` - item not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Item>> {
        let item = sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Inserts a new item (id and timestamps generated beforehand).
    pub async fn insert(&self, item: &Item) -> DbResult<()> {
        debug!(id = %item.id, name = %item.name, "Inserting item");

        sqlx::query(
            r#"
            INSERT INTO items (
                id, name, stock, price_cents,
                category_id, brand_id, seller_id,
                description, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(item.stock)
        .bind(item.price_cents)
        .bind(&item.category_id)
        .bind(&item.brand_id)
        .bind(&item.seller_id)
        .bind(&item.description)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Fully replaces an existing item row.
    ///
    /// ## Returns
    /// * `Ok(())` - update successful
    /// * `Err(DbError::NotFound)` - item doesn't exist
    pub async fn update(&self, item: &Item) -> DbResult<()> {
        debug!(id = %item.id, "Updating item");

        let result = sqlx::query(
            r#"
            UPDATE items SET
                name = ?2,
                stock = ?3,
                price_cents = ?4,
                category_id = ?5,
                brand_id = ?6,
                seller_id = ?7,
                description = ?8,
                updated_at = ?9
            WHERE id = ?1
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(item.stock)
        .bind(item.price_cents)
        .bind(&item.category_id)
        .bind(&item.brand_id)
        .bind(&item.seller_id)
        .bind(&item.description)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", &item.id));
        }

        Ok(())
    }

    /// Hard-deletes an item.
    ///
    /// History rows (sales, stock movements) keep their weak item_id
    /// reference and are untouched.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting item");

        let result = sqlx::query("DELETE FROM items WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", id));
        }

        Ok(())
    }

    /// Lists items matching the filter, ordered by name ascending.
    ///
    /// ## Arguments
    /// * `filter` - optional constraints (category, brand, price range, name)
    /// * `limit` / `offset` - pagination window
    pub async fn list(&self, filter: &ItemFilter, limit: u32, offset: i64) -> DbResult<Vec<Item>> {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {ITEM_COLUMNS} FROM items WHERE 1=1"));
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY name ASC LIMIT ")
            .push_bind(i64::from(limit))
            .push(" OFFSET ")
            .push_bind(offset);

        let items = qb
            .build_query_as::<Item>()
            .fetch_all(&self.pool)
            .await?;

        debug!(count = items.len(), "Item listing returned");
        Ok(items)
    }

    /// Counts all items matching the filter (ignores pagination).
    pub async fn count(&self, filter: &ItemFilter) -> DbResult<i64> {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT COUNT(*) FROM items WHERE 1=1");
        push_filter(&mut qb, filter);

        let count: i64 = qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Sums stock over all items (0 when the table is empty).
    pub async fn total_stock(&self) -> DbResult<i64> {
        let total: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(stock), 0) FROM items")
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }
}

/// Appends the WHERE clauses for an item filter.
///
/// Name matching is case-insensitive substring; price bounds are inclusive.
fn push_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &ItemFilter) {
    if let Some(category_id) = &filter.category_id {
        qb.push(" AND category_id = ").push_bind(category_id.clone());
    }
    if let Some(brand_id) = &filter.brand_id {
        qb.push(" AND brand_id = ").push_bind(brand_id.clone());
    }
    if let Some(min) = filter.min_price_cents {
        qb.push(" AND price_cents >= ").push_bind(min);
    }
    if let Some(max) = filter.max_price_cents {
        qb.push(" AND price_cents <= ").push_bind(max);
    }
    if let Some(name) = &filter.name_contains {
        qb.push(" AND lower(name) LIKE ")
            .push_bind(format!("%{}%", name.to_lowercase()));
    }
}
