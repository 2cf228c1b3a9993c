//! # Stats Repository
//!
//! Aggregates derived from persisted items and sales. Read-only: this
//! repository never mutates state, and its reads are not required to be
//! linearizable with in-flight sales (WAL snapshot semantics are enough).

use sqlx::SqlitePool;

use crate::error::DbResult;
use stockbook_core::{DailySalesBucket, InventoryTotals};

/// Repository for summary statistics.
#[derive(Debug, Clone)]
pub struct StatsRepository {
    pool: SqlitePool,
}

impl StatsRepository {
    /// Creates a new StatsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StatsRepository { pool }
    }

    /// Computes system-wide totals. Each total is 0 when no records exist.
    pub async fn totals(&self) -> DbResult<InventoryTotals> {
        let total_stock: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(stock), 0) FROM items")
            .fetch_one(&self.pool)
            .await?;

        let (total_items_sold, total_revenue_cents): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(quantity), 0), COALESCE(SUM(total_cents), 0)
            FROM sales
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(InventoryTotals {
            total_stock,
            total_items_sold,
            total_revenue_cents,
        })
    }

    /// Groups sales by UTC calendar day, ascending by date.
    ///
    /// Timestamps are stored as UTC text, so the leading ten characters of
    /// `created_at` are the bucket key regardless of the exact ISO-8601
    /// encoding. Days with no sales produce no bucket (sparse series).
    pub async fn daily_sales(&self) -> DbResult<Vec<DailySalesBucket>> {
        let buckets = sqlx::query_as::<_, DailySalesBucket>(
            r#"
            SELECT substr(created_at, 1, 10) AS date,
                   COALESCE(SUM(total_cents), 0) AS revenue_cents,
                   COALESCE(SUM(quantity), 0) AS quantity
            FROM sales
            GROUP BY substr(created_at, 1, 10)
            ORDER BY date ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(buckets)
    }
}
