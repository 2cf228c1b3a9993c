//! # Catalog Repository
//!
//! Database operations for the reference name registries (categories,
//! brands, sellers). One table, discriminated by `kind`, with a unique
//! `(kind, name)` pair — the `ResolveByName` surface the item ledger
//! builds on.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use stockbook_core::{CatalogEntry, CatalogKind};

/// Repository for catalog entry database operations.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Resolves a catalog entry by kind and exact name.
    ///
    /// ## Returns
    /// * `Ok(Some(CatalogEntry))` - entry found
    /// * `Ok(None)` - no entry with that name in the registry
    pub async fn resolve_by_name(
        &self,
        kind: CatalogKind,
        name: &str,
    ) -> DbResult<Option<CatalogEntry>> {
        let entry = sqlx::query_as::<_, CatalogEntry>(
            r#"
            SELECT id, kind, name, created_at
            FROM catalog_entries
            WHERE kind = ?1 AND name = ?2
            "#,
        )
        .bind(kind)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Gets a catalog entry by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<CatalogEntry>> {
        let entry = sqlx::query_as::<_, CatalogEntry>(
            r#"
            SELECT id, kind, name, created_at
            FROM catalog_entries
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Inserts a new catalog entry.
    ///
    /// ## Returns
    /// * `Ok(CatalogEntry)` - inserted entry with generated id
    /// * `Err(DbError::UniqueViolation)` - (kind, name) already exists
    pub async fn insert(&self, kind: CatalogKind, name: &str) -> DbResult<CatalogEntry> {
        debug!(kind = %kind, name = %name, "Inserting catalog entry");

        let entry = CatalogEntry {
            id: Uuid::new_v4().to_string(),
            kind,
            name: name.to_string(),
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO catalog_entries (id, kind, name, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&entry.id)
        .bind(entry.kind)
        .bind(&entry.name)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Lists all entries of one kind, ordered by name.
    pub async fn list(&self, kind: CatalogKind) -> DbResult<Vec<CatalogEntry>> {
        let entries = sqlx::query_as::<_, CatalogEntry>(
            r#"
            SELECT id, kind, name, created_at
            FROM catalog_entries
            WHERE kind = ?1
            ORDER BY name
            "#,
        )
        .bind(kind)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
