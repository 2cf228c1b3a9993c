//! # Inventory Service
//!
//! The public operation surface of the inventory engine, consumed by an
//! external request-routing layer. Wire formats, authentication, and UI
//! are all out of scope here; callers are assumed already authenticated
//! and every operation is caller-agnostic.
//!
//! ## Control Flow
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  caller                                                      │
//! │    │                                                         │
//! │    ▼                                                         │
//! │  InventoryService                                            │
//! │    ├── validate input            (stockbook-core validation) │
//! │    ├── resolve catalog names     (CatalogRepository)         │
//! │    ├── run the operation         (Item/Stock/Sale/Stats      │
//! │    │                              repositories)              │
//! │    └── bounded retry on lock     (DbError::Busy →            │
//! │        contention                 CoreError::Conflict)       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Aggregation reads (`totals`, `daily_sales`) only ever read persisted
//! state; they never mutate it.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

use crate::error::DbError;
use crate::pool::{Database, DbConfig};
use crate::repository::sale::SaleAttempt;
use stockbook_core::{
    validation, CatalogEntry, CatalogKind, CoreError, CoreResult, DailySalesBucket,
    InventoryTotals, Item, ItemFilter, ItemPage, NewItem, Sale, SaleFilter, SaleReceipt,
    SaleView, StockMovementView, ValidationError, MAX_PAGE_SIZE, MAX_STOCK_UPDATE_ATTEMPTS,
};

/// Base backoff between retries of a contended stock update.
const RETRY_BACKOFF: Duration = Duration::from_millis(25);

/// The inventory engine: item ledger, stock movement log, sale transaction
/// engine, and aggregation reads behind one handle.
///
/// Cloning is cheap; handles share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct InventoryService {
    db: Database,
}

impl InventoryService {
    /// Wraps an existing database handle.
    pub fn new(db: Database) -> Self {
        InventoryService { db }
    }

    /// Connects to the database and returns a ready service.
    pub async fn connect(config: DbConfig) -> CoreResult<Self> {
        let db = Database::new(config).await?;
        Ok(InventoryService { db })
    }

    /// Raw database access, for callers needing queries beyond this surface.
    pub fn database(&self) -> &Database {
        &self.db
    }

    // =========================================================================
    // Catalog Reference Store
    // =========================================================================

    /// Creates a category/brand/seller entry.
    ///
    /// A duplicate name within the registry fails as a validation error.
    pub async fn create_catalog_entry(
        &self,
        kind: CatalogKind,
        name: &str,
    ) -> CoreResult<CatalogEntry> {
        let name = validation::validate_name(kind.as_str(), name)?;

        match self.db.catalog().insert(kind, &name).await {
            Ok(entry) => {
                info!(kind = %kind, name = %entry.name, id = %entry.id, "Catalog entry created");
                Ok(entry)
            }
            Err(DbError::UniqueViolation { .. }) => {
                Err(CoreError::Validation(ValidationError::Duplicate {
                    field: kind.as_str(),
                    value: name,
                }))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Lists all entries of one registry, ordered by name.
    pub async fn list_catalog(&self, kind: CatalogKind) -> CoreResult<Vec<CatalogEntry>> {
        Ok(self.db.catalog().list(kind).await?)
    }

    /// Resolves a catalog entry by name, failing with `ReferenceNotFound`.
    pub async fn resolve_by_name(
        &self,
        kind: CatalogKind,
        name: &str,
    ) -> CoreResult<CatalogEntry> {
        self.db
            .catalog()
            .resolve_by_name(kind, name)
            .await?
            .ok_or_else(|| CoreError::reference_not_found(kind, name))
    }

    // =========================================================================
    // Item Ledger
    // =========================================================================

    /// Registers a new item.
    ///
    /// Category, brand, and seller are resolved by name; any failed
    /// resolution fails the whole operation with `ReferenceNotFound`.
    pub async fn create_item(&self, draft: &NewItem) -> CoreResult<Item> {
        let draft = validation::validate_new_item(draft)?;
        let (category_id, brand_id, seller_id) = self.resolve_item_refs(&draft).await?;

        let now = chrono::Utc::now();
        let item = Item {
            id: uuid::Uuid::new_v4().to_string(),
            name: draft.name,
            stock: draft.stock,
            price_cents: draft.price_cents,
            category_id,
            brand_id,
            seller_id,
            description: draft.description,
            created_at: now,
            updated_at: now,
        };

        self.db.items().insert(&item).await?;

        info!(id = %item.id, name = %item.name, stock = item.stock, "Item created");
        Ok(item)
    }

    /// Fully replaces an item's fields.
    ///
    /// The full field set is required so referential integrity is
    /// re-validated on every edit: all three catalog references are
    /// re-resolved by name.
    pub async fn update_item(&self, id: &str, draft: &NewItem) -> CoreResult<Item> {
        let draft = validation::validate_new_item(draft)?;
        let (category_id, brand_id, seller_id) = self.resolve_item_refs(&draft).await?;

        let existing = self
            .db
            .items()
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::not_found("Item", id))?;

        let item = Item {
            id: existing.id,
            name: draft.name,
            stock: draft.stock,
            price_cents: draft.price_cents,
            category_id,
            brand_id,
            seller_id,
            description: draft.description,
            created_at: existing.created_at,
            updated_at: chrono::Utc::now(),
        };

        self.db.items().update(&item).await?;

        info!(id = %item.id, "Item updated");
        Ok(item)
    }

    /// Deletes an item and returns the removed record.
    ///
    /// Sales and stock movements referencing it are kept untouched: history
    /// holds weak references and tolerates the orphan on reads.
    pub async fn delete_item(&self, id: &str) -> CoreResult<Item> {
        let existing = self
            .db
            .items()
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::not_found("Item", id))?;

        self.db.items().delete(id).await?;

        info!(id = %id, name = %existing.name, "Item deleted");
        Ok(existing)
    }

    /// Lists items matching the filter, ordered by name ascending, with
    /// offset pagination (`page` is 1-based).
    pub async fn list_items(
        &self,
        filter: &ItemFilter,
        page: u32,
        page_size: u32,
    ) -> CoreResult<ItemPage> {
        validation::validate_page(page, page_size, MAX_PAGE_SIZE)?;

        let offset = i64::from(page - 1) * i64::from(page_size);
        let items = self.db.items().list(filter, page_size, offset).await?;
        let total_count = self.db.items().count(filter).await?;

        Ok(ItemPage { items, total_count })
    }

    async fn resolve_item_refs(&self, draft: &NewItem) -> CoreResult<(String, String, String)> {
        let category = self
            .resolve_by_name(CatalogKind::Category, &draft.category)
            .await?;
        let brand = self.resolve_by_name(CatalogKind::Brand, &draft.brand).await?;
        let seller = self
            .resolve_by_name(CatalogKind::Seller, &draft.seller)
            .await?;

        Ok((category.id, brand.id, seller.id))
    }

    // =========================================================================
    // Stock Movement Log
    // =========================================================================

    /// Restocks an item: increments stock and appends a movement record as
    /// one atomic unit. Retried internally on lock contention.
    pub async fn restock(
        &self,
        item_id: &str,
        quantity: i64,
    ) -> CoreResult<(Item, stockbook_core::StockMovement)> {
        validation::validate_quantity(quantity)?;

        let movements = self.db.stock_movements();
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match movements.record(item_id, quantity).await {
                Ok((item, movement)) => {
                    info!(
                        item_id = %item.id,
                        quantity = quantity,
                        stock = item.stock,
                        "Restock recorded"
                    );
                    return Ok((item, movement));
                }
                Err(err) if err.is_retryable() && attempt < MAX_STOCK_UPDATE_ATTEMPTS => {
                    warn!(attempt, error = %err, "Restock contended, retrying");
                    sleep(RETRY_BACKOFF * attempt).await;
                }
                Err(err) if err.is_retryable() => {
                    return Err(CoreError::Conflict { attempts: attempt })
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Lists the restock history, oldest first, optionally for one item.
    pub async fn stock_history(
        &self,
        item_id: Option<&str>,
    ) -> CoreResult<Vec<StockMovementView>> {
        Ok(self.db.stock_movements().list(item_id).await?)
    }

    // =========================================================================
    // Sale Transaction Engine
    // =========================================================================

    /// Sells `quantity` units of an item.
    ///
    /// The stock sufficiency check, the decrement, and the sale insert are
    /// one atomic transaction; under concurrent sells of the same item at
    /// most the available stock is ever sold. Retried internally on lock
    /// contention, then surfaced as `Conflict`.
    pub async fn sell(&self, item_id: &str, quantity: i64) -> CoreResult<SaleReceipt> {
        validation::validate_quantity(quantity)?;

        let sales = self.db.sales();
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match sales.execute(item_id, quantity).await {
                Ok(SaleAttempt::Completed { item, sale }) => {
                    info!(
                        sale_id = %sale.id,
                        item_id = %item.id,
                        quantity = quantity,
                        total = %sale.total(),
                        stock = item.stock,
                        "Sale completed"
                    );
                    return Ok(SaleReceipt { item, sale });
                }
                Ok(SaleAttempt::InsufficientStock {
                    item_name,
                    available,
                }) => {
                    return Err(CoreError::InsufficientStock {
                        item: item_name,
                        available,
                        requested: quantity,
                    });
                }
                Err(err) if err.is_retryable() && attempt < MAX_STOCK_UPDATE_ATTEMPTS => {
                    warn!(attempt, error = %err, "Sale contended, retrying");
                    sleep(RETRY_BACKOFF * attempt).await;
                }
                Err(err) if err.is_retryable() => {
                    return Err(CoreError::Conflict { attempts: attempt })
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Deletes a sale record and returns it.
    ///
    /// Item stock is NOT restored: a sale deletion reverses the bookkeeping
    /// entry only. (Deliberate asymmetry, matching the system of record.)
    pub async fn delete_sale(&self, id: &str) -> CoreResult<Sale> {
        let sale = self.db.sales().delete(id).await?;
        info!(sale_id = %id, "Sale record deleted (stock not restored)");
        Ok(sale)
    }

    /// Lists sales newest first, enriched with category/brand names.
    pub async fn list_sales(&self, filter: &SaleFilter) -> CoreResult<Vec<SaleView>> {
        Ok(self.db.sales().list(filter).await?)
    }

    // =========================================================================
    // Aggregation Engine
    // =========================================================================

    /// System-wide totals: stock on hand, units sold, revenue.
    pub async fn totals(&self) -> CoreResult<InventoryTotals> {
        Ok(self.db.stats().totals().await?)
    }

    /// Daily sales series, UTC day buckets, ascending, sparse.
    pub async fn daily_sales(&self) -> CoreResult<Vec<DailySalesBucket>> {
        Ok(self.db.stats().daily_sales().await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use stockbook_core::Money;
    use uuid::Uuid;

    async fn service() -> InventoryService {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let svc = InventoryService::new(db);
        seed_catalog(&svc).await;
        svc
    }

    async fn seed_catalog(svc: &InventoryService) {
        svc.create_catalog_entry(CatalogKind::Category, "Tools")
            .await
            .unwrap();
        svc.create_catalog_entry(CatalogKind::Brand, "Acme")
            .await
            .unwrap();
        svc.create_catalog_entry(CatalogKind::Seller, "Main St")
            .await
            .unwrap();
    }

    fn widget_draft() -> NewItem {
        NewItem {
            name: "Widget".to_string(),
            stock: 10,
            price_cents: 500,
            category: "Tools".to_string(),
            brand: "Acme".to_string(),
            seller: "Main St".to_string(),
            description: Some("A very useful widget".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_and_list_round_trip() {
        let svc = service().await;
        let created = svc.create_item(&widget_draft()).await.unwrap();

        let category = svc
            .resolve_by_name(CatalogKind::Category, "Tools")
            .await
            .unwrap();
        let filter = ItemFilter {
            category_id: Some(category.id),
            min_price_cents: Some(500),
            max_price_cents: Some(500),
            name_contains: Some("wid".to_string()),
            ..ItemFilter::default()
        };

        let page = svc.list_items(&filter, 1, 10).await.unwrap();
        assert_eq!(page.total_count, 1);
        assert_eq!(page.items.len(), 1);

        let listed = &page.items[0];
        assert_eq!(listed.id, created.id);
        assert_eq!(listed.name, "Widget");
        assert_eq!(listed.stock, 10);
        assert_eq!(listed.price_cents, 500);
        assert_eq!(listed.description.as_deref(), Some("A very useful widget"));
        assert_eq!(listed.category_id, created.category_id);
    }

    #[tokio::test]
    async fn test_create_with_unknown_brand_fails() {
        let svc = service().await;
        let mut draft = widget_draft();
        draft.brand = "NoSuchBrand".to_string();

        let err = svc.create_item(&draft).await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::ReferenceNotFound {
                kind: CatalogKind::Brand,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input() {
        let svc = service().await;

        let mut draft = widget_draft();
        draft.name = "   ".to_string();
        assert!(matches!(
            svc.create_item(&draft).await,
            Err(CoreError::Validation(_))
        ));

        let mut draft = widget_draft();
        draft.stock = -1;
        assert!(matches!(
            svc.create_item(&draft).await,
            Err(CoreError::Validation(_))
        ));

        let mut draft = widget_draft();
        draft.price_cents = -500;
        assert!(matches!(
            svc.create_item(&draft).await,
            Err(CoreError::Validation(_))
        ));
    }

    /// The full sell/restock/aggregate scenario: 10 in stock at $5.00,
    /// sell 3, refuse an oversell of 8, restock 5, check the totals.
    #[tokio::test]
    async fn test_sell_restock_scenario() {
        let svc = service().await;
        let item = svc.create_item(&widget_draft()).await.unwrap();

        let receipt = svc.sell(&item.id, 3).await.unwrap();
        assert_eq!(receipt.item.stock, 7);
        assert_eq!(receipt.sale.quantity, 3);
        assert_eq!(receipt.sale.item_name, "Widget");
        assert_eq!(receipt.sale.unit_price_cents, 500);
        assert_eq!(receipt.sale.total(), Money::from_cents(1500));

        let err = svc.sell(&item.id, 8).await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientStock {
                available: 7,
                requested: 8,
                ..
            }
        ));

        // Failed sale left the stock untouched and recorded nothing.
        let unchanged = svc.database().items().get_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!(unchanged.stock, 7);
        assert_eq!(svc.list_sales(&SaleFilter::default()).await.unwrap().len(), 1);

        let (restocked, movement) = svc.restock(&item.id, 5).await.unwrap();
        assert_eq!(restocked.stock, 12);
        assert_eq!(movement.quantity, 5);

        let history = svc.stock_history(Some(&item.id)).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].quantity, 5);
        assert_eq!(history[0].item_name.as_deref(), Some("Widget"));

        let totals = svc.totals().await.unwrap();
        assert_eq!(
            totals,
            InventoryTotals {
                total_stock: 12,
                total_items_sold: 3,
                total_revenue_cents: 1500,
            }
        );
    }

    #[tokio::test]
    async fn test_sell_rejects_non_positive_quantity() {
        let svc = service().await;
        let item = svc.create_item(&widget_draft()).await.unwrap();

        assert!(matches!(
            svc.sell(&item.id, 0).await,
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            svc.sell(&item.id, -2).await,
            Err(CoreError::Validation(_))
        ));

        // Nothing was decremented by the rejected requests.
        let unchanged = svc.database().items().get_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!(unchanged.stock, 10);
    }

    #[tokio::test]
    async fn test_sell_missing_item_is_not_found() {
        let svc = service().await;
        let err = svc.sell("no-such-id", 1).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound { entity: "Item", .. }));
    }

    #[tokio::test]
    async fn test_restock_missing_item_is_not_found() {
        let svc = service().await;
        let err = svc.restock("no-such-id", 5).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound { entity: "Item", .. }));

        // No orphan movement was logged.
        assert!(svc.stock_history(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_sale_does_not_restore_stock() {
        let svc = service().await;
        let item = svc.create_item(&widget_draft()).await.unwrap();
        let receipt = svc.sell(&item.id, 4).await.unwrap();
        assert_eq!(receipt.item.stock, 6);

        let deleted = svc.delete_sale(&receipt.sale.id).await.unwrap();
        assert_eq!(deleted.id, receipt.sale.id);

        // The record is gone but the stock stays decremented.
        assert!(svc.list_sales(&SaleFilter::default()).await.unwrap().is_empty());
        let after = svc.database().items().get_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!(after.stock, 6);

        let err = svc.delete_sale(&receipt.sale.id).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound { entity: "Sale", .. }));
    }

    #[tokio::test]
    async fn test_deleted_item_tolerated_in_history_reads() {
        let svc = service().await;
        let item = svc.create_item(&widget_draft()).await.unwrap();
        svc.sell(&item.id, 2).await.unwrap();
        svc.restock(&item.id, 1).await.unwrap();

        svc.delete_item(&item.id).await.unwrap();

        // Sale keeps its snapshot; enrichment degrades to None.
        let sales = svc.list_sales(&SaleFilter::default()).await.unwrap();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].item_name, "Widget");
        assert_eq!(sales[0].category_name, None);
        assert_eq!(sales[0].brand_name, None);

        // Movement log keeps the row; the display name is gone.
        let history = svc.stock_history(None).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].item_name, None);
    }

    #[tokio::test]
    async fn test_totals_on_empty_system_are_zero() {
        let svc = service().await;
        let totals = svc.totals().await.unwrap();
        assert_eq!(totals, InventoryTotals::default());
        assert!(svc.daily_sales().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_daily_sales_buckets_by_utc_day() {
        let svc = service().await;
        let item = svc.create_item(&widget_draft()).await.unwrap();

        // $10 on day 1, $20 (two units) on day 2, nothing in between.
        let day1 = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
        let day2 = Utc.with_ymd_and_hms(2026, 3, 3, 18, 0, 0).unwrap();
        for (ts, qty, total) in [(day1, 1, 1000), (day2, 2, 2000)] {
            let sale = Sale {
                id: Uuid::new_v4().to_string(),
                item_id: item.id.clone(),
                item_name: item.name.clone(),
                unit_price_cents: total / qty,
                quantity: qty,
                total_cents: total,
                created_at: ts,
            };
            svc.database().sales().insert(&sale).await.unwrap();
        }

        let buckets = svc.daily_sales().await.unwrap();
        assert_eq!(
            buckets,
            vec![
                DailySalesBucket {
                    date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
                    revenue_cents: 1000,
                    quantity: 1,
                },
                DailySalesBucket {
                    date: NaiveDate::from_ymd_opt(2026, 3, 3).unwrap(),
                    revenue_cents: 2000,
                    quantity: 2,
                },
            ]
        );

        // Newest first in the sale listing; on_date narrows to one day.
        let all = svc.list_sales(&SaleFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].created_at, day2);

        let one_day = svc
            .list_sales(&SaleFilter {
                on_date: NaiveDate::from_ymd_opt(2026, 3, 1),
                ..SaleFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(one_day.len(), 1);
        assert_eq!(one_day[0].total_cents, 1000);
    }

    #[tokio::test]
    async fn test_list_items_pagination_and_ordering() {
        let svc = service().await;
        for (name, price) in [("Cherry Picker", 900), ("Apple Corer", 300), ("Band Saw", 700)] {
            let mut draft = widget_draft();
            draft.name = name.to_string();
            draft.price_cents = price;
            svc.create_item(&draft).await.unwrap();
        }

        let first = svc.list_items(&ItemFilter::default(), 1, 2).await.unwrap();
        assert_eq!(first.total_count, 3);
        assert_eq!(first.total_pages(2), 2);
        let names: Vec<_> = first.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Apple Corer", "Band Saw"]);

        let second = svc.list_items(&ItemFilter::default(), 2, 2).await.unwrap();
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.items[0].name, "Cherry Picker");

        // Inclusive price bounds.
        let ranged = svc
            .list_items(
                &ItemFilter {
                    min_price_cents: Some(300),
                    max_price_cents: Some(700),
                    ..ItemFilter::default()
                },
                1,
                10,
            )
            .await
            .unwrap();
        assert_eq!(ranged.total_count, 2);

        // Page 0 and oversized page sizes are rejected.
        assert!(svc.list_items(&ItemFilter::default(), 0, 10).await.is_err());
        assert!(svc
            .list_items(&ItemFilter::default(), 1, MAX_PAGE_SIZE + 1)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_update_item_re_resolves_references() {
        let svc = service().await;
        svc.create_catalog_entry(CatalogKind::Brand, "Globex")
            .await
            .unwrap();
        let item = svc.create_item(&widget_draft()).await.unwrap();

        let mut draft = widget_draft();
        draft.brand = "Globex".to_string();
        draft.price_cents = 650;
        draft.stock = 4;
        let updated = svc.update_item(&item.id, &draft).await.unwrap();

        assert_eq!(updated.id, item.id);
        assert_eq!(updated.price_cents, 650);
        assert_eq!(updated.stock, 4);
        assert_ne!(updated.brand_id, item.brand_id);
        assert_eq!(updated.created_at, item.created_at);

        // Unknown reference fails the whole update.
        draft.category = "NoSuchCategory".to_string();
        assert!(matches!(
            svc.update_item(&item.id, &draft).await,
            Err(CoreError::ReferenceNotFound { .. })
        ));

        // Missing id is NotFound, even with valid references.
        assert!(matches!(
            svc.update_item("no-such-id", &widget_draft()).await,
            Err(CoreError::NotFound { entity: "Item", .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_item_returns_removed_record() {
        let svc = service().await;
        let item = svc.create_item(&widget_draft()).await.unwrap();

        let removed = svc.delete_item(&item.id).await.unwrap();
        assert_eq!(removed.id, item.id);

        assert!(matches!(
            svc.delete_item(&item.id).await,
            Err(CoreError::NotFound { entity: "Item", .. })
        ));
        let page = svc.list_items(&ItemFilter::default(), 1, 10).await.unwrap();
        assert_eq!(page.total_count, 0);
    }

    #[tokio::test]
    async fn test_duplicate_catalog_entry_rejected() {
        let svc = service().await;
        let err = svc
            .create_catalog_entry(CatalogKind::Brand, "Acme")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::Duplicate { .. })
        ));

        let brands = svc.list_catalog(CatalogKind::Brand).await.unwrap();
        assert_eq!(brands.len(), 1);
    }

    /// Two concurrent oversubscribed sells: exactly one wins, the stock
    /// never goes negative, and the final level reflects only the winner.
    /// Runs against a file-backed database so two pool connections
    /// genuinely race.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_oversell_has_one_winner() {
        let path = std::env::temp_dir().join(format!("stockbook-test-{}.db", Uuid::new_v4()));
        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        let svc = InventoryService::new(db);
        seed_catalog(&svc).await;
        let item = svc.create_item(&widget_draft()).await.unwrap();

        // stock = 10; 7 + 7 > 10, but each alone fits.
        let a = {
            let svc = svc.clone();
            let id = item.id.clone();
            tokio::spawn(async move { svc.sell(&id, 7).await })
        };
        let b = {
            let svc = svc.clone();
            let id = item.id.clone();
            tokio::spawn(async move { svc.sell(&id, 7).await })
        };

        let results = vec![a.await.unwrap(), b.await.unwrap()];
        let successes = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1, "exactly one concurrent sale may win");

        for result in &results {
            if let Err(err) = result {
                assert!(
                    matches!(
                        err,
                        CoreError::InsufficientStock { .. } | CoreError::Conflict { .. }
                    ),
                    "loser failed with unexpected error: {err}"
                );
            }
        }

        let final_item = svc.database().items().get_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!(final_item.stock, 3);

        let totals = svc.totals().await.unwrap();
        assert_eq!(totals.total_items_sold, 7);
        assert_eq!(totals.total_revenue_cents, 3500);

        svc.database().close().await;
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
        }
    }
}
