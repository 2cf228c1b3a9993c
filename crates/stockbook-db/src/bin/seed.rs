//! Seeds a database with demo catalog entries, items, and activity.
//!
//! Usage:
//! ```text
//! seed [--db <path>] [--items <count>]
//! ```
//! Defaults to `stockbook.db` in the working directory and 12 items.
//! Safe to re-run: duplicate catalog entries are skipped, items are
//! appended.

use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use stockbook_core::{CatalogKind, CoreError, NewItem, ValidationError};
use stockbook_db::{DbConfig, InventoryService};

const CATEGORIES: &[&str] = &["Tools", "Hardware", "Electrical", "Paint"];
const BRANDS: &[&str] = &["Acme", "Globex", "Initech", "Umbrella"];
const SELLERS: &[&str] = &["Main St", "Harbor Depot", "Northside"];

const ITEM_NAMES: &[&str] = &[
    "Claw Hammer",
    "Crosscut Saw",
    "Cordless Drill",
    "Socket Set",
    "Wood Screws 50mm",
    "Duct Tape",
    "Wire Stripper",
    "Extension Cord 10m",
    "Latex Primer 1L",
    "Roller Kit",
    "Utility Knife",
    "Measuring Tape 5m",
    "Safety Goggles",
    "Work Gloves",
    "Stud Finder",
    "Level 60cm",
];

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}");
            eprintln!("usage: seed [--db <path>] [--items <count>]");
            return ExitCode::FAILURE;
        }
    };

    match seed(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "Seeding failed");
            ExitCode::FAILURE
        }
    }
}

struct Args {
    db_path: String,
    items: usize,
}

impl Args {
    fn parse(mut argv: impl Iterator<Item = String>) -> Result<Args, String> {
        let mut args = Args {
            db_path: "stockbook.db".to_string(),
            items: 12,
        };

        while let Some(flag) = argv.next() {
            match flag.as_str() {
                "--db" => {
                    args.db_path = argv.next().ok_or("--db requires a path")?;
                }
                "--items" => {
                    let raw = argv.next().ok_or("--items requires a count")?;
                    args.items = raw
                        .parse()
                        .map_err(|_| format!("invalid item count: {raw}"))?;
                }
                other => return Err(format!("unknown argument: {other}")),
            }
        }

        Ok(args)
    }
}

async fn seed(args: &Args) -> Result<(), CoreError> {
    let svc = InventoryService::connect(DbConfig::new(&args.db_path)).await?;

    for name in CATEGORIES {
        ensure_entry(&svc, CatalogKind::Category, name).await?;
    }
    for name in BRANDS {
        ensure_entry(&svc, CatalogKind::Brand, name).await?;
    }
    for name in SELLERS {
        ensure_entry(&svc, CatalogKind::Seller, name).await?;
    }

    let count = args.items.min(ITEM_NAMES.len());
    for (i, name) in ITEM_NAMES.iter().take(count).enumerate() {
        let draft = NewItem {
            name: (*name).to_string(),
            stock: 5 + (i as i64 * 7) % 40,
            price_cents: 199 + (i as i64 * 1337) % 9800,
            category: CATEGORIES[i % CATEGORIES.len()].to_string(),
            brand: BRANDS[i % BRANDS.len()].to_string(),
            seller: SELLERS[i % SELLERS.len()].to_string(),
            description: None,
        };
        let item = svc.create_item(&draft).await?;

        // A little history per item so listings and stats are non-trivial.
        if item.stock >= 3 {
            svc.sell(&item.id, 1 + (i as i64 % 2)).await?;
        }
        if i % 3 == 0 {
            svc.restock(&item.id, 10).await?;
        }
    }

    let totals = svc.totals().await?;
    info!(
        db = %args.db_path,
        items = count,
        total_stock = totals.total_stock,
        total_revenue = %totals.total_revenue(),
        "Seed complete"
    );

    Ok(())
}

async fn ensure_entry(
    svc: &InventoryService,
    kind: CatalogKind,
    name: &str,
) -> Result<(), CoreError> {
    match svc.create_catalog_entry(kind, name).await {
        Ok(_) => Ok(()),
        Err(CoreError::Validation(ValidationError::Duplicate { .. })) => Ok(()),
        Err(err) => Err(err),
    }
}
