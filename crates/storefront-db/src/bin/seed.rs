//! # Seed Data Generator
//!
//! Populates the database with sample products for development.
//!
//! ## Usage
//! ```bash
//! cargo run -p storefront-db --bin seed
//!
//! # Specify database path
//! cargo run -p storefront-db --bin seed -- --db ./data/storefront.db
//! ```

use chrono::Utc;
use std::env;
use uuid::Uuid;

use storefront_core::{Product, DEFAULT_LOW_STOCK_THRESHOLD};
use storefront_db::{Database, DbConfig};

/// Sample catalog: (name, price in cents, stock).
const CATALOG: &[(&str, i64, i64)] = &[
    ("Wireless Mouse", 2499, 40),
    ("Mechanical Keyboard", 8999, 15),
    ("USB-C Cable 2m", 1299, 120),
    ("Laptop Stand", 3499, 25),
    ("Webcam 1080p", 5999, 18),
    ("Noise-Cancelling Headphones", 19999, 8),
    ("Portable SSD 1TB", 10999, 30),
    ("Phone Charger 30W", 1999, 75),
    ("Desk Lamp", 2799, 22),
    ("Monitor Arm", 6499, 12),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let db_path = parse_db_path().unwrap_or_else(|| "./storefront.db".to_string());

    println!("Seeding database at {}", db_path);

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let products = db.products();

    let mut inserted = 0;
    for (name, price_cents, stock) in CATALOG {
        if products.get_by_name(name).await?.is_some() {
            println!("  skipping '{}' (already present)", name);
            continue;
        }

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: format!("{} - demo catalog item", name),
            price_cents: *price_cents,
            stock: *stock,
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            created_at: now,
            updated_at: now,
        };
        products.insert(&product).await?;
        inserted += 1;
    }

    let total = products.count().await?;
    println!();
    println!("✓ Seed complete! Inserted {} products ({} total)", inserted, total);

    Ok(())
}

/// Parses `--db <path>` from the command line.
fn parse_db_path() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    args.iter()
        .position(|a| a == "--db")
        .and_then(|i| args.get(i + 1))
        .cloned()
}
