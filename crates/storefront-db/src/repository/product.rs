//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! ## Key Operations
//! - CRUD operations
//! - Stock overwrites (admin stock endpoint)
//! - Relative stock decrements (order placement)
//!
//! ## Stock Decrement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Stock Update Strategy                            │
//! │                                                                     │
//! │  Order placement issues a RELATIVE update:                          │
//! │     UPDATE products SET stock = stock - ?                           │
//! │                                                                     │
//! │  This avoids lost updates from two writers both writing an          │
//! │  absolute value. It does NOT serialize the preceding stock check:   │
//! │  two concurrent placements can both pass the check and oversell.    │
//! │  That race is an accepted limitation of this design.                │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use storefront_core::Product;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let all = repo.list().await?;
/// let product = repo.get_by_id("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists all products, sorted by name.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price_cents, stock,
                   low_stock_threshold, created_at, updated_at
            FROM products
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price_cents, stock,
                   low_stock_threshold, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by its unique name.
    ///
    /// ## Usage
    /// Duplicate-name check before create.
    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price_cents, stock,
                   low_stock_threshold, created_at, updated_at
            FROM products
            WHERE name = ?1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(())` - Inserted
    /// * `Err(DbError::UniqueViolation)` - Name already exists
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, description, price_cents, stock,
                low_stock_threshold, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(product.low_stock_threshold)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing product (full row overwrite).
    ///
    /// The partial-field merge happens in the handler: it loads the product,
    /// applies the provided fields, validates, then writes the whole row.
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                description = ?3,
                price_cents = ?4,
                stock = ?5,
                low_stock_threshold = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(product.low_stock_threshold)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Overwrites the stock level only (admin stock endpoint).
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn set_stock(&self, id: &str, stock: i64) -> DbResult<()> {
        debug!(id = %id, stock = %stock, "Setting stock");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock = ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(stock)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Decrements stock by the ordered quantity (relative update).
    ///
    /// Committed immediately, before the next order line is processed.
    /// The caller has already checked availability; see the module docs for
    /// the concurrency caveat.
    pub async fn decrement_stock(&self, id: &str, quantity: i64) -> DbResult<()> {
        debug!(id = %id, quantity = %quantity, "Decrementing stock");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock = stock - ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Deletes a product.
    ///
    /// Order history is unaffected: order items hold name and price
    /// snapshots and reference products without a foreign key.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use storefront_core::DEFAULT_LOW_STOCK_THRESHOLD;

    fn sample_product(name: &str, price_cents: i64, stock: i64) -> Product {
        let now = Utc::now();
        Product {
            id: generate_product_id(),
            name: name.to_string(),
            description: format!("{} description", name),
            price_cents,
            stock,
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_list_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        repo.insert(&sample_product("Widget", 1099, 10)).await.unwrap();
        repo.insert(&sample_product("Gadget", 2500, 3)).await.unwrap();

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 2);
        // Sorted by name
        assert_eq!(all[0].name, "Gadget");
        assert_eq!(all[1].name, "Widget");

        let widget = repo.get_by_name("Widget").await.unwrap().unwrap();
        let fetched = repo.get_by_id(&widget.id).await.unwrap().unwrap();
        assert_eq!(fetched.price_cents, 1099);
        assert_eq!(fetched.stock, 10);
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        repo.insert(&sample_product("Widget", 1099, 10)).await.unwrap();
        let err = repo
            .insert(&sample_product("Widget", 999, 1))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_set_and_decrement_stock() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let product = sample_product("Widget", 1099, 10);
        repo.insert(&product).await.unwrap();

        repo.set_stock(&product.id, 25).await.unwrap();
        assert_eq!(repo.get_by_id(&product.id).await.unwrap().unwrap().stock, 25);

        repo.decrement_stock(&product.id, 6).await.unwrap();
        assert_eq!(repo.get_by_id(&product.id).await.unwrap().unwrap().stock, 19);
    }

    #[tokio::test]
    async fn test_missing_product_not_found() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        assert!(repo.get_by_id("missing").await.unwrap().is_none());
        assert!(matches!(
            repo.set_stock("missing", 5).await.unwrap_err(),
            DbError::NotFound { .. }
        ));
        assert!(matches!(
            repo.delete("missing").await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let product = sample_product("Widget", 1099, 10);
        repo.insert(&product).await.unwrap();
        repo.delete(&product.id).await.unwrap();

        assert!(repo.get_by_id(&product.id).await.unwrap().is_none());
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
