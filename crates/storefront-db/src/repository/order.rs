//! # Order Repository
//!
//! Database operations for orders and their line items.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Order Lifecycle                               │
//! │                                                                     │
//! │  1. PLACEMENT (single transaction)                                  │
//! │     └── insert_with_items() → Order { status: Pending } + items     │
//! │         (stock decrements have already been committed per item,     │
//! │          before this call — see the placement workflow)             │
//! │                                                                     │
//! │  2. QUERY                                                           │
//! │     └── list_all() / list_for_user() / get_by_id() + get_items()    │
//! │                                                                     │
//! │  3. STATUS UPDATE (admin)                                           │
//! │     └── update_status() → any of Pending/Shipped/Delivered          │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use storefront_core::{Order, OrderItem, OrderStatus};

/// An order row joined with its owner's display fields.
///
/// Order queries resolve the owning user's name and email in the same
/// round trip so responses can embed them without a second lookup.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderWithOwner {
    pub id: String,
    pub user_id: String,
    pub total_cents: i64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner_name: String,
    pub owner_email: String,
}

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Inserts an order and its line items in a single transaction.
    ///
    /// ## Snapshot Pattern
    /// Each item carries the product's name and unit price as captured at
    /// placement time; nothing here reads the products table.
    pub async fn insert_with_items(&self, order: &Order, items: &[OrderItem]) -> DbResult<()> {
        debug!(id = %order.id, items = items.len(), "Inserting order");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, user_id, total_cents, status, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&order.id)
        .bind(&order.user_id)
        .bind(order.total_cents)
        .bind(order.status)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await?;

        for (position, item) in items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_items (
                    id, order_id, product_id, name_snapshot,
                    unit_price_cents, quantity, position
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(&item.id)
            .bind(&item.order_id)
            .bind(&item.product_id)
            .bind(&item.name_snapshot)
            .bind(item.unit_price_cents)
            .bind(item.quantity)
            .bind(position as i64)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Gets an order by ID, with owner display fields resolved.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<OrderWithOwner>> {
        let order = sqlx::query_as::<_, OrderWithOwner>(
            r#"
            SELECT o.id, o.user_id, o.total_cents, o.status,
                   o.created_at, o.updated_at,
                   u.name AS owner_name, u.email AS owner_email
            FROM orders o
            INNER JOIN users u ON u.id = o.user_id
            WHERE o.id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Lists all orders (admin view), newest first.
    pub async fn list_all(&self) -> DbResult<Vec<OrderWithOwner>> {
        let orders = sqlx::query_as::<_, OrderWithOwner>(
            r#"
            SELECT o.id, o.user_id, o.total_cents, o.status,
                   o.created_at, o.updated_at,
                   u.name AS owner_name, u.email AS owner_email
            FROM orders o
            INNER JOIN users u ON u.id = o.user_id
            ORDER BY o.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Lists orders owned by one user, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> DbResult<Vec<OrderWithOwner>> {
        let orders = sqlx::query_as::<_, OrderWithOwner>(
            r#"
            SELECT o.id, o.user_id, o.total_cents, o.status,
                   o.created_at, o.updated_at,
                   u.name AS owner_name, u.email AS owner_email
            FROM orders o
            INNER JOIN users u ON u.id = o.user_id
            WHERE o.user_id = ?1
            ORDER BY o.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Gets all line items for an order, in placement order.
    pub async fn get_items(&self, order_id: &str) -> DbResult<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT id, order_id, product_id, name_snapshot,
                   unit_price_cents, quantity
            FROM order_items
            WHERE order_id = ?1
            ORDER BY position
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Overwrites the order status unconditionally.
    ///
    /// No transition graph: any of the three statuses is reachable from any
    /// other. Validation of the status value happens before this call.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Order doesn't exist
    pub async fn update_status(&self, id: &str, status: OrderStatus) -> DbResult<()> {
        debug!(id = %id, status = ?status, "Updating order status");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        Ok(())
    }
}

/// Helper to generate a new order ID.
pub fn generate_order_id() -> String {
    Uuid::new_v4().to_string()
}

/// Helper to generate a new order item ID.
pub fn generate_order_item_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::user::generate_user_id;
    use storefront_core::{Role, User};

    async fn seed_user(db: &Database, email: &str) -> String {
        let user = User {
            id: generate_user_id(),
            name: "Ada".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            role: Role::Customer,
            created_at: Utc::now(),
        };
        db.users().insert(&user).await.unwrap();
        user.id
    }

    fn sample_order(user_id: &str, total_cents: i64) -> Order {
        let now = Utc::now();
        Order {
            id: generate_order_id(),
            user_id: user_id.to_string(),
            total_cents,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_item(order_id: &str, name: &str, price: i64, qty: i64) -> OrderItem {
        OrderItem {
            id: generate_order_item_id(),
            order_id: order_id.to_string(),
            product_id: Uuid::new_v4().to_string(),
            name_snapshot: name.to_string(),
            unit_price_cents: price,
            quantity: qty,
        }
    }

    #[tokio::test]
    async fn test_insert_and_read_back() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let user_id = seed_user(&db, "ada@example.com").await;
        let repo = db.orders();

        let order = sample_order(&user_id, 3297);
        let items = vec![
            sample_item(&order.id, "Widget", 1099, 3),
            sample_item(&order.id, "Gadget", 0, 1),
        ];
        repo.insert_with_items(&order, &items).await.unwrap();

        let fetched = repo.get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(fetched.total_cents, 3297);
        assert_eq!(fetched.status, OrderStatus::Pending);
        assert_eq!(fetched.owner_email, "ada@example.com");

        let fetched_items = repo.get_items(&order.id).await.unwrap();
        assert_eq!(fetched_items.len(), 2);
        // Input order preserved
        assert_eq!(fetched_items[0].name_snapshot, "Widget");
        assert_eq!(fetched_items[1].name_snapshot, "Gadget");
    }

    #[tokio::test]
    async fn test_ownership_filtering() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let ada = seed_user(&db, "ada@example.com").await;
        let bob = seed_user(&db, "bob@example.com").await;
        let repo = db.orders();

        repo.insert_with_items(&sample_order(&ada, 100), &[])
            .await
            .unwrap();
        repo.insert_with_items(&sample_order(&bob, 200), &[])
            .await
            .unwrap();

        assert_eq!(repo.list_all().await.unwrap().len(), 2);
        let adas = repo.list_for_user(&ada).await.unwrap();
        assert_eq!(adas.len(), 1);
        assert_eq!(adas[0].total_cents, 100);
    }

    #[tokio::test]
    async fn test_update_status() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let user_id = seed_user(&db, "ada@example.com").await;
        let repo = db.orders();

        let order = sample_order(&user_id, 100);
        repo.insert_with_items(&order, &[]).await.unwrap();

        repo.update_status(&order.id, OrderStatus::Shipped)
            .await
            .unwrap();
        let fetched = repo.get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, OrderStatus::Shipped);

        // Any status is reachable from any other
        repo.update_status(&order.id, OrderStatus::Pending)
            .await
            .unwrap();

        assert!(matches!(
            repo.update_status("missing", OrderStatus::Shipped)
                .await
                .unwrap_err(),
            DbError::NotFound { .. }
        ));
    }
}
