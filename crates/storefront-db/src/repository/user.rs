//! # User Repository
//!
//! Database operations for registered accounts.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use storefront_core::User;

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a new user.
    ///
    /// ## Returns
    /// * `Ok(())` - Inserted
    /// * `Err(DbError::UniqueViolation)` - Email already registered
    pub async fn insert(&self, user: &User) -> DbResult<()> {
        debug!(email = %user.email, "Inserting user");

        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, role, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a user by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, created_at
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets a user by email (login lookup).
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, created_at
            FROM users
            WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Counts registered users (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new user ID.
pub fn generate_user_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
