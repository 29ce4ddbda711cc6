//! # storefront-db: Database Layer for the Storefront Backend
//!
//! This crate provides database access for the storefront.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Storefront Data Flow                          │
//! │                                                                     │
//! │  HTTP handler (place_order)                                         │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌──────────────────────────────────────────────────────────────┐   │
//! │  │                  storefront-db (THIS CRATE)                  │   │
//! │  │                                                              │   │
//! │  │   ┌───────────────┐   ┌───────────────┐   ┌──────────────┐   │   │
//! │  │   │   Database    │   │  Repositories │   │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │   │  user.rs      │   │  (embedded)  │   │   │
//! │  │   │               │   │  product.rs   │   │              │   │   │
//! │  │   │ SqlitePool    │◄──│  order.rs     │   │ 001_init.sql │   │   │
//! │  │   └───────────────┘   └───────────────┘   └──────────────┘   │   │
//! │  │                                                              │   │
//! │  └──────────────────────────────────────────────────────────────┘   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │                       SQLite Database                               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (user, product, order)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront_db::{Database, DbConfig};
//!
//! let config = DbConfig::new("path/to/storefront.db");
//! let db = Database::new(config).await?;
//!
//! let products = db.products().list().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::order::{OrderRepository, OrderWithOwner};
pub use repository::product::ProductRepository;
pub use repository::user::UserRepository;
