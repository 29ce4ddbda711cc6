//! # Repository Layer
//!
//! Repository implementations for database access.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                               │
//! │                                                                     │
//! │  Handler Layer (apps/api)                                           │
//! │       │                                                             │
//! │       │ calls                                                       │
//! │       ▼                                                             │
//! │  Repository (this module) ← SQL lives here, nowhere else            │
//! │       │                                                             │
//! │       │ returns                                                     │
//! │       ▼                                                             │
//! │  Domain types (storefront-core)                                     │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

pub mod order;
pub mod product;
pub mod user;

pub use order::OrderRepository;
pub use product::ProductRepository;
pub use user::UserRepository;

pub use order::{generate_order_id, generate_order_item_id};
pub use product::generate_product_id;
pub use user::generate_user_id;
