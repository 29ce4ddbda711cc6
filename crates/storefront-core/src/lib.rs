//! # storefront-core: Pure Business Logic for the Storefront Backend
//!
//! This crate is the **heart** of the storefront. It contains all business
//! logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Storefront Architecture                        │
//! │                                                                     │
//! │  HTTP Request (axum)                                                │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌──────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/api handlers                         │   │
//! │  │    register, login, products CRUD, order placement           │   │
//! │  └──────────────────────────────┬───────────────────────────────┘   │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼───────────────────────────────┐   │
//! │  │             ★ storefront-core (THIS CRATE) ★                 │   │
//! │  │                                                              │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                │   │
//! │  │   │   types   │  │   money   │  │ validation│                │   │
//! │  │   │  Product  │  │   Money   │  │   rules   │                │   │
//! │  │   │   Order   │  │  (cents)  │  │  checks   │                │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                │   │
//! │  │                                                              │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS         │   │
//! │  └──────────────────────────────┬───────────────────────────────┘   │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼───────────────────────────────┐   │
//! │  │                 storefront-db (Database Layer)               │   │
//! │  │           SQLite queries, migrations, repositories           │   │
//! │  └──────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Order, User, Role, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64)
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default low-stock threshold applied when a product is created without one.
///
/// A product whose stock falls to or below this level triggers a low-stock
/// advisory event.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

/// Maximum quantity of a single product in one order line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;
