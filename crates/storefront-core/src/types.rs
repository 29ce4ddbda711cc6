//! # Domain Types
//!
//! Core domain types used throughout the storefront backend.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐    │
//! │  │    Product      │   │      Order      │   │      User       │    │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │    │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │    │
//! │  │  name (unique)  │   │  user_id (FK)   │   │  email (unique) │    │
//! │  │  price_cents    │   │  status         │   │  role           │    │
//! │  │  stock          │   │  total_cents    │   │  password_hash  │    │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘    │
//! │                                                                     │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐    │
//! │  │   OrderItem     │   │   OrderStatus   │   │      Role       │    │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │    │
//! │  │  product_id     │   │  Pending        │   │  Customer       │    │
//! │  │  price snapshot │   │  Shipped        │   │  Admin          │    │
//! │  │  quantity       │   │  Delivered      │   └─────────────────┘    │
//! │  └─────────────────┘   └─────────────────┘                          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Order items freeze the product's name and unit price at placement time.
//! Later price changes or product deletion never alter an existing order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Role
// =============================================================================

/// Caller role used for authorization decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular shopper: may place orders and view their own orders.
    Customer,
    /// Store operator: full catalog and order management.
    Admin,
}

impl Role {
    /// Parses a role from its wire representation.
    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "customer" => Some(Role::Customer),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Pure allow/deny check against a required role.
    ///
    /// Roles are exact-match: an admin is not implicitly a customer, so the
    /// customer-only order placement endpoint rejects admin callers.
    #[inline]
    pub fn permits(self, required: Role) -> bool {
        self == required
    }

    #[inline]
    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }

    /// Wire representation, matching the serde encoding.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Admin => "admin",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Customer
    }
}

// =============================================================================
// User
// =============================================================================

/// A registered account. Referenced by orders via `user_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Login identifier, unique across accounts.
    pub email: String,

    /// Argon2 password hash. Never serialized to clients.
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Authorization role.
    pub role: Role,

    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A product available for purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name, unique across the catalog.
    pub name: String,

    /// Product description.
    pub description: String,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Current stock level. Decremented per line item at order placement.
    pub stock: i64,

    /// Stock level at or below which a low-stock advisory is emitted.
    pub low_stock_threshold: i64,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks whether the requested quantity can be fulfilled from stock.
    #[inline]
    pub fn can_fulfill(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }

    /// Checks the low-stock condition (stock at or below the threshold).
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.low_stock_threshold
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// The fulfillment status of an order.
///
/// Any status is reachable from any status via the admin status update;
/// there is no enforced transition graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
pub enum OrderStatus {
    /// Initial status assigned at placement.
    Pending,
    Shipped,
    Delivered,
}

impl OrderStatus {
    /// Parses a status from its wire representation.
    ///
    /// Returns `None` for anything outside {Pending, Shipped, Delivered};
    /// callers surface that as an invalid-input failure.
    pub fn parse(value: &str) -> Option<OrderStatus> {
        match value {
            "Pending" => Some(OrderStatus::Pending),
            "Shipped" => Some(OrderStatus::Shipped),
            "Delivered" => Some(OrderStatus::Delivered),
            _ => None,
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

// =============================================================================
// Order
// =============================================================================

/// A placed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,

    /// Owning user.
    pub user_id: String,

    /// Sum of line totals, computed at placement time.
    pub total_cents: i64,

    pub status: OrderStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Returns the order total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Order Item
// =============================================================================

/// A line item in an order.
/// Uses the snapshot pattern to freeze product data at placement time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,

    /// Weak reference to the product; the snapshots below keep the line
    /// meaningful even after product deletion.
    pub product_id: String,

    /// Product name at time of placement (frozen).
    pub name_snapshot: String,

    /// Unit price in cents at time of placement (frozen).
    pub unit_price_cents: i64,

    /// Quantity ordered. Always positive.
    pub quantity: i64,
}

impl OrderItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Line total: unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.unit_price_cents * self.quantity)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
