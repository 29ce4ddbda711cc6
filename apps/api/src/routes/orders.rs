//! Order endpoints and the placement workflow.
//!
//! ```text
//! POST /api/orders/placeorder    place an order        (customer)
//! GET  /api/orders               list orders           (admin: all, customer: own)
//! GET  /api/orders/{id}          fetch one order       (owner or admin)
//! PUT  /api/orders/{id}/status   update order status   (admin)
//! ```
//!
//! ## Placement
//! ```text
//! validate quantities (empty list fails here, before any lookup)
//!   │
//!   ▼  for each line, in request order:
//! fetch product ──► check stock ──► snapshot name+price ──► decrement stock
//!   │
//!   ▼
//! insert order + line items (one transaction)
//! ```
//!
//! Stock decrements are committed per line as the loop runs. A failure on
//! a later line (unknown product, shortfall) aborts the order but does NOT
//! restore stock already taken by earlier lines.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use storefront_core::{
    validation::validate_order_items, CoreError, Money, Order, OrderItem, OrderStatus, Role,
    ValidationError,
};
use storefront_db::{
    repository::{generate_order_id, generate_order_item_id},
    Database, OrderWithOwner,
};

use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    response::ApiResponse,
    routes::products::warn_if_low_stock,
    AppState,
};

// =============================================================================
// Router
// =============================================================================

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/placeorder", post(place_order))
        .route("/", get(list_orders))
        .route("/{id}", get(get_order))
        .route("/{id}/status", put(update_order_status))
}

// =============================================================================
// Request / Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub order_items: Option<Vec<OrderItemRequest>>,
}

#[derive(Debug, Deserialize)]
pub struct OrderItemRequest {
    /// Product ID.
    pub product: Option<String>,
    pub quantity: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

/// An order as returned to clients: owner display fields plus line items
/// with their frozen name and price snapshots.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: String,
    pub user: OrderOwnerView,
    pub order_items: Vec<OrderItemView>,
    pub total_cents: i64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderOwnerView {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemView {
    /// Product ID (may reference a since-deleted product).
    pub product: String,
    /// Name at time of placement.
    pub name: String,
    /// Unit price at time of placement, in cents.
    pub unit_price_cents: i64,
    pub quantity: i64,
}

impl OrderView {
    fn build(order: OrderWithOwner, items: Vec<OrderItem>) -> Self {
        Self {
            id: order.id,
            user: OrderOwnerView {
                id: order.user_id,
                name: order.owner_name,
                email: order.owner_email,
            },
            order_items: items
                .into_iter()
                .map(|item| OrderItemView {
                    product: item.product_id,
                    name: item.name_snapshot,
                    unit_price_cents: item.unit_price_cents,
                    quantity: item.quantity,
                })
                .collect(),
            total_cents: order.total_cents,
            status: order.status,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

// =============================================================================
// Placement Workflow
// =============================================================================

/// A resolved placement line: product ID plus requested quantity.
pub(crate) struct PlacementLine {
    pub product_id: String,
    pub quantity: i64,
}

/// Run the placement workflow for a user and return the stored order ID.
///
/// Quantities are validated up front, then each line is processed in
/// request order: fetch, stock check, snapshot, decrement. The decrement
/// for a line is committed before the next line is examined.
pub(crate) async fn run_placement(
    db: &Database,
    user_id: &str,
    lines: &[PlacementLine],
) -> ApiResult<String> {
    validate_order_items(lines.iter().map(|line| &line.quantity))?;

    let order_id = generate_order_id();
    let mut total = Money::zero();
    let mut items = Vec::with_capacity(lines.len());

    for line in lines {
        let mut product = db
            .products()
            .get_by_id(&line.product_id)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(line.product_id.clone()))?;

        if !product.can_fulfill(line.quantity) {
            return Err(CoreError::InsufficientStock {
                name: product.name,
                available: product.stock,
                requested: line.quantity,
            }
            .into());
        }

        let line_total = product
            .price()
            .checked_mul(line.quantity)
            .and_then(|lt| total.checked_add(lt))
            .ok_or_else(|| ApiError::InvalidInput("Order total overflow".to_string()))?;
        total = line_total;

        items.push(OrderItem {
            id: generate_order_item_id(),
            order_id: order_id.clone(),
            product_id: product.id.clone(),
            name_snapshot: product.name.clone(),
            unit_price_cents: product.price_cents,
            quantity: line.quantity,
        });

        // Committed immediately; not rolled back if a later line fails
        db.products()
            .decrement_stock(&product.id, line.quantity)
            .await?;
        product.stock -= line.quantity;
        warn_if_low_stock(&product);
    }

    let now = Utc::now();
    let order = Order {
        id: order_id.clone(),
        user_id: user_id.to_string(),
        total_cents: total.cents(),
        status: OrderStatus::Pending,
        created_at: now,
        updated_at: now,
    };

    db.orders().insert_with_items(&order, &items).await?;

    info!(
        order_id = %order.id,
        user_id = %order.user_id,
        total_cents = order.total_cents,
        items = items.len(),
        "Order placed"
    );

    Ok(order_id)
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /api/orders/placeorder`
pub async fn place_order(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    Json(req): Json<PlaceOrderRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<OrderView>>)> {
    caller.require_role(Role::Customer)?;

    let mut lines = Vec::new();
    for item in req.order_items.unwrap_or_default() {
        let product_id = item.product.ok_or_else(|| ValidationError::Required {
            field: "product".to_string(),
        })?;
        let quantity = item.quantity.ok_or_else(|| ValidationError::Required {
            field: "quantity".to_string(),
        })?;
        lines.push(PlacementLine {
            product_id,
            quantity,
        });
    }

    let order_id = run_placement(&state.db, &caller.user_id, &lines).await?;
    let view = load_order_view(&state, &order_id).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(view))))
}

/// `GET /api/orders`
///
/// Admins see every order; customers see only their own.
pub async fn list_orders(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<OrderView>>>> {
    let orders = if caller.role.is_admin() {
        state.db.orders().list_all().await?
    } else {
        state.db.orders().list_for_user(&caller.user_id).await?
    };

    let mut views = Vec::with_capacity(orders.len());
    for order in orders {
        let items = state.db.orders().get_items(&order.id).await?;
        views.push(OrderView::build(order, items));
    }

    let count = views.len();
    Ok(Json(ApiResponse::success_with_count(views, count)))
}

/// `GET /api/orders/{id}`
///
/// Existence is checked before ownership, so a customer probing another
/// user's order ID gets 403, while an unknown ID gets 404.
pub async fn get_order(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<OrderView>>> {
    let order = state
        .db
        .orders()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Order not found: {}", id)))?;

    if !caller.role.is_admin() && order.user_id != caller.user_id {
        return Err(ApiError::Forbidden(
            "Not authorized to view this order".to_string(),
        ));
    }

    let items = state.db.orders().get_items(&order.id).await?;
    Ok(Json(ApiResponse::success(OrderView::build(order, items))))
}

/// `PUT /api/orders/{id}/status`
///
/// Accepts exactly `Pending`, `Shipped` or `Delivered` (case-sensitive).
/// Any transition is allowed, including back to `Pending`.
pub async fn update_order_status(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> ApiResult<Json<ApiResponse<OrderView>>> {
    caller.require_role(Role::Admin)?;

    let raw = req.status.ok_or_else(|| ValidationError::Required {
        field: "status".to_string(),
    })?;
    let status = OrderStatus::parse(&raw)
        .ok_or_else(|| ApiError::InvalidInput(format!("Invalid status: {}", raw)))?;

    state.db.orders().update_status(&id, status).await?;
    info!(order_id = %id, status = %raw, "Order status updated");

    let view = load_order_view(&state, &id).await?;
    Ok(Json(ApiResponse::success(view)))
}

// =============================================================================
// Helpers
// =============================================================================

async fn load_order_view(state: &AppState, order_id: &str) -> ApiResult<OrderView> {
    let order = state
        .db
        .orders()
        .get_by_id(order_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Order not found: {}", order_id)))?;
    let items = state.db.orders().get_items(order_id).await?;
    Ok(OrderView::build(order, items))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        admin_caller, customer_caller, seed_product, seed_user, test_state,
    };

    fn line(product_id: &str, quantity: i64) -> PlacementLine {
        PlacementLine {
            product_id: product_id.to_string(),
            quantity,
        }
    }

    #[tokio::test]
    async fn test_placement_decrements_stock_and_totals() {
        let state = test_state().await;
        let user_id = seed_user(&state, "ada@example.com", Role::Customer).await;
        let widget = seed_product(&state, "Widget", 1099, 10).await;

        let order_id = run_placement(&state.db, &user_id, &[line(&widget, 6)])
            .await
            .unwrap();

        let order = state.db.orders().get_by_id(&order_id).await.unwrap().unwrap();
        assert_eq!(order.total_cents, 6 * 1099);
        assert_eq!(order.status, OrderStatus::Pending);

        // stock=10, qty=6 → stock 4, below the default threshold of 5
        let product = state.db.products().get_by_id(&widget).await.unwrap().unwrap();
        assert_eq!(product.stock, 4);
        assert!(product.is_low_stock());
    }

    #[tokio::test]
    async fn test_placement_snapshots_survive_price_change() {
        let state = test_state().await;
        let user_id = seed_user(&state, "ada@example.com", Role::Customer).await;
        let widget = seed_product(&state, "Widget", 1099, 10).await;

        let order_id = run_placement(&state.db, &user_id, &[line(&widget, 2)])
            .await
            .unwrap();

        // Reprice the product after placement
        let mut product = state.db.products().get_by_id(&widget).await.unwrap().unwrap();
        product.price_cents = 9999;
        state.db.products().update(&product).await.unwrap();

        let items = state.db.orders().get_items(&order_id).await.unwrap();
        assert_eq!(items[0].unit_price_cents, 1099);
        assert_eq!(items[0].name_snapshot, "Widget");

        let order = state.db.orders().get_by_id(&order_id).await.unwrap().unwrap();
        assert_eq!(order.total_cents, 2 * 1099);
    }

    #[tokio::test]
    async fn test_placement_insufficient_stock_leaves_stock_unchanged() {
        let state = test_state().await;
        let user_id = seed_user(&state, "ada@example.com", Role::Customer).await;
        let widget = seed_product(&state, "Widget", 1099, 10).await;

        let err = run_placement(&state.db, &user_id, &[line(&widget, 20)])
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
        assert!(err.to_string().contains("Not enough stock"));

        let product = state.db.products().get_by_id(&widget).await.unwrap().unwrap();
        assert_eq!(product.stock, 10);
    }

    #[tokio::test]
    async fn test_placement_failure_keeps_earlier_decrements() {
        let state = test_state().await;
        let user_id = seed_user(&state, "ada@example.com", Role::Customer).await;
        let widget = seed_product(&state, "Widget", 1099, 5).await;

        let err = run_placement(
            &state.db,
            &user_id,
            &[line(&widget, 2), line("missing-product", 1)],
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        // First line's decrement was committed and stays committed
        let product = state.db.products().get_by_id(&widget).await.unwrap().unwrap();
        assert_eq!(product.stock, 3);

        // No order was stored
        let orders = state.db.orders().list_for_user(&user_id).await.unwrap();
        assert!(orders.is_empty());
    }

    #[tokio::test]
    async fn test_placement_rejects_empty_item_list() {
        let state = test_state().await;
        let user_id = seed_user(&state, "ada@example.com", Role::Customer).await;

        let err = run_placement(&state.db, &user_id, &[]).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_placement_rejects_nonpositive_quantity() {
        let state = test_state().await;
        let user_id = seed_user(&state, "ada@example.com", Role::Customer).await;
        let widget = seed_product(&state, "Widget", 1099, 10).await;

        let err = run_placement(&state.db, &user_id, &[line(&widget, 0)])
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));

        let product = state.db.products().get_by_id(&widget).await.unwrap().unwrap();
        assert_eq!(product.stock, 10);
    }

    #[tokio::test]
    async fn test_place_order_requires_customer_role() {
        let state = test_state().await;
        let err = place_order(
            State(state),
            admin_caller(),
            Json(PlaceOrderRequest { order_items: None }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_get_order_enforces_ownership() {
        let state = test_state().await;
        let ada = seed_user(&state, "ada@example.com", Role::Customer).await;
        let bob = seed_user(&state, "bob@example.com", Role::Customer).await;
        let widget = seed_product(&state, "Widget", 1099, 10).await;

        let order_id = run_placement(&state.db, &ada, &[line(&widget, 1)])
            .await
            .unwrap();

        // Owner sees it
        let Json(resp) = get_order(
            State(state.clone()),
            customer_caller(&ada),
            Path(order_id.clone()),
        )
        .await
        .unwrap();
        assert_eq!(resp.data.unwrap().user.email, "ada@example.com");

        // Another customer is refused
        let err = get_order(
            State(state.clone()),
            customer_caller(&bob),
            Path(order_id.clone()),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));

        // Admin sees anything
        let Json(resp) = get_order(State(state.clone()), admin_caller(), Path(order_id))
            .await
            .unwrap();
        assert!(resp.success);

        // Unknown ID is 404, not 403
        let err = get_order(State(state), customer_caller(&bob), Path("nope".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_orders_scoped_by_role() {
        let state = test_state().await;
        let ada = seed_user(&state, "ada@example.com", Role::Customer).await;
        let bob = seed_user(&state, "bob@example.com", Role::Customer).await;
        let widget = seed_product(&state, "Widget", 1099, 10).await;

        run_placement(&state.db, &ada, &[line(&widget, 1)]).await.unwrap();
        run_placement(&state.db, &bob, &[line(&widget, 2)]).await.unwrap();

        let Json(resp) = list_orders(State(state.clone()), customer_caller(&ada))
            .await
            .unwrap();
        assert_eq!(resp.count, Some(1));

        let Json(resp) = list_orders(State(state), admin_caller()).await.unwrap();
        assert_eq!(resp.count, Some(2));
    }

    #[tokio::test]
    async fn test_update_status_valid_and_invalid() {
        let state = test_state().await;
        let ada = seed_user(&state, "ada@example.com", Role::Customer).await;
        let widget = seed_product(&state, "Widget", 1099, 10).await;
        let order_id = run_placement(&state.db, &ada, &[line(&widget, 1)])
            .await
            .unwrap();

        let Json(resp) = update_order_status(
            State(state.clone()),
            admin_caller(),
            Path(order_id.clone()),
            Json(UpdateStatusRequest {
                status: Some("Shipped".to_string()),
            }),
        )
        .await
        .unwrap();
        assert_eq!(resp.data.unwrap().status, OrderStatus::Shipped);

        // Unknown value: 400, status untouched
        let err = update_order_status(
            State(state.clone()),
            admin_caller(),
            Path(order_id.clone()),
            Json(UpdateStatusRequest {
                status: Some("shipped".to_string()),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));

        let order = state.db.orders().get_by_id(&order_id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Shipped);

        // Customers may not touch status
        let err = update_order_status(
            State(state),
            customer_caller(&ada),
            Path(order_id),
            Json(UpdateStatusRequest {
                status: Some("Delivered".to_string()),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }
}
