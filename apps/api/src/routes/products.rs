//! Product catalog endpoints.
//!
//! ```text
//! GET    /api/products            list catalog          (public)
//! GET    /api/products/{id}         fetch one product     (public)
//! POST   /api/products/create       create product        (admin)
//! PUT    /api/products/{id}         update product        (admin)
//! DELETE /api/products/{id}         remove product        (admin)
//! PUT    /api/products/{id}/stock   overwrite stock level (admin)
//! ```
//!
//! Any operation that leaves a product's stock at or below its
//! low-stock threshold emits a warning log line. That advisory is
//! best-effort and never fails the request.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

use storefront_core::{
    validation::{
        validate_description, validate_low_stock_threshold, validate_price_cents,
        validate_product_name, validate_stock,
    },
    Product, Role, ValidationError, DEFAULT_LOW_STOCK_THRESHOLD,
};
use storefront_db::repository::generate_product_id;

use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    response::ApiResponse,
    AppState,
};

// =============================================================================
// Router
// =============================================================================

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_products))
        .route("/create", post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/{id}/stock", put(set_stock))
}

// =============================================================================
// Request Types
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub stock: Option<i64>,
    pub low_stock_threshold: Option<i64>,
}

/// All fields optional; omitted fields are left unchanged.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub stock: Option<i64>,
    pub low_stock_threshold: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SetStockRequest {
    pub stock: Option<i64>,
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /api/products`
pub async fn list_products(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ApiResponse<Vec<Product>>>> {
    let products = state.db.products().list().await?;
    let count = products.len();
    Ok(Json(ApiResponse::success_with_count(products, count)))
}

/// `GET /api/products/{id}`
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Product>>> {
    let product = state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product not found: {}", id)))?;
    Ok(Json(ApiResponse::success(product)))
}

/// `POST /api/products/create`
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    Json(req): Json<CreateProductRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Product>>)> {
    caller.require_role(Role::Admin)?;

    let name = req.name.ok_or_else(|| ValidationError::Required {
        field: "name".to_string(),
    })?;
    let description = req.description.ok_or_else(|| ValidationError::Required {
        field: "description".to_string(),
    })?;
    let price_cents = req.price_cents.ok_or_else(|| ValidationError::Required {
        field: "priceCents".to_string(),
    })?;
    let stock = req.stock.ok_or_else(|| ValidationError::Required {
        field: "stock".to_string(),
    })?;
    let low_stock_threshold = req.low_stock_threshold.unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD);

    validate_product_name(&name)?;
    validate_description(&description)?;
    validate_price_cents(price_cents)?;
    validate_stock(stock)?;
    validate_low_stock_threshold(low_stock_threshold)?;

    // Stored trimmed so " Widget " and "Widget" are the same catalog entry
    let name = name.trim().to_string();

    // Names are unique across the catalog. Checked up front for a clear
    // message; the UNIQUE constraint still backstops races.
    if state.db.products().get_by_name(&name).await?.is_some() {
        return Err(ApiError::Conflict("Product already exists".to_string()));
    }

    let now = Utc::now();
    let product = Product {
        id: generate_product_id(),
        name,
        description,
        price_cents,
        stock,
        low_stock_threshold,
        created_at: now,
        updated_at: now,
    };

    state.db.products().insert(&product).await?;
    info!(product_id = %product.id, name = %product.name, "Product created");
    warn_if_low_stock(&product);

    Ok((StatusCode::CREATED, Json(ApiResponse::success(product))))
}

/// `PUT /api/products/{id}`
///
/// Partial update: only the provided fields change. Every provided field
/// is validated before any of them is applied, so a bad request leaves
/// the product untouched.
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateProductRequest>,
) -> ApiResult<Json<ApiResponse<Product>>> {
    caller.require_role(Role::Admin)?;

    let mut product = state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product not found: {}", id)))?;

    if let Some(name) = &req.name {
        validate_product_name(name)?;
    }
    if let Some(description) = &req.description {
        validate_description(description)?;
    }
    if let Some(price_cents) = req.price_cents {
        validate_price_cents(price_cents)?;
    }
    if let Some(stock) = req.stock {
        validate_stock(stock)?;
    }
    if let Some(threshold) = req.low_stock_threshold {
        validate_low_stock_threshold(threshold)?;
    }

    if let Some(name) = req.name {
        let name = name.trim().to_string();
        if name != product.name
            && state.db.products().get_by_name(&name).await?.is_some()
        {
            return Err(ApiError::Conflict("Product already exists".to_string()));
        }
        product.name = name;
    }
    if let Some(description) = req.description {
        product.description = description;
    }
    if let Some(price_cents) = req.price_cents {
        product.price_cents = price_cents;
    }
    if let Some(stock) = req.stock {
        product.stock = stock;
    }
    if let Some(threshold) = req.low_stock_threshold {
        product.low_stock_threshold = threshold;
    }

    state.db.products().update(&product).await?;
    info!(product_id = %product.id, "Product updated");
    warn_if_low_stock(&product);

    // Re-read so the response carries the stored updated_at
    let product = state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product not found: {}", id)))?;
    Ok(Json(ApiResponse::success(product)))
}

/// `DELETE /api/products/{id}`
///
/// Hard delete. Existing order lines keep their name and price snapshots,
/// so order history survives the removal.
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<()>>> {
    caller.require_role(Role::Admin)?;

    state.db.products().delete(&id).await?;
    info!(product_id = %id, "Product removed");
    Ok(Json(ApiResponse::message("Product removed")))
}

/// `PUT /api/products/{id}/stock`
///
/// Overwrites the stock level; all other fields are untouched. Omitting
/// `stock` keeps the current level.
pub async fn set_stock(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<SetStockRequest>,
) -> ApiResult<Json<ApiResponse<Product>>> {
    caller.require_role(Role::Admin)?;

    let product = state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product not found: {}", id)))?;

    let stock = match req.stock {
        Some(stock) => {
            validate_stock(stock)?;
            stock
        }
        None => product.stock,
    };

    state.db.products().set_stock(&id, stock).await?;
    info!(product_id = %id, stock, "Stock level set");

    let product = state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product not found: {}", id)))?;
    warn_if_low_stock(&product);

    Ok(Json(ApiResponse::success(product)))
}

// =============================================================================
// Low-Stock Advisory
// =============================================================================

/// Emit the low-stock advisory if the product sits at or below its
/// threshold. Called after every stock-affecting operation.
pub(crate) fn warn_if_low_stock(product: &Product) {
    if product.is_low_stock() {
        warn!(
            product = %product.name,
            stock = product.stock,
            threshold = product.low_stock_threshold,
            "Low stock alert"
        );
    }
}

// =============================================================================
// Tests
// =============================================================================
