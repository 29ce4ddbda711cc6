//! HTTP routing.
//!
//! All endpoints live under `/api`. Anything else falls through to a
//! JSON 404.

use axum::{http::StatusCode, Json, Router};
use std::sync::Arc;

use crate::{response::ApiResponse, AppState};

pub mod auth;
pub mod orders;
pub mod products;

/// Build the full application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api/auth", auth::router())
        .nest("/api/products", products::router())
        .nest("/api/orders", orders::router())
        .fallback(route_not_found)
        .with_state(state)
}

/// Fallback for unknown paths, keeping the JSON envelope.
async fn route_not_found() -> (StatusCode, Json<ApiResponse<()>>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::error("Route not found")),
    )
}
