//! Registration and login endpoints.
//!
//! ```text
//! POST /api/auth/register   create account, returns JWT (201)
//! POST /api/auth/login      verify credentials, returns JWT (200)
//! ```

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use storefront_core::{
    validation::{validate_email, validate_password},
    Role, User, ValidationError,
};
use storefront_db::repository::generate_user_id;

use crate::{
    auth::{hash_password, verify_password},
    error::{ApiError, ApiResult},
    response::ApiResponse,
    AppState,
};

// =============================================================================
// Router
// =============================================================================

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

// =============================================================================
// Request / Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// Optional; defaults to `customer`.
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Public view of a user account (no password hash).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthData {
    pub token: String,
    pub user: UserView,
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /api/auth/register`
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<AuthData>>)> {
    let name = required(req.name, "name")?;
    let email = required(req.email, "email")?;
    let password = required(req.password, "password")?;

    validate_email(&email)?;
    validate_password(&password)?;

    let role = match req.role {
        Some(raw) => Role::parse(&raw)
            .ok_or_else(|| ApiError::InvalidInput(format!("Invalid role: {}", raw)))?,
        None => Role::default(),
    };

    if state.db.users().get_by_email(&email).await?.is_some() {
        return Err(ApiError::Conflict("User already exists".to_string()));
    }

    let user = User {
        id: generate_user_id(),
        name,
        email,
        password_hash: hash_password(&password)?,
        role,
        created_at: Utc::now(),
    };

    state.db.users().insert(&user).await?;
    let token = state.jwt.generate_token(&user.id, user.role)?;

    info!(user_id = %user.id, role = %user.role.as_str(), "User registered");

    let data = AuthData {
        token,
        user: UserView::from(&user),
    };
    Ok((StatusCode::CREATED, Json(ApiResponse::success(data))))
}

/// `POST /api/auth/login`
///
/// A missing account and a wrong password produce the same error so the
/// endpoint does not leak which emails are registered.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<ApiResponse<AuthData>>> {
    let email = required(req.email, "email")?;
    let password = required(req.password, "password")?;

    let user = state
        .db
        .users()
        .get_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::Unauthenticated("Invalid email or password".to_string()))?;

    if !verify_password(&password, &user.password_hash)? {
        return Err(ApiError::Unauthenticated(
            "Invalid email or password".to_string(),
        ));
    }

    let token = state.jwt.generate_token(&user.id, user.role)?;

    info!(user_id = %user.id, "User logged in");

    let data = AuthData {
        token,
        user: UserView::from(&user),
    };
    Ok(Json(ApiResponse::success(data)))
}

// =============================================================================
// Helpers
// =============================================================================

/// Unwrap a request field, rejecting absent or blank values.
fn required(value: Option<String>, field: &str) -> ApiResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ValidationError::Required {
            field: field.to_string(),
        }
        .into()),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_state;

    fn register_req(email: &str, role: Option<&str>) -> RegisterRequest {
        RegisterRequest {
            name: Some("Ada".to_string()),
            email: Some(email.to_string()),
            password: Some("hunter42".to_string()),
            role: role.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_register_defaults_to_customer() {
        let state = test_state().await;
        let (status, Json(resp)) = register(
            State(state.clone()),
            Json(register_req("ada@example.com", None)),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        let data = resp.data.unwrap();
        assert_eq!(data.user.role, Role::Customer);
        assert!(!data.token.is_empty());
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let state = test_state().await;
        register(
            State(state.clone()),
            Json(register_req("ada@example.com", None)),
        )
        .await
        .unwrap();

        let err = register(
            State(state.clone()),
            Json(register_req("ada@example.com", None)),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_register_rejects_unknown_role() {
        let state = test_state().await;
        let err = register(
            State(state),
            Json(register_req("ada@example.com", Some("superuser"))),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_login_roundtrip() {
        let state = test_state().await;
        register(
            State(state.clone()),
            Json(register_req("ada@example.com", Some("admin"))),
        )
        .await
        .unwrap();

        let Json(resp) = login(
            State(state.clone()),
            Json(LoginRequest {
                email: Some("ada@example.com".to_string()),
                password: Some("hunter42".to_string()),
            }),
        )
        .await
        .unwrap();
        let data = resp.data.unwrap();
        assert_eq!(data.user.role, Role::Admin);

        // Token validates against the same manager
        let claims = state.jwt.validate_token(&data.token).unwrap();
        assert_eq!(claims.sub, data.user.id);
    }

    #[tokio::test]
    async fn test_login_wrong_password_rejected() {
        let state = test_state().await;
        register(
            State(state.clone()),
            Json(register_req("ada@example.com", None)),
        )
        .await
        .unwrap();

        let err = login(
            State(state.clone()),
            Json(LoginRequest {
                email: Some("ada@example.com".to_string()),
                password: Some("wrong-password".to_string()),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated(_)));

        let err = login(
            State(state),
            Json(LoginRequest {
                email: Some("nobody@example.com".to_string()),
                password: Some("hunter42".to_string()),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated(_)));
    }
}
