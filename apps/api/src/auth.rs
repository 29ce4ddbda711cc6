//! Authentication: JWT issuance/validation, password hashing, and the
//! request extractor that guards protected routes.
//!
//! ## Flow
//! ```text
//! POST /api/auth/register ──► argon2 hash ──► INSERT user ──► sign JWT
//! POST /api/auth/login    ──► argon2 verify ─────────────► sign JWT
//!
//! Protected request ──► Authorization: Bearer <token>
//!                   ──► AuthUser extractor validates signature + expiry
//!                   ──► handler checks role where required
//! ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::FromRequestParts, http::request::Parts};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use storefront_core::Role;

use crate::{error::ApiError, AppState};

// =============================================================================
// Claims
// =============================================================================

/// JWT claims carried by every issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID.
    pub sub: String,
    /// Role at time of issuance.
    pub role: Role,
    /// Issued-at (unix seconds).
    pub iat: i64,
    /// Expiry (unix seconds).
    pub exp: i64,
    /// Unique token ID.
    pub jti: String,
}

// =============================================================================
// JWT Manager
// =============================================================================

/// Signs and validates JWTs with a shared HMAC secret.
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime_secs: i64,
}

impl JwtManager {
    pub fn new(secret: &str, lifetime_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            lifetime_secs,
        }
    }

    /// Issue a token for the given user.
    pub fn generate_token(&self, user_id: &str, role: Role) -> Result<String, ApiError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.lifetime_secs)).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ApiError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Validate a token and return its claims. Expired or tampered tokens
    /// are rejected with 401.
    pub fn validate_token(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| ApiError::Unauthenticated("Invalid or expired token".to_string()))
    }
}

// =============================================================================
// Password Hashing
// =============================================================================

/// Hash a password with argon2id and a random salt.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {}", e)))
}

/// Verify a password against a stored argon2 hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, ApiError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| ApiError::Internal(format!("Invalid password hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

// =============================================================================
// Request Extractor
// =============================================================================

/// The authenticated caller, extracted from the `Authorization` header.
///
/// Handlers that take an `AuthUser` parameter reject requests without a
/// valid bearer token before the handler body runs.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub role: Role,
}

impl AuthUser {
    /// Reject the request unless the caller's role matches `required`.
    ///
    /// Role checks are exact: an admin token does not satisfy a
    /// customer-only route and vice versa.
    pub fn require_role(&self, required: Role) -> Result<(), ApiError> {
        if self.role.permits(required) {
            Ok(())
        } else {
            Err(ApiError::Forbidden(format!(
                "Role '{}' is not authorized to access this route",
                self.role.as_str()
            )))
        }
    }
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                ApiError::Unauthenticated("Not authorized, no token provided".to_string())
            })?;

        let token = extract_bearer_token(header)?;
        let claims = state.jwt.validate_token(token)?;

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}

/// Pull the raw token out of an `Authorization: Bearer <token>` header.
fn extract_bearer_token(header: &str) -> Result<&str, ApiError> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::Unauthenticated("Not authorized, no token provided".to_string()))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_roundtrip() {
        let jwt = JwtManager::new("test-secret", 3600);
        let token = jwt.generate_token("user-1", Role::Admin).unwrap();
        let claims = jwt.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.role, Role::Admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let jwt = JwtManager::new("secret-a", 3600);
        let other = JwtManager::new("secret-b", 3600);
        let token = jwt.generate_token("user-1", Role::Customer).unwrap();
        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn test_password_hash_and_verify() {
        let hash = hash_password("hunter42").unwrap();
        assert_ne!(hash, "hunter42");
        assert!(verify_password("hunter42", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn test_bearer_extraction() {
        assert_eq!(extract_bearer_token("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
        assert!(extract_bearer_token("Basic abc").is_err());
        assert!(extract_bearer_token("Bearer ").is_err());
    }

    #[test]
    fn test_require_role_exact_match() {
        let admin = AuthUser {
            user_id: "u1".to_string(),
            role: Role::Admin,
        };
        assert!(admin.require_role(Role::Admin).is_ok());
        assert!(matches!(
            admin.require_role(Role::Customer),
            Err(ApiError::Forbidden(_))
        ));
    }
}
