//! # Storefront API Server
//!
//! REST backend for the storefront: accounts, product catalog, and
//! order placement with immediate stock decrements.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Request Flow                                 │
//! │                                                                     │
//! │  HTTP request                                                       │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  Router (routes/) ──► AuthUser extractor (auth.rs, protected only)  │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  Handler ──► validation (storefront-core) ──► repository            │
//! │       │                                        (storefront-db)      │
//! │       ▼                                                             │
//! │  ApiResponse envelope / ApiError → status + JSON                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod response;
pub mod routes;

use storefront_db::Database;

use auth::JwtManager;
use config::ApiConfig;

// =============================================================================
// Application State
// =============================================================================

/// Shared state handed to every handler via `Arc`.
pub struct AppState {
    pub db: Database,
    pub config: ApiConfig,
    pub jwt: JwtManager,
}

impl AppState {
    pub fn new(db: Database, config: ApiConfig) -> Self {
        let jwt = JwtManager::new(&config.jwt_secret, config.jwt_lifetime_secs);
        Self { db, config, jwt }
    }
}

// =============================================================================
// Test Support
// =============================================================================
