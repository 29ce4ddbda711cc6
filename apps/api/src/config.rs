//! Server configuration loaded from environment variables.
//!
//! Every setting has a development default so `cargo run` works out of
//! the box. Production deployments are expected to set `JWT_SECRET` at
//! minimum.

use thiserror::Error;

// =============================================================================
// Errors
// =============================================================================

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },
}

// =============================================================================
// Configuration
// =============================================================================

/// Runtime configuration for the API server.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// TCP port the HTTP server binds to.
    pub http_port: u16,
    /// Path to the SQLite database file.
    pub database_path: String,
    /// Secret used to sign and verify JWTs.
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub jwt_lifetime_secs: i64,
}

impl ApiConfig {
    /// Load configuration from environment variables, falling back to
    /// development defaults.
    ///
    /// | Variable            | Default            |
    /// |---------------------|--------------------|
    /// | `HTTP_PORT`         | `5000`             |
    /// | `DATABASE_PATH`     | `./storefront.db`  |
    /// | `JWT_SECRET`        | dev-only secret    |
    /// | `JWT_LIFETIME_SECS` | `604800` (7 days)  |
    pub fn load() -> Result<Self, ConfigError> {
        let http_port = match std::env::var("HTTP_PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                var: "HTTP_PORT".to_string(),
                message: e.to_string(),
            })?,
            Err(_) => 5000,
        };

        let database_path = std::env::var("DATABASE_PATH")
            .unwrap_or_else(|_| "./storefront.db".to_string());

        let jwt_secret = std::env::var("JWT_SECRET")
            .unwrap_or_else(|_| "dev-secret-change-in-production".to_string());

        let jwt_lifetime_secs = match std::env::var("JWT_LIFETIME_SECS") {
            Ok(raw) => raw.parse::<i64>().map_err(|e| ConfigError::InvalidValue {
                var: "JWT_LIFETIME_SECS".to_string(),
                message: e.to_string(),
            })?,
            Err(_) => 604_800,
        };

        if jwt_lifetime_secs <= 0 {
            return Err(ConfigError::InvalidValue {
                var: "JWT_LIFETIME_SECS".to_string(),
                message: "must be positive".to_string(),
            });
        }

        Ok(Self {
            http_port,
            database_path,
            jwt_secret,
            jwt_lifetime_secs,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ApiConfig {
        ApiConfig {
            http_port: 0,
            database_path: ":memory:".to_string(),
            jwt_secret: "test-secret".to_string(),
            jwt_lifetime_secs: 3600,
        }
    }

    #[test]
    fn test_config_fields() {
        let config = test_config();
        assert_eq!(config.http_port, 0);
        assert_eq!(config.jwt_lifetime_secs, 3600);
    }
}
