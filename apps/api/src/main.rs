//! API server entry point.
//!
//! Startup order: logging → config → database (with migrations) →
//! router → serve until ctrl-c / SIGTERM.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use storefront_api::{config::ApiConfig, routes, AppState};
use storefront_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let config = ApiConfig::load()?;
    info!(port = config.http_port, db = %config.database_path, "Starting API server");

    let db = Database::new(DbConfig::new(&config.database_path)).await?;
    info!("Database ready");

    let port = config.http_port;
    let state = Arc::new(AppState::new(db, config));
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Listening on 0.0.0.0:{}", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolve on ctrl-c or SIGTERM so in-flight requests can drain.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install ctrl-c handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl-c, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
