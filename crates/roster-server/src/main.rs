//! Roster Server — application entry point.

use anyhow::Context;
use roster_db::DbManager;
use roster_server::{AppConfig, AppState, build_router};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("roster=info".parse()?))
        .json()
        .init();

    tracing::info!("Starting Roster server...");

    let config = AppConfig::from_env().context("Failed to load configuration")?;

    let db = DbManager::connect(&config.db)
        .await
        .context("Failed to connect to SurrealDB")?;
    roster_db::run_migrations(db.client())
        .await
        .context("Failed to run migrations")?;

    let app = build_router(AppState::new(db));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("Roster server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
