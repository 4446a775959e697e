//! Donor registry server

use anyhow::Result;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use donor_registry::{
    api::{self, AppState},
    config::Config,
    db,
    services::MemorySessionStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "donor_registry=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting donor registry...");

    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;
    config.validate()?;
    tracing::info!("Configuration loaded");

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    db::ping(&pool).await?;
    tracing::info!("Database connected: {}", config.database.url);

    // Run migrations
    let pending = db::migrations::pending_count(&pool).await?;
    let applied = db::migrations::run_migrations(&pool).await?;
    tracing::info!(pending, applied, "Database migrations completed");

    // Build application state
    let state = AppState::new(pool, config.admin.clone(), MemorySessionStore::boxed());

    // Build router
    let app = api::build_router(state, &config.server.cors_origin, &config.web.path);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
