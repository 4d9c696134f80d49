//! Alianza API Server
//!
//! Main entry point for the commission backend service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use alianza_api::{AppState, create_router};
use alianza_db::connect_with_pool;
use alianza_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "alianza=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Validate the business timezone
    let tz = config.business.tz()?;
    info!(timezone = %tz, "Business calendar configured");

    // Connect to database
    let db = connect_with_pool(
        &config.database.url,
        config.database.min_connections,
        config.database.max_connections,
    )
    .await?;
    info!("Connected to database");

    let state = AppState {
        db: Arc::new(db),
        business: Arc::new(config.business.clone()),
    };

    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
