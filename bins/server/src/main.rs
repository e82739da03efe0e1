//! Rentbook API Server
//!
//! Main entry point for the Rentbook backend service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rentbook_api::{AppState, create_router};
use rentbook_db::{HeadRepository, connect_with};
use rentbook_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rentbook=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;

    // Connect to database
    let db = connect_with(&config.database).await?;
    info!("Connected to database");

    // Postings need the system heads
    let created = HeadRepository::new(db.clone()).ensure_system_heads().await?;
    info!(
        created,
        currency = %config.billing.currency,
        due_day = config.billing.due_day,
        "Chart of accounts ready"
    );

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        billing: Arc::new(config.billing.clone()),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
