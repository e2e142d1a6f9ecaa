//! pkh-hub - Product Knowledge Hub service
//!
//! Accepts evidence documents from independent extractors, stores them
//! exactly once, and maintains one merged canonical record per product
//! key. Extractors push documents over HTTP; downstream consumers read
//! the canonical views.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pkh_common::config::HubConfig;
use pkh_hub::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting pkh-hub (Product Knowledge Hub)");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Resolve configuration: environment > TOML file > defaults
    let config = HubConfig::resolve()?;
    info!("Database: {}", config.database_path.display());
    if config.source_priorities.is_empty() {
        info!("No source-priority table configured; ranking is recency-only");
    } else {
        info!(
            sources = config.source_priorities.len(),
            "Source-priority table loaded"
        );
    }

    // Open or create the database and apply the schema
    let db_pool = pkh_hub::db::init_database_pool(&config.database_path).await?;
    info!("Database connection established");

    let state = AppState::new(db_pool, config.source_priorities);
    let app = pkh_hub::build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!("Listening on http://{}", config.bind_address);
    info!("Health check: http://{}/health", config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
