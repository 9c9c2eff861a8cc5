use orbitrack_backend::config::{self, CONFIG_PATH};
use orbitrack_backend::module::propagation::Sgp4Factory;
use orbitrack_backend::module::tracking::{
    CatalogStore, HttpElementSource, Ingestor, SystemClock, TrackingEngine,
};
use orbitrack_backend::service;

use anyhow::{Context, Result};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = config::read_config(CONFIG_PATH)?;

    // Initialize logging
    let _logging_guard = orbitrack_backend::logging::init_logging(
        &config.log_dir,
        "orbitrack-backend",
        &config.log_level,
        config.log_retention(),
    )?;

    tracing::info!("Orbitrack Backend starting...");
    if !std::path::Path::new(CONFIG_PATH).exists() {
        tracing::warn!("No {} found, running with default configuration", CONFIG_PATH);
    }
    tracing::info!("Server will listen on {}", config.server_address());

    let clock = Arc::new(SystemClock);
    let source = Arc::new(HttpElementSource::new(config.fetch_timeout())?);
    let ingestor = Ingestor::new(
        source,
        Arc::new(Sgp4Factory),
        config.source_groups.clone(),
        clock.clone(),
    )
    .with_record_limit(config.record_limit);
    let store = CatalogStore::new(ingestor, clock.clone());
    let engine = TrackingEngine::new(store, clock, config.refresh_interval());

    // A failed first load is retried lazily by the next query
    if let Err(e) = engine.initialize().await {
        tracing::error!("Initial catalog load failed: {}", e);
    }

    let app = service::router(engine, config.enable_cors);

    let listener = tokio::net::TcpListener::bind(config.server_address())
        .await
        .context(format!("Failed to bind {}", config.server_address()))?;
    tracing::info!("HTTP server starting on {}", config.server_address());
    axum::serve(listener, app).await?;

    Ok(())
}
