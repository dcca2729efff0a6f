// Main entry point for API server

use anyhow::{Context, Result};
use scout_core::{server::build_app, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,scout_core=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting NYC Civic Scout API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(config = ?config, "Configuration loaded");

    if config.openai_api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY not set - impact analysis will use keyword fallback");
    }
    if config.google_maps_api_key.is_none() {
        tracing::info!("GOOGLE_MAPS_API_KEY not set - geocoding via Nominatim");
    }

    // Build application
    let app = build_app(config.build_server_deps());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Events: http://localhost:{}/api/events", config.port);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
