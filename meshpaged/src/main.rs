mod config;
mod snapshot;
mod view;
mod filter;
mod api;

use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use anyhow::{Context, Result};
use shared::types::FilterSnapshot;
use crate::config::Config;
use crate::filter::controller::FilterController;
use crate::view::MeshView;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("meshpaged=info"))
        )
        .init();

    tracing::info!("Starting meshpaged");

    // Load config
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/etc/meshpage/meshpaged.toml".to_string());

    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path))?;

    tracing::info!("Loaded config from {}", config_path);

    // Build the view once from the snapshot
    let snapshot = snapshot::load(&config.snapshot.path)?;
    let view = MeshView::build(&snapshot, &config.view)?;

    // Filter state is published through a watch channel
    let (filter_tx, filter_rx) = watch::channel(FilterSnapshot::default());
    let filter = FilterController::new(view.index.clone(), filter_tx, config.filter.quiet_period());

    let settings = api::routes::ConfigResponse {
        domain_suffix: config.view.domain_suffix.clone(),
        debounce_ms: config.filter.debounce_ms,
        buckets: config.view.ladder()?.labels().map(str::to_string).collect(),
    };

    let app_state = api::routes::AppState {
        view: Arc::new(view),
        filter: Arc::new(filter),
        filter_rx,
        settings: Arc::new(settings),
    };
    let app = api::routes::router(app_state);

    // Bind HTTP server
    let listener = tokio::net::TcpListener::bind(&config.api.listen)
        .await
        .with_context(|| format!("Failed to bind to {}", config.api.listen))?;

    tracing::info!("API listening on {}", config.api.listen);

    // Run server with graceful shutdown
    let cancel = CancellationToken::new();
    let server_cancel = cancel.clone();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async move { server_cancel.cancelled().await })
            .await
        {
            tracing::error!("Server error: {}", e);
        }
    });

    // Wait for shutdown signal
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl-c")?;

    tracing::info!("Shutdown signal received");

    cancel.cancel();
    if let Err(e) = server_handle.await {
        tracing::error!("Server task failed: {}", e);
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
