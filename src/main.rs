// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use anyhow::Context;
use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::EnvFilter;

use crate::application::device_service::DeviceService;
use crate::application::narrative_service::NarrativeService;
use crate::application::report_service::ReportService;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::device_client::HttpDeviceGateway;
use crate::infrastructure::ollama_client::OllamaClient;
use crate::presentation::app_state::AppState;
use crate::presentation::routes::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_app_config()?;

    // Create adapters (infrastructure layer)
    let gateway = Arc::new(HttpDeviceGateway::new(&config.device));
    let generator = Arc::new(OllamaClient::new(&config.narrative));

    // Create services (application layer)
    let device_service = DeviceService::new(gateway, config.device.mock);
    let narrative_service = NarrativeService::new(generator);
    let report_service = ReportService::new(
        narrative_service.clone(),
        config.report.archive_dir(),
        config.narrative.model_label.clone(),
    );

    let state = Arc::new(AppState {
        device_service,
        narrative_service,
        report_service,
    });

    // Build router (presentation layer)
    let router = build_router(state, &config.server.static_dir);

    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("invalid bind address {:?}", config.server.bind))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("cannot bind {}", addr))?;

    tracing::info!("Starting Pran-Bot terminal on http://{}", addr);
    tracing::info!(
        "Robot at {}{}, model {} via {}",
        config.device.base_url,
        if config.device.mock { " (mock mode)" } else { "" },
        config.narrative.model,
        config.narrative.generate_url
    );
    if let Some(dir) = config.report.archive_dir() {
        tracing::info!("Archiving report data under {}", dir.display());
    }

    axum::serve(listener, router).await?;

    Ok(())
}
