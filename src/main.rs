//! Main entry point for the ML Gateway

use ml_gateway::{
    api,
    backend::{await_ready, ReadinessState, TritonClient},
    config::Settings,
    AppState,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Load configuration first so logging can follow it
    let settings = Settings::load()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.logging.level.clone()));

    if settings.logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }

    info!(
        backend = %settings.backend.base_url,
        "Starting ML Gateway"
    );

    let backend = Arc::new(TritonClient::new(&settings.backend)?);

    // Startup barrier: refuse to serve until the backend answers its
    // readiness probe. This runs exactly once per process.
    if let Err(e) = await_ready(backend.as_ref(), &settings.readiness).await {
        error!(error = %e, "Backend readiness gate failed, exiting");
        return Err(e.into());
    }

    let addr = format!("{}:{}", settings.server.host, settings.server.port);

    let app_state = Arc::new(AppState {
        settings,
        backend,
        readiness: ReadinessState::Ready,
    });

    let app = api::routes::create_router(app_state);

    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
