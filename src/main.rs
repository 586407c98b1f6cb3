//! canvas-gateway server entry point.
//!
//! Starts the Axum HTTP server with the REST surface and the `/ws`
//! session endpoint.

use tracing_subscriber::EnvFilter;

use canvas_gateway::app_state::AppState;
use canvas_gateway::config::GatewayConfig;
use canvas_gateway::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = GatewayConfig::from_env().map_err(|e| anyhow::anyhow!(e.to_string()))?;
    tracing::info!(addr = %config.listen_addr, "starting canvas-gateway");

    // Build application state and router
    let app_state = AppState::new(&config);
    let app = router(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
