use anyhow::Context;
use dotenvy::dotenv;

use helmsman::helmsman_config::ServerConfig;
use helmsman::helmsman_observability::{init_metrics, init_tracing, shutdown_tracer};
use helmsman::router::init_router;
use helmsman::state::init_app_state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing()?;

    let metrics = init_metrics()?;
    let state = init_app_state().await?;
    let app = init_router(state, metrics);

    let address = ServerConfig::from_env().address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    tracing::info!(%address, "Server listening");
    tracing::info!("API docs at http://{}/scalar", address);

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error");

    shutdown_tracer();
    result
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}
