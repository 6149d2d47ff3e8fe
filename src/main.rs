use anyhow::Context;
use bookstore::{init_app_state, init_router};
use bookstore_db::run_migrations;
use bookstore_observability::{LogSettings, init_tracing};
use dotenvy::dotenv;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing(&LogSettings::from_env());

    let state = init_app_state()
        .await
        .context("Failed to initialise application state")?;
    run_migrations(&state.db)
        .await
        .context("Failed to run database migrations")?;

    let address = state.server_config.bind_address();
    let app = init_router(state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    tracing::info!(%address, "Server running");
    tracing::info!("Swagger UI available at http://{address}/swagger-ui");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}
