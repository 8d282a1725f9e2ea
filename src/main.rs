use dotenv::dotenv;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

use papi_ghl_backend::{build_router, config::AppConfig, shutdown::shutdown_signal, state::AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if available
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env();
    let port = config.port;
    let mode = config.mode;

    let state = AppState::from_config(config).await?;
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, %mode, "server listening");
    tracing::info!("   - Config page:   http://{}/config", addr);
    tracing::info!("   - Payment page:  http://{}/payment", addr);
    tracing::info!("   - Query:         http://{}/query", addr);
    tracing::info!("   - Health check:  http://{}/api/test", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
