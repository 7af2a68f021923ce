//! Signalyx API server.
//!
//! Run with: cargo run -p signalyx-web

use std::net::SocketAddr;
use std::path::Path;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::var("SIGNALYX_CONFIG").unwrap_or_else(|_| "signalyx.toml".into());
    let config = signalyx_config::AppConfig::load(Some(Path::new(&config_path)))?;

    let pool = signalyx_db::connect(&config.database.url, config.database.max_connections).await?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let state = signalyx_web::state::AppState::new(pool, config)?;
    let app = signalyx_web::router::build_router(state);

    tracing::info!("Signalyx listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
