mod config;
mod errors;
mod routes;

use tracing::info;

use crate::config::HostConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (development convenience)
    dotenvy::dotenv().ok();

    // Initialise tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ktm_trip_planner=debug,tower_http=debug".into()),
        )
        .init();

    // ── Configuration ─────────────────────────────────────────────────────────
    let config = HostConfig::from_env()?;
    if let Err(e) = config.check_static_dir() {
        tracing::warn!("{e}; only /config.js and /health will respond");
    }

    if config.api_base.is_empty() {
        info!("Assistant API expected on the same origin");
    } else {
        info!("Assistant API at {}", config.api_base);
    }

    // ── Router ────────────────────────────────────────────────────────────────
    let app = routes::router(&config);

    // ── Listen ────────────────────────────────────────────────────────────────
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{addr}/");

    axum::serve(listener, app).await?;
    Ok(())
}
