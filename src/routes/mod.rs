pub mod config_routes;

use axum::{Router, routing::get};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::config::HostConfig;
use crate::routes::config_routes::{ClientConfig, config_script_handler, health_handler};

/// `/config.js` and `/health`, with the frontend bundle behind them. Unknown
/// paths get `index.html` so the client can boot from any URL.
pub fn router(config: &HostConfig) -> Router {
    let index = config.static_dir.join("index.html");
    let bundle = ServeDir::new(&config.static_dir).fallback(ServeFile::new(index));

    Router::new()
        .route("/config.js", get(config_script_handler))
        .route("/health", get(health_handler))
        .fallback_service(bundle)
        .layer(TraceLayer::new_for_http())
        .with_state(ClientConfig::from(config))
}
