use axum::Json;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::config::HostConfig;

/// Settings the browser needs before the client starts.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_base: String,
}

impl From<&HostConfig> for ClientConfig {
    fn from(config: &HostConfig) -> Self {
        Self { api_base: config.api_base.clone() }
    }
}

#[derive(Serialize)]
pub struct Health {
    pub ok: bool,
}

/// `window.__ktmApiBase = "...";` with the value escaped as a JS string literal.
pub fn render_config_script(config: &ClientConfig) -> String {
    let literal = serde_json::to_string(&config.api_base).unwrap_or_else(|_| "\"\"".to_string());
    // `</script>` must not appear if the script is ever inlined.
    let literal = literal.replace("</", "<\\/");
    format!("window.__ktmApiBase = {literal};\n")
}

/// GET `/config.js`
pub async fn config_script_handler(State(config): State<ClientConfig>) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "application/javascript; charset=utf-8"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        render_config_script(&config),
    )
}

/// GET `/health`
pub async fn health_handler() -> Json<Health> {
    Json(Health { ok: true })
}
