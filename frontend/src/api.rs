use gloo_net::http::{Request, Response};
use wasm_bindgen::JsValue;

use ktm_planner_core::ClientError;
use ktm_planner_core::models::{ChatRequest, ChatResponse, ExportResponse, Place, decode_catalog};
use ktm_planner_core::transport::{CHAT_PATH, EXPORT_PATH, PLACES_PATH, Transport};

/// Global set by the host's `/config.js`.
const API_BASE_GLOBAL: &str = "__ktmApiBase";

/// Base URL of the assistant API. Empty means same origin.
pub fn api_base() -> String {
    web_sys::window()
        .and_then(|w| js_sys::Reflect::get(&w, &JsValue::from_str(API_BASE_GLOBAL)).ok())
        .and_then(|v| v.as_string())
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .unwrap_or_default()
}

/// The assistant's HTTP API over `fetch`.
#[derive(Clone, Debug)]
pub struct GlooTransport {
    base: String,
}

impl GlooTransport {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    pub fn from_window() -> Self {
        Self::new(api_base())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }
}

/// Passes 2xx responses through; anything else becomes an error carrying the raw body.
async fn ensure_ok(resp: Response) -> Result<Response, ClientError> {
    if resp.ok() {
        return Ok(resp);
    }
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    Err(ClientError::transport(status, body))
}

fn network(e: gloo_net::Error) -> ClientError {
    ClientError::Network(e.to_string())
}

fn parse(e: gloo_net::Error) -> ClientError {
    ClientError::Decode(e.to_string())
}

impl Transport for GlooTransport {
    async fn post_chat(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError> {
        let resp = Request::post(&self.url(CHAT_PATH))
            .json(request)
            .map_err(|e| ClientError::Decode(format!("Serialize error: {e}")))?
            .send()
            .await
            .map_err(network)?;

        ensure_ok(resp).await?.json::<ChatResponse>().await.map_err(parse)
    }

    async fn fetch_places(&self) -> Result<Vec<Place>, ClientError> {
        let resp = Request::get(&self.url(PLACES_PATH)).send().await.map_err(network)?;

        let body = ensure_ok(resp).await?.json::<serde_json::Value>().await.map_err(parse)?;
        Ok(decode_catalog(&body))
    }

    async fn fetch_export(&self, session_id: &str) -> Result<ExportResponse, ClientError> {
        let resp = Request::get(&self.url(EXPORT_PATH))
            .query([("session_id", session_id)])
            .send()
            .await
            .map_err(network)?;

        ensure_ok(resp).await?.json::<ExportResponse>().await.map_err(parse)
    }
}
