use crate::errors::ClientError;
use crate::models::{ChatRequest, ChatResponse, ExportResponse, Place};

pub const CHAT_PATH: &str = "/api/chat";
pub const PLACES_PATH: &str = "/api/pois";
pub const EXPORT_PATH: &str = "/api/export";

/// The assistant's HTTP API.
///
/// One call per method: no retries, no timeout. A non-success status must be
/// reported as [`ClientError::Transport`] carrying the raw response body.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn post_chat(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError>;

    async fn fetch_places(&self) -> Result<Vec<Place>, ClientError>;

    async fn fetch_export(&self, session_id: &str) -> Result<ExportResponse, ClientError>;
}
