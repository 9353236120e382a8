use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use ktm_planner_core::map::HeadlessSurface;
use ktm_planner_core::models::{ChatRequest, ChatResponse, ExportResponse, Place};
use ktm_planner_core::storage::{ClientStorage, MemoryStore};
use ktm_planner_core::transport::Transport;
use ktm_planner_core::{ClientError, ClientSession, Controller};
use serde_json::Value;

pub type TestController = Controller<ScriptedTransport, HeadlessSurface, MemoryStore>;

/// One canned chat reply. `delay` is how many times the call yields to the
/// executor before answering, to make responses overtake each other.
pub struct Reply {
    pub delay: usize,
    pub result: Result<ChatResponse, ClientError>,
}

/// Plays back scripted responses and records what was sent.
#[derive(Default)]
pub struct ScriptedTransport {
    chat: RefCell<VecDeque<Reply>>,
    places: RefCell<Option<Result<Vec<Place>, ClientError>>>,
    export: RefCell<Option<Result<ExportResponse, ClientError>>>,
    export_delay: Cell<usize>,
    pub sent: RefCell<Vec<ChatRequest>>,
    pub export_requests: RefCell<Vec<String>>,
}

impl ScriptedTransport {
    pub fn reply(&self, body: Value) -> &Self {
        self.reply_after(0, body)
    }

    pub fn reply_after(&self, delay: usize, body: Value) -> &Self {
        let response: ChatResponse = serde_json::from_value(body).expect("valid chat response fixture");
        self.chat.borrow_mut().push_back(Reply { delay, result: Ok(response) });
        self
    }

    pub fn fail(&self, error: ClientError) -> &Self {
        self.chat.borrow_mut().push_back(Reply { delay: 0, result: Err(error) });
        self
    }

    pub fn places(&self, result: Result<Vec<Place>, ClientError>) {
        *self.places.borrow_mut() = Some(result);
    }

    pub fn export(&self, result: Result<ExportResponse, ClientError>) {
        self.export_after(0, result);
    }

    pub fn export_after(&self, delay: usize, result: Result<ExportResponse, ClientError>) {
        self.export_delay.set(delay);
        *self.export.borrow_mut() = Some(result);
    }

    pub fn sent(&self) -> Vec<ChatRequest> {
        self.sent.borrow().clone()
    }
}

impl Transport for ScriptedTransport {
    async fn post_chat(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError> {
        self.sent.borrow_mut().push(request.clone());
        let reply = self.chat.borrow_mut().pop_front();
        let Some(reply) = reply else {
            return Err(ClientError::Network("no scripted reply left".into()));
        };
        for _ in 0..reply.delay {
            tokio::task::yield_now().await;
        }
        reply.result
    }

    async fn fetch_places(&self) -> Result<Vec<Place>, ClientError> {
        self.places
            .borrow_mut()
            .take()
            .unwrap_or_else(|| Err(ClientError::Network("catalog offline".into())))
    }

    async fn fetch_export(&self, session_id: &str) -> Result<ExportResponse, ClientError> {
        self.export_requests.borrow_mut().push(session_id.to_string());
        for _ in 0..self.export_delay.get() {
            tokio::task::yield_now().await;
        }
        self.export
            .borrow_mut()
            .take()
            .unwrap_or_else(|| Err(ClientError::transport(404, "no export")))
    }
}

pub fn controller() -> TestController {
    let storage = ClientStorage::new(MemoryStore::new(), MemoryStore::new());
    Controller::new(ScriptedTransport::default(), ClientSession::new(HeadlessSurface, storage))
}

pub fn place(id: &str, name: &str, lat: f64, lng: f64) -> Place {
    Place {
        id: id.to_string(),
        name: name.to_string(),
        coordinates: ktm_planner_core::models::LatLng(lat, lng),
        kind: None,
    }
}
