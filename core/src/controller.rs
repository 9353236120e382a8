use std::cell::RefCell;

use crate::errors::ClientError;
use crate::map::MapSurface;
use crate::models::{ChatRequest, LatLng, MapEvent, Place};
use crate::sequencer::Ticket;
use crate::session::{ClientSession, ViewSnapshot};
use crate::storage::KeyValueStore;
use crate::transport::Transport;
use crate::view::ExportView;

/// Name sent with a right-click stay point.
pub const STAY_POINT_NAME: &str = "Stay";

type Observer = Box<dyn Fn(ViewSnapshot)>;

/// Drives a [`ClientSession`] through the assistant's API.
///
/// Every user action is one method here. The session is borrowed only
/// around the synchronous steps, so actions may overlap while a request is
/// in flight; the session's sequencer decides which responses still apply.
pub struct Controller<T, M, S> {
    transport: T,
    session: RefCell<ClientSession<M, S>>,
    observer: RefCell<Option<Observer>>,
}

impl<T: Transport, M: MapSurface, S: KeyValueStore> Controller<T, M, S> {
    pub fn new(transport: T, session: ClientSession<M, S>) -> Self {
        Self {
            transport,
            session: RefCell::new(session),
            observer: RefCell::new(None),
        }
    }

    /// Called with a fresh snapshot after every visible change.
    pub fn set_observer(&self, observer: impl Fn(ViewSnapshot) + 'static) {
        *self.observer.borrow_mut() = Some(Box::new(observer));
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn with_session<R>(&self, f: impl FnOnce(&ClientSession<M, S>) -> R) -> R {
        f(&self.session.borrow())
    }

    /// Page load: best-effort catalog fetch, then the hello exchange.
    pub async fn boot(&self) -> Result<(), ClientError> {
        match self.transport.fetch_places().await {
            Ok(places) => {
                log::debug!("Loaded {} catalog places", places.len());
                self.session.borrow_mut().show_catalog(places);
            }
            Err(e) => log::warn!("Places catalog unavailable: {e}"),
        }
        self.exchange("", None).await
    }

    /// Typed message or clicked suggestion. Blank text does nothing.
    pub async fn send_message(&self, text: &str) -> Result<(), ClientError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }
        self.session.borrow_mut().record_user_message(text);
        self.notify();
        self.exchange(text, None).await
    }

    pub async fn select_place(&self, place: &Place) -> Result<(), ClientError> {
        let event = MapEvent::SelectPlace { name: place.name.clone(), coordinates: place.coordinates };
        self.exchange("", Some(event)).await
    }

    pub async fn set_hotel(&self, coordinates: LatLng) -> Result<(), ClientError> {
        let event = MapEvent::SetHotel { name: STAY_POINT_NAME.to_string(), coordinates };
        self.exchange("", Some(event)).await
    }

    pub async fn create_route(&self) -> Result<(), ClientError> {
        self.exchange("", Some(MapEvent::CreateRoute {})).await
    }

    /// Fetches per-day export links. Without a session the panel shows its
    /// empty state and nothing is requested.
    pub async fn export(&self) -> Result<(), ClientError> {
        let pending = self.session.borrow_mut().prepare_export();
        let Some((ticket, session_id)) = pending else {
            self.show_export(ExportView::Empty);
            return Ok(());
        };

        let result = self.transport.fetch_export(&session_id).await;
        let view = match &result {
            Ok(response) => ExportView::from_response(response),
            Err(_) => ExportView::Empty,
        };
        let applied = self.session.borrow_mut().apply_export(ticket, view);
        if applied {
            self.notify();
        }
        result.map(|_| ())
    }

    /// Wipes local state and starts a new conversation.
    pub async fn reset(&self) -> Result<(), ClientError> {
        self.session.borrow_mut().reset_local();
        self.notify();
        self.exchange("", None).await
    }

    /// One request/response round. A `ui.resetSession` in the response resets
    /// and says hello again, at most once per call.
    async fn exchange(&self, message: &str, map_event: Option<MapEvent>) -> Result<(), ClientError> {
        let mut pending: (Ticket, ChatRequest) = self.session.borrow_mut().prepare(message, map_event);
        let mut reset_allowed = true;

        loop {
            let (ticket, request) = pending;
            let response = self.transport.post_chat(&request).await?;

            let report = self.session.borrow_mut().apply_response(ticket, &response);
            self.notify();

            match report {
                Some(report) if report.reset_requested => {
                    if !reset_allowed {
                        log::warn!("Ignoring repeated reset request from the assistant");
                        return Ok(());
                    }
                    reset_allowed = false;
                    pending = {
                        let mut session = self.session.borrow_mut();
                        session.reset_local();
                        session.prepare("", None)
                    };
                    self.notify();
                }
                _ => return Ok(()),
            }
        }
    }

    fn show_export(&self, view: ExportView) {
        self.session.borrow_mut().show_export(view);
        self.notify();
    }

    fn notify(&self) {
        let observer = self.observer.borrow();
        if let Some(observer) = observer.as_ref() {
            let snapshot = self.session.borrow().snapshot();
            observer(snapshot);
        }
    }
}
