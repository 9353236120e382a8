use serde_json::Value;

use crate::commands::UiCommand;
use crate::errors::StorageError;
use crate::map::{MapRenderer, MapSurface};
use crate::models::{ChatRequest, ChatResponse, LatLng, MapEvent, Place, TripState};
use crate::sequencer::{RequestSequencer, Ticket};
use crate::storage::{ClientStorage, KeyValueStore};
use crate::trip::PlacesIndex;
use crate::view::{Controls, ExportView, Role, Suggestions, Transcript, TranscriptEntry};

/// Outcome of running one response's command list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExecutionReport {
    pub applied: usize,
    pub skipped: usize,
    pub reset_requested: bool,
}

/// Everything the page renders outside the map.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewSnapshot {
    pub transcript: Vec<TranscriptEntry>,
    pub suggestions: Vec<String>,
    pub export: ExportView,
    pub controls: Controls,
    pub status: String,
}

/// All client-side state for one browser tab.
///
/// Nothing here awaits. The controller borrows the session only between
/// network calls, so two in-flight requests never hold it at once.
pub struct ClientSession<M, S> {
    map: MapRenderer<M>,
    storage: ClientStorage<S>,
    transcript: Transcript,
    suggestions: Suggestions,
    export: ExportView,
    controls: Controls,
    trip_state: Option<TripState>,
    sequencer: RequestSequencer,
    exports: RequestSequencer,
}

impl<M: MapSurface, S: KeyValueStore> ClientSession<M, S> {
    pub fn new(surface: M, storage: ClientStorage<S>) -> Self {
        Self {
            map: MapRenderer::new(surface),
            storage,
            transcript: Transcript::default(),
            suggestions: Suggestions::default(),
            export: ExportView::default(),
            controls: Controls::default(),
            trip_state: None,
            sequencer: RequestSequencer::default(),
            exports: RequestSequencer::default(),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn map(&self) -> &MapRenderer<M> {
        &self.map
    }

    pub fn storage(&self) -> &ClientStorage<S> {
        &self.storage
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn suggestions(&self) -> &[String] {
        self.suggestions.items()
    }

    pub fn export_view(&self) -> &ExportView {
        &self.export
    }

    pub fn controls(&self) -> Controls {
        self.controls
    }

    pub fn trip_state(&self) -> Option<&TripState> {
        self.trip_state.as_ref()
    }

    pub fn session_id(&self) -> Option<String> {
        self.storage.session_id()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            transcript: self.transcript.entries().to_vec(),
            suggestions: self.suggestions.items().to_vec(),
            export: self.export.clone(),
            controls: self.controls,
            status: self.trip_state.as_ref().map(TripState::summary).unwrap_or_default(),
        }
    }

    // ── Outgoing ─────────────────────────────────────────────────────────────

    pub fn record_user_message(&mut self, text: &str) {
        self.transcript.append(Role::User, text);
    }

    /// Builds the next request envelope and the ticket its response must present.
    pub fn prepare(&mut self, message: &str, map_event: Option<MapEvent>) -> (Ticket, ChatRequest) {
        let request = ChatRequest {
            session_id: self.storage.session_id(),
            message: message.to_string(),
            map_event,
        };
        (self.sequencer.issue(), request)
    }

    // ── Incoming ─────────────────────────────────────────────────────────────

    /// Distributes a chat response across the page.
    ///
    /// Returns `None` when a newer response has already been applied; the
    /// stale one is dropped whole.
    pub fn apply_response(&mut self, ticket: Ticket, response: &ChatResponse) -> Option<ExecutionReport> {
        if !self.sequencer.accept(ticket) {
            log::debug!("Discarding stale response for request #{}", ticket.value());
            return None;
        }

        if let Some(id) = response.session_id.as_deref().filter(|id| !id.is_empty()) {
            if let Err(e) = self.storage.set_session_id(id) {
                log::warn!("Could not persist session id: {e}");
            }
        }

        if let Some(state) = response.trip_state() {
            self.trip_state = Some(state);
        }

        if let Some(text) = response.text() {
            self.transcript.append(Role::Assistant, text);
        }

        self.map.apply_map_actions(response.map_actions().as_ref());

        let report = self.execute_commands(response.commands());

        if response.suggestions.is_some() {
            self.suggestions.replace(response.suggestions());
        }

        Some(report)
    }

    /// Applies each command on its own. A bad command is logged and skipped;
    /// the rest still run.
    pub fn execute_commands(&mut self, commands: &[Value]) -> ExecutionReport {
        let mut report = ExecutionReport::default();

        for raw in commands {
            let command = match UiCommand::parse(raw) {
                Ok(c) => c,
                Err(e) => {
                    log::warn!("Skipping command: {e}");
                    report.skipped += 1;
                    continue;
                }
            };

            let tag = command.tag();
            match self.execute(command) {
                Ok(Executed::Applied) => report.applied += 1,
                Ok(Executed::Ignored) => report.skipped += 1,
                Ok(Executed::ResetRequested) => {
                    report.applied += 1;
                    report.reset_requested = true;
                }
                Err(e) => {
                    log::warn!("Command '{tag}' failed: {e}");
                    report.skipped += 1;
                }
            }
        }

        report
    }

    fn execute(&mut self, command: UiCommand) -> Result<Executed, StorageError> {
        match command {
            UiCommand::ZoomTo { center, zoom } => self.map.zoom_to(center, zoom),
            UiCommand::AddPin(pin) => self.map.add_pin(pin),
            UiCommand::RemovePin(id) => {
                self.map.remove_pin(&id);
            }
            UiCommand::StoreProfile(profile) => self.storage.set_profile(&profile)?,
            UiCommand::StorePlaces(places) => self.storage.set_places(&places)?,
            UiCommand::AddPlaceToDay { day_index, place_id } => {
                self.storage.update_trip(|trip| trip.add_visit(day_index, &place_id))?;
            }
            UiCommand::StoreHotel(hotel) => {
                self.storage.update_trip(|trip| trip.set_hotel(hotel.day_index, &hotel.place_id))?;
                let place = Place {
                    id: hotel.place_id.clone(),
                    name: hotel.name_en.clone(),
                    coordinates: LatLng(hotel.lat, hotel.lng),
                    kind: Some("hotel".to_string()),
                };
                self.storage.update_places(|places| {
                    places.insert(hotel.place_id.clone(), place);
                })?;
            }
            UiCommand::ConfirmDay(day_index) => {
                self.storage.update_trip(|trip| trip.confirm(day_index))?;
            }
            UiCommand::EnableButton(name) => {
                if !self.controls.enable(&name) {
                    log::warn!("Skipping enable for unknown button '{name}'");
                    return Ok(Executed::Ignored);
                }
            }
            UiCommand::ResetSession => return Ok(Executed::ResetRequested),
            UiCommand::ShowReview(review) => self.transcript.append_review(review),
            UiCommand::ShowImages(urls) => self.transcript.append_images(&urls),
        }
        Ok(Executed::Applied)
    }

    // ── Local-only updates ───────────────────────────────────────────────────

    /// Draws the places catalog and merges it into the places mirror.
    pub fn show_catalog(&mut self, places: Vec<Place>) {
        let merged = self.storage.update_places(|index: &mut PlacesIndex| {
            for place in &places {
                index.insert(place.key().to_string(), place.clone());
            }
        });
        if let Err(e) = merged {
            log::warn!("Could not mirror places catalog: {e}");
        }
        self.map.show_catalog(places);
    }

    pub fn show_export(&mut self, view: ExportView) {
        self.export = view;
    }

    /// Ticket and session id for an export fetch, or `None` without a session.
    pub fn prepare_export(&mut self) -> Option<(Ticket, String)> {
        let session_id = self.storage.session_id()?;
        Some((self.exports.issue(), session_id))
    }

    /// Shows an export result unless a newer export or a reset came first.
    pub fn apply_export(&mut self, ticket: Ticket, view: ExportView) -> bool {
        if !self.exports.accept(ticket) {
            log::debug!("Discarding stale export result #{}", ticket.value());
            return false;
        }
        self.export = view;
        true
    }

    /// Clears everything local and invalidates in-flight chat and export
    /// requests. The catalog layer is redrawn from memory.
    pub fn reset_local(&mut self) {
        self.sequencer.invalidate();
        self.exports.invalidate();
        self.storage.clear();

        // Redraw only; the places mirror stays empty until the server sends one.
        let catalog = self.map.catalog().to_vec();
        self.map.reset();
        if !catalog.is_empty() {
            self.map.show_catalog(catalog);
        }

        self.transcript.clear();
        self.suggestions.clear();
        self.export = ExportView::Hidden;
        self.controls.disable_all();
        self.trip_state = None;
    }
}

enum Executed {
    Applied,
    Ignored,
    ResetRequested,
}
