use std::future::Future;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;

use ktm_planner_core::map::HeadlessSurface;
use ktm_planner_core::models::{LatLng, Place};
use ktm_planner_core::storage::ClientStorage;
use ktm_planner_core::view::{Controls, ExportView, TranscriptEntry};
use ktm_planner_core::{ClientError, ClientSession, Controller, ViewSnapshot};

use crate::api::GlooTransport;
use crate::leaflet::{BrowserMap, LeafletSurface};
use crate::storage::BrowserStore;

pub type PlannerController = Controller<GlooTransport, BrowserMap, BrowserStore>;

/// Shared application state, provided via Leptos context.
#[derive(Clone)]
pub struct AppState {
    // --- Read signals (for components to subscribe to) ---
    pub transcript: ReadSignal<Vec<TranscriptEntry>>,
    pub suggestions: ReadSignal<Vec<String>>,
    pub export: ReadSignal<ExportView>,
    pub controls: ReadSignal<Controls>,
    pub status: ReadSignal<String>,
    /// Actions still waiting on the network.
    pub in_flight: ReadSignal<u32>,
    pub error: ReadSignal<Option<String>>,

    // --- Write signals (for mutating state) ---
    pub set_transcript: WriteSignal<Vec<TranscriptEntry>>,
    pub set_suggestions: WriteSignal<Vec<String>>,
    pub set_export: WriteSignal<ExportView>,
    pub set_controls: WriteSignal<Controls>,
    pub set_status: WriteSignal<String>,
    pub set_in_flight: WriteSignal<u32>,
    pub set_error: WriteSignal<Option<String>>,

    controller: StoredValue<Option<Rc<PlannerController>>, LocalStorage>,
}

impl AppState {
    /// Create a new `AppState` and provide it in the current Leptos context.
    pub fn provide() -> Self {
        let (transcript, set_transcript) = signal(Vec::<TranscriptEntry>::new());
        let (suggestions, set_suggestions) = signal(Vec::<String>::new());
        let (export, set_export) = signal(ExportView::Hidden);
        let (controls, set_controls) = signal(Controls::default());
        let (status, set_status) = signal(String::new());
        let (in_flight, set_in_flight) = signal(0u32);
        let (error, set_error) = signal(None::<String>);

        let state = Self {
            transcript,
            suggestions,
            export,
            controls,
            status,
            in_flight,
            error,
            set_transcript,
            set_suggestions,
            set_export,
            set_controls,
            set_status,
            set_in_flight,
            set_error,
            controller: StoredValue::new_local(None),
        };

        provide_context(state.clone());
        state
    }

    /// Mounts the map into `element_id`, builds the controller and boots it.
    /// Later calls do nothing.
    pub fn mount_map(&self, element_id: &str) {
        if self.controller.with_value(Option::is_some) {
            return;
        }

        let on_place = {
            let state = self.clone();
            move |place: Place| state.select_place(place)
        };
        let on_context = {
            let state = self.clone();
            move |at: LatLng| state.set_hotel(at)
        };

        let map = match LeafletSurface::mount(element_id, on_place, on_context) {
            Ok(surface) => BrowserMap::Leaflet(surface),
            Err(e) => {
                log::error!("Failed to mount map: {e:?}");
                self.set_error.set(Some("The map could not be loaded.".to_string()));
                BrowserMap::Headless(HeadlessSurface)
            }
        };

        let storage = ClientStorage::new(BrowserStore::local(), BrowserStore::session());
        let session = ClientSession::new(map, storage);
        let controller = Rc::new(Controller::new(GlooTransport::from_window(), session));
        self.attach(&controller);
        self.controller.set_value(Some(controller));

        self.boot();
    }

    /// Mirrors every controller snapshot into the signals.
    fn attach(&self, controller: &PlannerController) {
        let state = self.clone();
        controller.set_observer(move |snapshot: ViewSnapshot| {
            state.set_transcript.set(snapshot.transcript);
            state.set_suggestions.set(snapshot.suggestions);
            state.set_export.set(snapshot.export);
            state.set_controls.set(snapshot.controls);
            state.set_status.set(snapshot.status);
        });
    }

    /// Runs one controller action in the background. Failures land in the
    /// error banner.
    fn run<F, Fut>(&self, action: &'static str, f: F)
    where
        F: FnOnce(Rc<PlannerController>) -> Fut + 'static,
        Fut: Future<Output = Result<(), ClientError>> + 'static,
    {
        let Some(controller) = self.controller.get_value() else {
            log::warn!("Ignoring {action}: planner not mounted yet");
            return;
        };

        let state = self.clone();
        self.set_error.set(None);
        self.set_in_flight.update(|n| *n += 1);

        spawn_local(async move {
            if let Err(e) = f(controller).await {
                log::error!("Failed to {action}: {e}");
                state.set_error.set(Some(e.to_string()));
            }
            state.set_in_flight.update(|n| *n = n.saturating_sub(1));
        });
    }

    pub fn boot(&self) {
        self.run("start session", |c| async move { c.boot().await });
    }

    pub fn send_message(&self, text: String) {
        self.run("send message", move |c| async move { c.send_message(&text).await });
    }

    pub fn select_place(&self, place: Place) {
        self.run("select place", move |c| async move { c.select_place(&place).await });
    }

    pub fn set_hotel(&self, at: LatLng) {
        self.run("set stay", move |c| async move { c.set_hotel(at).await });
    }

    pub fn create_route(&self) {
        self.run("create route", |c| async move { c.create_route().await });
    }

    pub fn export(&self) {
        self.run("export trip", |c| async move { c.export().await });
    }

    pub fn reset(&self) {
        self.run("reset session", |c| async move { c.reset().await });
    }
}
