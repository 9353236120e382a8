mod api;
mod components;
mod leaflet;
mod state;
mod storage;

use leptos::mount::mount_to_body;
use leptos::prelude::*;

use components::chat::ChatPanel;
use components::map::MapPanel;
use components::panels::{ErrorBanner, ExportPanel, StatusLine, SuggestionBar, Toolbar};
use state::AppState;

/// Root application component.
#[component]
fn App() -> impl IntoView {
    AppState::provide();

    view! {
        <div class="app-container">
            <header class="app-header">
                <h1>"Kathmandu Trip Planner"</h1>
                <StatusLine />
            </header>
            <ErrorBanner />
            <main class="planner">
                <MapPanel />
                <aside class="sidebar">
                    <ChatPanel />
                    <SuggestionBar />
                    <Toolbar />
                    <ExportPanel />
                </aside>
            </main>
        </div>
    }
}

fn main() {
    console_log::init_with_level(log::Level::Debug).expect("Failed to init logger");
    mount_to_body(App);
}
