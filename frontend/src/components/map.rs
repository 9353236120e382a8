use leptos::prelude::*;

use crate::state::AppState;

pub const MAP_ELEMENT_ID: &str = "map";

/// Host element for the Leaflet map. The map is mounted once the element is in
/// the document.
#[component]
pub fn MapPanel() -> impl IntoView {
    let state = expect_context::<AppState>();

    Effect::new(move |_| state.mount_map(MAP_ELEMENT_ID));

    view! {
        <section class="map-panel">
            <div id=MAP_ELEMENT_ID class="map"></div>
            <p class="map-hint">"Click a place to ask about it. Right-click to set where you stay."</p>
        </section>
    }
}
