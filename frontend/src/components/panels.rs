use leptos::prelude::*;

use ktm_planner_core::view::{EXPORT_EMPTY_MESSAGE, ExportView};

use crate::state::AppState;

/// Quick-reply chips from the last response. Clicking one sends it as a message.
#[component]
pub fn SuggestionBar() -> impl IntoView {
    let state = expect_context::<AppState>();
    let suggestions = state.suggestions;

    view! {
        <div class="suggestions">
            <For
                each=move || suggestions.get().into_iter().enumerate()
                key=|(i, text)| (*i, text.clone())
                let:item
            >
                {
                    let state = state.clone();
                    let (_, text) = item;
                    let label = text.clone();
                    view! {
                        <button class="chip" on:click=move |_| state.send_message(text.clone())>
                            {label}
                        </button>
                    }
                }
            </For>
        </div>
    }
}

/// Route, export and reset buttons.
#[component]
pub fn Toolbar() -> impl IntoView {
    let state = expect_context::<AppState>();
    let controls = state.controls;

    let route = state.clone();
    let export = state.clone();
    let reset = state;

    view! {
        <div class="toolbar">
            <button
                class="tool-btn"
                disabled=move || !controls.get().route_enabled
                on:click=move |_| route.create_route()
            >
                "Create route"
            </button>
            <button
                class="tool-btn"
                disabled=move || !controls.get().export_enabled
                on:click=move |_| export.export()
            >
                "Export"
            </button>
            <button class="tool-btn reset" on:click=move |_| reset.reset()>
                "Start over"
            </button>
        </div>
    }
}

#[component]
pub fn ExportPanel() -> impl IntoView {
    let state = expect_context::<AppState>();
    let export = state.export;

    move || match export.get() {
        ExportView::Hidden => ().into_any(),
        ExportView::Empty => view! {
            <div class="export-panel empty">{EXPORT_EMPTY_MESSAGE}</div>
        }
        .into_any(),
        ExportView::Links(links) => view! {
            <div class="export-panel">
                {links
                    .into_iter()
                    .map(|link| view! {
                        <a href=link.url target="_blank" rel="noopener">{link.label}</a>
                    })
                    .collect_view()}
            </div>
        }
        .into_any(),
    }
}

/// One-line trip summary.
#[component]
pub fn StatusLine() -> impl IntoView {
    let state = expect_context::<AppState>();
    let status = state.status;

    view! {
        <div class="status-line" class:hidden=move || status.get().is_empty()>
            {move || status.get()}
        </div>
    }
}

#[component]
pub fn ErrorBanner() -> impl IntoView {
    let state = expect_context::<AppState>();
    let error = state.error;
    let set_error = state.set_error;

    move || {
        error.get().map(|err| {
            view! {
                <div class="error-banner" on:click=move |_| set_error.set(None)>
                    {err}
                </div>
            }
        })
    }
}
