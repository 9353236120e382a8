use leptos::ev;
use leptos::html;
use leptos::prelude::*;

use ktm_planner_core::view::{EntryBody, Role, TranscriptEntry};

use crate::state::AppState;

/// Chat log and input.
#[component]
pub fn ChatPanel() -> impl IntoView {
    let state = expect_context::<AppState>();
    let transcript = state.transcript;
    let in_flight = state.in_flight;
    let log_ref = NodeRef::<html::Div>::new();

    // Keep the newest entry in view.
    Effect::new(move |_| {
        transcript.track();
        request_animation_frame(move || {
            if let Some(log) = log_ref.get_untracked() {
                log.set_scroll_top(log.scroll_height());
            }
        });
    });

    view! {
        <section class="chat-panel">
            <div class="messages" node_ref=log_ref>
                <For
                    each=move || transcript.get()
                    key=|entry| entry.id
                    let:entry
                >
                    <Entry entry=entry />
                </For>
                {move || {
                    (in_flight.get() > 0).then(|| view! {
                        <div class="message assistant pending">"…"</div>
                    })
                }}
            </div>
            <ChatInput />
        </section>
    }
}

#[component]
fn Entry(entry: TranscriptEntry) -> impl IntoView {
    let css_class = match entry.role {
        Role::User => "message user",
        Role::Assistant => "message assistant",
    };

    match entry.body {
        EntryBody::Text(text) => view! { <div class=css_class>{text}</div> }.into_any(),
        EntryBody::Review(review) => view! {
            <div class="message assistant review">
                <div class="role-label">"Review"</div>
                <div>{review}</div>
            </div>
        }
        .into_any(),
        EntryBody::Images(urls) => view! {
            <div class="message assistant images">
                {urls
                    .into_iter()
                    .map(|url| view! { <img src=url loading="lazy" alt="" /> })
                    .collect_view()}
            </div>
        }
        .into_any(),
    }
}

#[component]
fn ChatInput() -> impl IntoView {
    let state = expect_context::<AppState>();
    let (input, set_input) = signal(String::new());

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let text = input.get_untracked();
        if text.trim().is_empty() {
            return;
        }
        set_input.set(String::new());
        state.send_message(text);
    };

    view! {
        <form class="input-row" on:submit=on_submit>
            <input
                type="text"
                placeholder="Ask about places, stays or routes in Kathmandu…"
                prop:value=input
                on:input=move |ev| set_input.set(event_target_value(&ev))
            />
            <button type="submit" class="send-btn" disabled=move || input.get().trim().is_empty()>
                "Send"
            </button>
        </form>
    }
}
