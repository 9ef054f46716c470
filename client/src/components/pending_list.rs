//! Optimistic messages for one channel, shown until the server confirms them.

use leptos::prelude::*;

use crate::state::session::ChatSession;

/// Pending messages addressed to `channel_id`, oldest first.
#[component]
pub fn PendingList(#[prop(into)] channel_id: Signal<String>) -> impl IntoView {
    let session = expect_context::<ChatSession>();

    view! {
        <ul class="pending-list">
            {move || {
                session
                    .pending_for(&channel_id.get())
                    .into_iter()
                    .map(|msg| {
                        view! {
                            <li class="pending-list__item" title=msg.datetime>
                                <span class="pending-list__text">{msg.text}</span>
                            </li>
                        }
                    })
                    .collect::<Vec<_>>()
            }}
        </ul>
    }
}
