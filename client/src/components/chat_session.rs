//! Context provider scoping one chat session's shared state.

use leptos::prelude::*;

use crate::config::ClientConfig;
use crate::state::session::ChatSession;

/// Provide a fresh `ChatSession` to `children`.
///
/// The session's pending log lives exactly as long as this provider.
#[component]
pub fn ChatSessionProvider(#[prop(optional)] config: Option<ClientConfig>, children: Children) -> impl IntoView {
    let session = ChatSession::new(config.unwrap_or_default());
    provide_context(session);
    on_cleanup(move || session.end());

    children()
}
