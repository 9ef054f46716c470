//! # client
//!
//! Leptos + WASM message submit form: draft text is debounced into
//! `localStorage`, submits are posted as a GraphQL mutation, and optimistic
//! entries are tracked in a session-scoped pending log.
//!
//! Host applications mount `ChatSessionProvider` once per chat session and
//! any number of `SubmitMessage` forms beneath it. The platform-free logic
//! lives in the `compose` crate.

pub mod components;
pub mod config;
pub mod net;
pub mod state;
pub mod util;

pub use components::chat_session::ChatSessionProvider;
pub use components::pending_list::PendingList;
pub use components::submit_message::SubmitMessage;
pub use config::ClientConfig;
pub use state::session::ChatSession;

/// Module start hook: routes panics and `tracing` output to the console.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    util::logging::init();
}
