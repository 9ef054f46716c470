//! Chat session state shared by every submit form mounted under it.
//!
//! DESIGN
//! ======
//! The pending-message log lives here rather than in any one form, so two
//! forms in the same session see each other's optimistic messages. The
//! session is provided via context by `ChatSessionProvider`, and the log is
//! cleared when that provider is torn down.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use compose::{PendingMessage, PendingMessages};
use leptos::prelude::*;

use crate::config::ClientConfig;

#[derive(Clone, Copy, Debug)]
pub struct ChatSession {
    pub pending: RwSignal<PendingMessages>,
    config: StoredValue<ClientConfig>,
}

impl ChatSession {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            pending: RwSignal::new(PendingMessages::new()),
            config: StoredValue::new(config),
        }
    }

    pub fn config(&self) -> ClientConfig {
        self.config.get_value()
    }

    /// Pending messages addressed to `channel_id`, oldest first.
    pub fn pending_for(&self, channel_id: &str) -> Vec<PendingMessage> {
        self.pending
            .with(|p| p.for_channel(channel_id).cloned().collect())
    }

    /// Drop all session-owned state.
    pub fn end(&self) {
        self.pending.try_update(PendingMessages::clear);
    }
}
