//! Optimistic messages awaiting server confirmation.
//!
//! One `PendingMessages` log belongs to one chat session and is shared by
//! every submit form mounted in it. Entries are appended when a send starts
//! and removed by the id minted for that send, so overlapping sends that
//! complete out of order each remove their own entry.

#[cfg(test)]
#[path = "pending_test.rs"]
mod pending_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Server message id placeholder until the post is confirmed.
pub const TEMP_MESSAGE_ID: &str = "temp";

/// A message shown locally before the server has confirmed it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingMessage {
    /// Client-minted id tying this entry to the send that created it.
    pub local_id: Uuid,
    pub datetime: String,
    pub message_id: String,
    pub user_id: String,
    pub channel_id: String,
    pub text: String,
}

impl PendingMessage {
    pub fn new(
        datetime: impl Into<String>,
        user_id: impl Into<String>,
        channel_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            local_id: Uuid::new_v4(),
            datetime: datetime.into(),
            message_id: TEMP_MESSAGE_ID.to_owned(),
            user_id: user_id.into(),
            channel_id: channel_id.into(),
            text: text.into(),
        }
    }
}

/// Ordered, session-scoped log of pending messages.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PendingMessages {
    entries: Vec<PendingMessage>,
}

impl PendingMessages {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `message` and return its local id.
    pub fn push(&mut self, message: PendingMessage) -> Uuid {
        let id = message.local_id;
        self.entries.push(message);
        id
    }

    /// Remove the entry created under `local_id`.
    pub fn remove(&mut self, local_id: Uuid) -> Option<PendingMessage> {
        let index = self.entries.iter().position(|m| m.local_id == local_id)?;
        Some(self.entries.remove(index))
    }

    /// Copy of the current log, in append order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<PendingMessage> {
        self.entries.clone()
    }

    /// Entries addressed to `channel_id`, in append order.
    pub fn for_channel<'a>(&'a self, channel_id: &'a str) -> impl Iterator<Item = &'a PendingMessage> {
        self.entries.iter().filter(move |m| m.channel_id == channel_id)
    }

    #[must_use]
    pub fn last(&self) -> Option<&PendingMessage> {
        self.entries.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry; called when the owning session ends.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
