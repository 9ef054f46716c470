//! Submission controller for one mounted message form.
//!
//! SYSTEM CONTEXT
//! ==============
//! The composer owns the form's input text and its draft store. The pending
//! log is owned by the chat session and passed in per call, because several
//! forms may share it. A send is split into `begin_submit` (synchronous,
//! optimistic) and `complete` (after the network call resolves), so the
//! caller is free to run the request on whatever executor it has.
//!
//! Sends are not serialized: a second submit while one is outstanding starts
//! a second send, and each completion settles only its own ticket.

#[cfg(test)]
#[path = "composer_test.rs"]
mod composer_test;

use uuid::Uuid;

use crate::config::ComposeConfig;
use crate::draft::{DraftKey, DraftStore};
use crate::pending::{PendingMessage, PendingMessages};
use crate::storage::KeyValueStore;
use crate::wire::{PostMessageVariables, PostedMessage, SendError};

/// Handle for one outstanding send.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SendTicket {
    /// Id of the pending entry this send created.
    pub local_id: Uuid,
    /// Draft identity the send was issued under.
    pub key: DraftKey,
    /// Request payload for the send operation.
    pub variables: PostMessageVariables,
}

/// Result of settling a ticket, for the caller to forward to its callbacks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    Delivered(PostedMessage),
    Failed {
        error: SendError,
        /// Copy of the session's pending log at failure time.
        pending: Vec<PendingMessage>,
    },
}

#[derive(Debug)]
pub struct Composer<S> {
    drafts: DraftStore<S>,
    key: DraftKey,
    input: String,
    in_flight: Vec<Uuid>,
}

impl<S: KeyValueStore> Composer<S> {
    /// Mount a composer for `key`, loading any stored draft into the input.
    pub fn new(store: S, config: &ComposeConfig, key: DraftKey) -> Self {
        let drafts = DraftStore::new(store, config);
        let input = drafts.load(&key);
        Self {
            drafts,
            key,
            input,
            in_flight: Vec::new(),
        }
    }

    /// Switch to another user/channel pair.
    ///
    /// When the pair changes the input is replaced by the stored draft for the
    /// new pair, or cleared if there is none. Returns whether it changed.
    pub fn select(&mut self, key: DraftKey) -> bool {
        if key == self.key {
            return false;
        }
        self.input = self.drafts.load(&key);
        self.key = key;
        true
    }

    /// Replace the input text and schedule a debounced draft save.
    /// Returns the deadline at which the draft timer should fire.
    pub fn edit(&mut self, text: impl Into<String>, now_ms: u64) -> u64 {
        self.input = text.into();
        self.drafts.save(&self.key, &self.input, now_ms)
    }

    /// Start sending the current input.
    ///
    /// Empty input is ignored. Otherwise one entry is appended to `pending`
    /// and the returned ticket carries the request to issue.
    pub fn begin_submit(
        &mut self,
        pending: &mut PendingMessages,
        datetime: impl Into<String>,
    ) -> Option<SendTicket> {
        if self.input.is_empty() {
            return None;
        }

        let entry = PendingMessage::new(
            datetime,
            self.key.user_id.clone(),
            self.key.channel_id.clone(),
            self.input.clone(),
        );
        let local_id = pending.push(entry);
        self.in_flight.push(local_id);

        Some(SendTicket {
            local_id,
            key: self.key.clone(),
            variables: PostMessageVariables {
                channel_id: self.key.channel_id.clone(),
                user_id: self.key.user_id.clone(),
                text: self.input.clone(),
            },
        })
    }

    /// Settle `ticket` with the result of its send.
    ///
    /// On success the ticket's pending entry and stored draft are removed and
    /// the input is cleared, unless the form has since moved to another
    /// user/channel pair. On failure the pending log is left as is and a
    /// snapshot of it is returned.
    pub fn complete(
        &mut self,
        pending: &mut PendingMessages,
        ticket: &SendTicket,
        result: Result<PostedMessage, SendError>,
    ) -> SendOutcome {
        self.in_flight.retain(|id| *id != ticket.local_id);

        match result {
            Ok(posted) => {
                pending.remove(ticket.local_id);
                self.drafts.discard(&ticket.key);
                if ticket.key == self.key {
                    self.input.clear();
                }
                SendOutcome::Delivered(posted)
            }
            Err(error) => {
                tracing::error!(
                    user_id = %ticket.key.user_id,
                    channel_id = %ticket.key.channel_id,
                    %error,
                    "message send failed"
                );
                SendOutcome::Failed {
                    error,
                    pending: pending.snapshot(),
                }
            }
        }
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[must_use]
    pub fn key(&self) -> &DraftKey {
        &self.key
    }

    /// True while any send started here is unresolved.
    #[must_use]
    pub fn is_sending(&self) -> bool {
        !self.in_flight.is_empty()
    }

    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Forward a draft timer tick; see [`DraftStore::flush_due`].
    pub fn flush_due(&mut self, now_ms: u64) -> bool {
        self.drafts.flush_due(now_ms)
    }

    /// Persist any pending draft immediately.
    pub fn flush_now(&mut self) -> bool {
        self.drafts.flush_now()
    }

    /// Drop the pending draft write; called on teardown.
    pub fn cancel_pending_draft(&mut self) -> bool {
        self.drafts.cancel()
    }

    /// Deadline of the pending draft write, if any.
    #[must_use]
    pub fn draft_due_at(&self) -> Option<u64> {
        self.drafts.due_at()
    }

    /// Stored draft for the current pair, bypassing the input buffer.
    #[must_use]
    pub fn stored_draft(&self) -> String {
        self.drafts.load(&self.key)
    }

    /// Stored draft for `key`.
    #[must_use]
    pub fn stored_draft_for(&self, key: &DraftKey) -> String {
        self.drafts.load(key)
    }

    pub fn drafts(&self) -> &DraftStore<S> {
        &self.drafts
    }

    pub fn drafts_mut(&mut self) -> &mut DraftStore<S> {
        &mut self.drafts
    }
}
