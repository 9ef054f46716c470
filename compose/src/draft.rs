//! Per-(user, channel) draft persistence with trailing debounce.
//!
//! DESIGN
//! ======
//! The store never owns a timer. `save` records a single pending write with a
//! deadline on the caller's millisecond clock, and the platform timer (a
//! `gloo_timers` timeout in the browser, a tokio sleep in the CLI) calls
//! `flush_due` when it fires. A newer `save` replaces the pending write, so
//! only the last edit of a burst reaches storage.
//!
//! A pending write remembers the key it was scheduled under. Switching
//! channels mid-burst still lands the burst on the channel it was typed in.

#[cfg(test)]
#[path = "draft_test.rs"]
mod draft_test;

use crate::config::ComposeConfig;
use crate::storage::KeyValueStore;

/// Identity a draft is stored under.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DraftKey {
    pub user_id: String,
    pub channel_id: String,
}

impl DraftKey {
    pub fn new(user_id: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            channel_id: channel_id.into(),
        }
    }

    /// Key used in the backing store, e.g. `draft:u1:general`.
    ///
    /// `\` and `:` inside either id are backslash-escaped, so every pair
    /// maps to its own key.
    #[must_use]
    pub fn storage_key(&self, prefix: &str) -> String {
        format!(
            "{prefix}{}:{}",
            escape_key_part(&self.user_id),
            escape_key_part(&self.channel_id)
        )
    }
}

fn escape_key_part(part: &str) -> String {
    let mut escaped = String::with_capacity(part.len());
    for c in part.chars() {
        if matches!(c, '\\' | ':') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct PendingWrite {
    storage_key: String,
    text: String,
    due_at_ms: u64,
}

/// Debounced draft writer over a [`KeyValueStore`].
#[derive(Debug)]
pub struct DraftStore<S> {
    store: S,
    prefix: String,
    debounce_ms: u64,
    pending: Option<PendingWrite>,
}

impl<S: KeyValueStore> DraftStore<S> {
    pub fn new(store: S, config: &ComposeConfig) -> Self {
        Self {
            store,
            prefix: config.draft_key_prefix.clone(),
            debounce_ms: config.debounce_ms(),
            pending: None,
        }
    }

    /// Stored draft for `key`, or an empty string.
    ///
    /// Storage read failures are logged and treated as "no draft".
    pub fn load(&self, key: &DraftKey) -> String {
        match self.store.get(&key.storage_key(&self.prefix)) {
            Ok(value) => value.unwrap_or_default(),
            Err(error) => {
                tracing::warn!(
                    user_id = %key.user_id,
                    channel_id = %key.channel_id,
                    %error,
                    "draft load failed"
                );
                String::new()
            }
        }
    }

    /// Schedule `text` to be persisted under `key` once `now_ms` plus the
    /// debounce interval passes without another `save`. Returns the deadline.
    ///
    /// A pending write for a different key is written out first.
    pub fn save(&mut self, key: &DraftKey, text: &str, now_ms: u64) -> u64 {
        let storage_key = key.storage_key(&self.prefix);
        if let Some(previous) = self.pending.take_if(|p| p.storage_key != storage_key) {
            self.write(&previous);
        }
        let due_at_ms = now_ms.saturating_add(self.debounce_ms);
        self.pending = Some(PendingWrite {
            storage_key,
            text: text.to_owned(),
            due_at_ms,
        });
        due_at_ms
    }

    /// Deadline of the pending write, if any.
    #[must_use]
    pub fn due_at(&self) -> Option<u64> {
        self.pending.as_ref().map(|p| p.due_at_ms)
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Perform the pending write if its deadline has passed.
    pub fn flush_due(&mut self, now_ms: u64) -> bool {
        match self.pending.take() {
            Some(pending) if now_ms >= pending.due_at_ms => {
                self.write(&pending);
                true
            }
            other => {
                self.pending = other;
                false
            }
        }
    }

    /// Perform the pending write regardless of its deadline.
    pub fn flush_now(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                self.write(&pending);
                true
            }
            None => false,
        }
    }

    /// Drop the pending write without touching storage.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Remove the stored draft for `key` and drop a pending write aimed at it.
    pub fn discard(&mut self, key: &DraftKey) {
        let storage_key = key.storage_key(&self.prefix);
        if self
            .pending
            .as_ref()
            .is_some_and(|p| p.storage_key == storage_key)
        {
            self.pending = None;
        }
        if let Err(error) = self.store.remove(&storage_key) {
            tracing::warn!(key = %storage_key, %error, "draft remove failed");
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    fn write(&mut self, pending: &PendingWrite) {
        let result = if pending.text.is_empty() {
            self.store.remove(&pending.storage_key)
        } else {
            self.store.set(&pending.storage_key, &pending.text)
        };
        match result {
            Ok(()) => tracing::debug!(
                key = %pending.storage_key,
                cleared = pending.text.is_empty(),
                "draft persisted"
            ),
            Err(error) => {
                tracing::warn!(key = %pending.storage_key, %error, "draft write failed");
            }
        }
    }
}
