//! Tunables shared by every front end.

use std::time::Duration;

/// Quiet period before a draft edit is persisted.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Prefix for draft keys in the key-value store.
pub const DEFAULT_DRAFT_KEY_PREFIX: &str = "draft:";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComposeConfig {
    pub debounce: Duration,
    pub draft_key_prefix: String,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            draft_key_prefix: DEFAULT_DRAFT_KEY_PREFIX.to_owned(),
        }
    }
}

impl ComposeConfig {
    /// Debounce interval in whole milliseconds, saturating at `u64::MAX`.
    #[must_use]
    pub fn debounce_ms(&self) -> u64 {
        u64::try_from(self.debounce.as_millis()).unwrap_or(u64::MAX)
    }
}
