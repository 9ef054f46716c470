use super::*;
use crate::storage::{MemoryStore, StorageError};

fn store() -> DraftStore<MemoryStore> {
    DraftStore::new(MemoryStore::new(), &ComposeConfig::default())
}

fn key() -> DraftKey {
    DraftKey::new("u1", "general")
}

fn stored(drafts: &DraftStore<MemoryStore>, key: &DraftKey) -> Option<String> {
    drafts
        .store()
        .get(&key.storage_key("draft:"))
        .expect("memory get")
}

struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("disabled".to_owned()))
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("disabled".to_owned()))
    }

    fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("disabled".to_owned()))
    }
}

// =============================================================
// Keys
// =============================================================

#[test]
fn storage_key_joins_prefix_user_and_channel() {
    assert_eq!(key().storage_key("draft:"), "draft:u1:general");
}

#[test]
fn storage_key_keeps_distinct_pairs_apart() {
    let a = DraftKey::new("ab", "c").storage_key("");
    let b = DraftKey::new("a", "bc").storage_key("");
    assert_ne!(a, b);
}

#[test]
fn storage_key_escapes_separator_inside_ids() {
    let a = DraftKey::new("a:b", "c");
    let b = DraftKey::new("a", "b:c");
    assert_eq!(a.storage_key("draft:"), "draft:a\\:b:c");
    assert_eq!(b.storage_key("draft:"), "draft:a:b\\:c");

    let mut drafts = store();
    drafts.save(&a, "for a:b/c", 0);
    assert!(drafts.flush_now());
    assert_eq!(drafts.load(&a), "for a:b/c");
    assert_eq!(drafts.load(&b), "");
}

#[test]
fn storage_key_escapes_backslashes_inside_ids() {
    let a = DraftKey::new("a\\", ":b").storage_key("");
    let b = DraftKey::new("a\\:", "b").storage_key("");
    assert_ne!(a, b);
}

// =============================================================
// Debounce
// =============================================================

#[test]
fn burst_of_edits_persists_only_final_text() {
    let mut drafts = store();
    drafts.save(&key(), "hi", 0);
    let due = drafts.save(&key(), "hi!", 200);
    assert_eq!(due, 700);

    // Deadline of the first edit has passed, but it was superseded.
    assert!(!drafts.flush_due(500));
    assert_eq!(stored(&drafts, &key()), None);

    assert!(drafts.flush_due(700));
    assert_eq!(stored(&drafts, &key()).as_deref(), Some("hi!"));
    assert_eq!(drafts.store().writes(), 1);
    assert!(!drafts.has_pending());
}

#[test]
fn pause_past_window_persists_latest_text() {
    let mut drafts = store();
    drafts.save(&key(), "first", 0);
    assert!(drafts.flush_due(600));
    drafts.save(&key(), "second", 1_000);
    assert!(drafts.flush_due(1_500));
    assert_eq!(stored(&drafts, &key()).as_deref(), Some("second"));
}

#[test]
fn flush_before_deadline_keeps_write_pending() {
    let mut drafts = store();
    drafts.save(&key(), "hi", 100);
    assert!(!drafts.flush_due(599));
    assert_eq!(drafts.due_at(), Some(600));
    assert!(drafts.has_pending());
}

#[test]
fn empty_text_removes_stored_draft() {
    let mut drafts = store();
    drafts.save(&key(), "hello", 0);
    drafts.flush_now();
    drafts.save(&key(), "", 10);
    assert!(drafts.flush_due(510));
    assert_eq!(stored(&drafts, &key()), None);
}

#[test]
fn pending_write_keeps_the_key_it_was_scheduled_under() {
    let mut drafts = store();
    let other = DraftKey::new("u1", "random");
    drafts.save(&key(), "for general", 0);
    assert!(drafts.flush_due(500));
    assert_eq!(stored(&drafts, &key()).as_deref(), Some("for general"));
    assert_eq!(stored(&drafts, &other), None);
}

#[test]
fn cancel_drops_pending_write() {
    let mut drafts = store();
    drafts.save(&key(), "lost", 0);
    assert!(drafts.cancel());
    assert!(!drafts.flush_due(10_000));
    assert_eq!(drafts.store().writes(), 0);
    assert!(!drafts.cancel());
}

#[test]
fn discard_removes_draft_and_matching_pending_write() {
    let mut drafts = store();
    drafts.save(&key(), "sent", 0);
    drafts.flush_now();
    drafts.save(&key(), "sent!", 100);

    drafts.discard(&key());
    assert!(!drafts.has_pending());
    assert!(!drafts.flush_due(10_000));
    assert_eq!(stored(&drafts, &key()), None);
}

#[test]
fn discard_keeps_pending_write_for_other_key() {
    let mut drafts = store();
    let other = DraftKey::new("u1", "random");
    drafts.save(&other, "elsewhere", 0);
    drafts.discard(&key());
    assert!(drafts.flush_due(500));
    assert_eq!(stored(&drafts, &other).as_deref(), Some("elsewhere"));
}

// =============================================================
// Load
// =============================================================

#[test]
fn load_returns_stored_text_or_empty() {
    let mut drafts = store();
    assert_eq!(drafts.load(&key()), "");
    drafts.save(&key(), "line one\nline two", 0);
    drafts.flush_now();
    assert_eq!(drafts.load(&key()), "line one\nline two");
}

#[test]
fn storage_failures_are_swallowed() {
    let mut drafts = DraftStore::new(FailingStore, &ComposeConfig::default());
    assert_eq!(drafts.load(&key()), "");
    drafts.save(&key(), "x", 0);
    assert!(drafts.flush_due(500));
    drafts.discard(&key());
}

#[test]
fn custom_debounce_and_prefix_are_honored() {
    let config = ComposeConfig {
        debounce: std::time::Duration::from_millis(50),
        draft_key_prefix: "chat/".to_owned(),
    };
    let mut drafts = DraftStore::new(MemoryStore::new(), &config);
    assert_eq!(drafts.save(&key(), "quick", 10), 60);
    assert!(drafts.flush_due(60));
    assert_eq!(
        drafts.store().get("chat/u1:general").expect("get").as_deref(),
        Some("quick")
    );
}
