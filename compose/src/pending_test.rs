use super::*;

fn message(channel: &str, text: &str) -> PendingMessage {
    PendingMessage::new("Mon Jan 01 2024", "u1", channel, text)
}

#[test]
fn new_pending_message_uses_temp_id() {
    let msg = message("c1", "hello");
    assert_eq!(msg.message_id, TEMP_MESSAGE_ID);
    assert_eq!(msg.text, "hello");
}

#[test]
fn new_pending_messages_get_distinct_local_ids() {
    assert_ne!(message("c1", "a").local_id, message("c1", "a").local_id);
}

#[test]
fn remove_takes_the_matching_entry_not_the_last() {
    let mut log = PendingMessages::new();
    let first = log.push(message("c1", "first"));
    let second = log.push(message("c1", "second"));

    let removed = log.remove(first).expect("first should be present");
    assert_eq!(removed.text, "first");
    assert_eq!(log.len(), 1);
    assert_eq!(log.last().map(|m| m.local_id), Some(second));
}

#[test]
fn remove_unknown_id_leaves_log_untouched() {
    let mut log = PendingMessages::new();
    log.push(message("c1", "kept"));
    assert!(log.remove(Uuid::new_v4()).is_none());
    assert_eq!(log.len(), 1);
}

#[test]
fn snapshot_is_detached_copy() {
    let mut log = PendingMessages::new();
    log.push(message("c1", "one"));
    let snap = log.snapshot();
    log.push(message("c1", "two"));
    assert_eq!(snap.len(), 1);
    assert_eq!(log.len(), 2);
}

#[test]
fn for_channel_filters_in_order() {
    let mut log = PendingMessages::new();
    log.push(message("c1", "a"));
    log.push(message("c2", "b"));
    log.push(message("c1", "c"));
    let texts: Vec<_> = log.for_channel("c1").map(|m| m.text.as_str()).collect();
    assert_eq!(texts, ["a", "c"]);
}

#[test]
fn clear_empties_log() {
    let mut log = PendingMessages::new();
    log.push(message("c1", "a"));
    log.clear();
    assert!(log.is_empty());
}

#[test]
fn pending_message_serializes_camel_case() {
    let value = serde_json::to_value(message("c1", "hi")).expect("serialize");
    assert_eq!(value["messageId"], "temp");
    assert_eq!(value["channelId"], "c1");
    assert!(value.get("localId").is_some());
}
