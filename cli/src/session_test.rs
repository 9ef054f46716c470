use std::cell::RefCell;
use std::time::Duration;

use compose::{ComposeConfig, MemoryStore, PostMessageVariables, PostedMessage, SendError};

use super::*;

#[derive(Default)]
struct FakeSender {
    sent: RefCell<Vec<PostMessageVariables>>,
    fail_with: Option<SendError>,
}

impl MessageSender for FakeSender {
    async fn post_message(&self, variables: &PostMessageVariables) -> Result<PostedMessage, SendError> {
        self.sent.borrow_mut().push(variables.clone());
        if let Some(error) = &self.fail_with {
            return Err(error.clone());
        }
        Ok(PostedMessage {
            datetime: "2024-01-01T12:00:00Z".to_owned(),
            text: variables.text.clone(),
            user_id: variables.user_id.clone(),
            message_id: "m1".to_owned(),
        })
    }
}

fn session(sender: FakeSender) -> Session<MemoryStore, FakeSender> {
    let config = ComposeConfig {
        debounce: Duration::from_millis(10),
        ..ComposeConfig::default()
    };
    let composer = Composer::new(MemoryStore::new(), &config, DraftKey::new("u1", "c1"));
    Session::new(composer, sender)
}

async fn run(session: &mut Session<MemoryStore, FakeSender>, script: &str) -> String {
    let mut out = Vec::new();
    session
        .run_compose(tokio::io::BufReader::new(script.as_bytes()), &mut out)
        .await
        .expect("compose loop");
    String::from_utf8(out).expect("utf8 output")
}

// =============================================================
// Line parsing
// =============================================================

#[test]
fn parse_recognizes_commands() {
    assert_eq!(parse_compose_line("/send"), ComposeInput::Send);
    assert_eq!(parse_compose_line("/quit\r"), ComposeInput::Quit);
    assert_eq!(parse_compose_line("/show"), ComposeInput::Show);
    assert_eq!(
        parse_compose_line("/channel  c2 "),
        ComposeInput::Channel("c2".to_owned())
    );
}

#[test]
fn parse_treats_other_lines_as_text() {
    assert_eq!(parse_compose_line("hello"), ComposeInput::Text("hello".to_owned()));
    assert_eq!(parse_compose_line("/channel "), ComposeInput::Text("/channel ".to_owned()));
    assert_eq!(parse_compose_line("a\\nb"), ComposeInput::Text("a\nb".to_owned()));
}

// =============================================================
// Compose loop
// =============================================================

#[tokio::test]
async fn typed_text_is_sent_and_draft_cleared() {
    let mut s = session(FakeSender::default());
    let out = run(&mut s, "hi\nhi!\n/send\n").await;

    let sent = s.sender.sent.borrow();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].text, "hi!");
    assert!(s.pending.is_empty());
    assert_eq!(s.composer.input(), "");
    assert_eq!(s.composer.stored_draft(), "");
    assert!(out.contains("sent: "));
}

#[tokio::test]
async fn quitting_persists_unsent_draft() {
    let mut s = session(FakeSender::default());
    run(&mut s, "draft text\n/quit\nignored\n").await;

    assert_eq!(s.composer.stored_draft(), "draft text");
    assert!(s.sender.sent.borrow().is_empty());
}

#[tokio::test]
async fn failed_send_keeps_pending_entry_and_reports_it() {
    let sender = FakeSender {
        fail_with: Some(SendError::Graphql("network down".to_owned())),
        ..FakeSender::default()
    };
    let mut s = session(sender);
    let out = run(&mut s, "hello\n/send\n").await;

    assert_eq!(s.pending.len(), 1);
    assert_eq!(s.composer.input(), "hello");
    assert!(out.contains("send failed: network down"));
    assert!(out.contains("\"messageId\":\"temp\""));
}

#[tokio::test]
async fn switching_channel_loads_that_channels_draft() {
    let mut s = session(FakeSender::default());
    run(&mut s, "for c1\n/channel c2\nfor c2\n").await;

    assert_eq!(s.composer.key(), &DraftKey::new("u1", "c2"));
    assert_eq!(s.composer.stored_draft(), "for c2");
    assert_eq!(s.composer.stored_draft_for(&DraftKey::new("u1", "c1")), "for c1");

    let out = run(&mut s, "/channel c1\n/quit\n").await;
    assert!(out.contains("draft: for c1"));
}

#[tokio::test]
async fn send_with_empty_input_reports_nothing_to_send() {
    let mut s = session(FakeSender::default());
    let out = run(&mut s, "/send\n").await;
    assert!(out.contains("nothing to send"));
    assert!(s.sender.sent.borrow().is_empty());
}

#[tokio::test]
async fn debounced_draft_is_written_while_idle() {
    let mut s = session(FakeSender::default());
    s.edit("waiting");
    assert!(s.composer.draft_due_at().is_some());

    let (mut writer, reader) = tokio::io::duplex(64);
    let mut out = Vec::new();
    let loop_fut = s.run_compose(tokio::io::BufReader::new(reader), &mut out);
    let drive = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        tokio::io::AsyncWriteExt::shutdown(&mut writer).await.expect("close input");
    };
    let (result, ()) = tokio::join!(loop_fut, drive);
    result.expect("compose loop");

    assert_eq!(s.composer.stored_draft(), "waiting");
    assert_eq!(s.composer.draft_due_at(), None);
}
