//! Message submit form with local drafts and optimistic sends.
//!
//! SYSTEM CONTEXT
//! ==============
//! Wraps a `compose::Composer` over `localStorage`. Keystrokes update the
//! input and re-arm a single debounce timer that persists the draft; submit
//! appends an optimistic entry to the session's pending log and posts the
//! GraphQL mutation; the result is settled back into the composer and
//! forwarded to the caller's callbacks.
//!
//! Submitting again while a send is outstanding starts another send. Each
//! send removes only its own pending entry when it succeeds.

#[cfg(test)]
#[path = "submit_message_test.rs"]
mod submit_message_test;

use compose::{Composer, DraftKey, PendingMessage, SendOutcome};
use leptos::prelude::*;

use crate::state::session::ChatSession;
use crate::util::browser_storage::BrowserStorage;
use crate::util::clock;

pub(crate) const PLACEHOLDER: &str = "Type your message here...";
pub(crate) const SUBMIT_LABEL: &str = "Send Message";
pub(crate) const SENDING_LABEL: &str = "Sending message...";

/// Send indicator state rendered next to the submit button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub(crate) enum SendStatus {
    #[default]
    Idle,
    Sending,
}

impl SendStatus {
    pub(crate) fn from_in_flight(in_flight: usize) -> Self {
        if in_flight == 0 { Self::Idle } else { Self::Sending }
    }

    pub(crate) fn label(self) -> Option<&'static str> {
        match self {
            Self::Idle => None,
            Self::Sending => Some(SENDING_LABEL),
        }
    }
}

/// Form for composing and sending a message to `channel_id` as `user_id`.
///
/// Must be mounted under a `ChatSessionProvider`.
#[component]
pub fn SubmitMessage(
    #[prop(into)] user_id: Signal<String>,
    #[prop(into)] channel_id: Signal<String>,
    on_message_submit: Callback<()>,
    on_message_error: Callback<Vec<PendingMessage>>,
) -> impl IntoView {
    let session = expect_context::<ChatSession>();
    let config = session.config();

    let composer = StoredValue::new(Composer::new(
        BrowserStorage,
        &config.compose,
        DraftKey::new(user_id.get_untracked(), channel_id.get_untracked()),
    ));
    let input = RwSignal::new(composer.with_value(|c| c.input().to_owned()));
    let status = RwSignal::new(SendStatus::Idle);

    #[cfg(feature = "hydrate")]
    let draft_timer = StoredValue::new_local(None::<gloo_timers::callback::Timeout>);
    #[cfg(feature = "hydrate")]
    let debounce_ms = config.debounce_timer_ms();

    let sync_view = move || {
        let Some((text, in_flight)) =
            composer.try_with_value(|c| (c.input().to_owned(), c.in_flight()))
        else {
            return;
        };
        input.set(text);
        status.set(SendStatus::from_in_flight(in_flight));
    };

    Effect::new(move || {
        let key = DraftKey::new(user_id.get(), channel_id.get());
        let changed = composer
            .try_update_value(|c| c.select(key))
            .unwrap_or(false);
        if changed {
            input.set(composer.with_value(|c| c.input().to_owned()));
        }
    });

    let on_input = move |ev: leptos::ev::Event| {
        let text = event_target_value(&ev);
        input.set(text.clone());
        composer.update_value(|c| {
            c.edit(text, clock::now_ms());
        });

        // Replacing the handle drops, and so cancels, the previous timer.
        #[cfg(feature = "hydrate")]
        draft_timer.set_value(Some(gloo_timers::callback::Timeout::new(
            debounce_ms,
            move || {
                composer.try_update_value(|c| c.flush_now());
            },
        )));
    };

    let settle = move |ticket: compose::SendTicket, result: Result<compose::PostedMessage, compose::SendError>| {
        if composer.is_disposed() {
            settle_detached(session, &ticket, &result);
            return;
        }
        let outcome = session
            .pending
            .try_update(|pending| composer.try_update_value(|c| c.complete(pending, &ticket, result)))
            .flatten();
        sync_view();
        if let Some(outcome) = outcome {
            forward_outcome(outcome, on_message_submit, on_message_error);
        }
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(ticket) = start_send(session, composer, clock::datetime_string()) else {
            return;
        };
        sync_view();

        #[cfg(feature = "hydrate")]
        {
            let endpoint = config.graphql_endpoint.clone();
            leptos::task::spawn_local(async move {
                let result = crate::net::api::post_message(&endpoint, &ticket.variables).await;
                settle(ticket, result);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (ticket, settle);
        }
    };

    on_cleanup(move || {
        #[cfg(feature = "hydrate")]
        draft_timer.try_update_value(|t| t.take());
        composer.try_update_value(Composer::cancel_pending_draft);
    });

    view! {
        <div class="submit-message">
            <form class="submit-message__form" on:submit=on_submit>
                <textarea
                    class="submit-message__textarea"
                    name="newMessage"
                    id="newMessage"
                    placeholder=PLACEHOLDER
                    prop:value=move || input.get()
                    on:input=on_input
                ></textarea>
                <div class="submit-message__actions">
                    <button class="btn btn--primary submit-message__send" type="submit">
                        {SUBMIT_LABEL}
                        <span class="submit-message__send-icon" aria-hidden="true"></span>
                    </button>
                    {move || {
                        status
                            .get()
                            .label()
                            .map(|label| {
                                view! {
                                    <div class="submit-message__status" aria-live="polite">
                                        <p>{label}</p>
                                    </div>
                                }
                            })
                    }}
                </div>
            </form>
        </div>
    }
}

/// Begin a send from the form's current input.
///
/// Empty input returns `None` without touching the pending log, so
/// `PendingList` subscribers are not notified.
fn start_send(
    session: ChatSession,
    composer: StoredValue<Composer<BrowserStorage>>,
    datetime: String,
) -> Option<compose::SendTicket> {
    let has_input = composer
        .try_with_value(|c| !c.input().is_empty())
        .unwrap_or(false);
    if !has_input {
        return None;
    }
    session
        .pending
        .try_update(|pending| composer.try_update_value(|c| c.begin_submit(pending, datetime)))
        .flatten()
        .flatten()
}

/// Hand a settled send to the caller. The failure itself is already logged
/// by `Composer::complete`.
fn forward_outcome(
    outcome: SendOutcome,
    on_message_submit: Callback<()>,
    on_message_error: Callback<Vec<PendingMessage>>,
) {
    match outcome {
        SendOutcome::Delivered(_) => on_message_submit.run(()),
        SendOutcome::Failed { pending, .. } => on_message_error.run(pending),
    }
}

/// Settle a send whose form was unmounted before the response arrived.
///
/// The session log and the stored draft still need the success cleanup;
/// there is no input to clear and no caller left to notify.
fn settle_detached(
    session: ChatSession,
    ticket: &compose::SendTicket,
    result: &Result<compose::PostedMessage, compose::SendError>,
) {
    match result {
        Ok(_) => {
            session.pending.try_update(|p| p.remove(ticket.local_id));
            let mut drafts = compose::DraftStore::new(BrowserStorage, &session.config().compose);
            drafts.discard(&ticket.key);
        }
        Err(error) => {
            leptos::logging::warn!("message send failed after form closed: {error}");
        }
    }
}
