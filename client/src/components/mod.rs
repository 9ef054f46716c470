//! Reusable UI components for the message form.

pub mod chat_session;
pub mod pending_list;
pub mod submit_message;
