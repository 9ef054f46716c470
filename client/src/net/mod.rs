//! Networking for the message submit form.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` posts the GraphQL mutation; the wire schema itself lives in
//! `compose::wire` and is shared with the CLI.

pub mod api;
