//! Platform-free core of the message submit form.
//!
//! This crate owns the draft store, the session's pending-message log, the
//! submission controller and the GraphQL wire schema. It performs no I/O:
//! storage comes in through [`KeyValueStore`], time as caller-supplied
//! millisecond timestamps, and send results as plain `Result`s. The `client`
//! (browser) and `cli` (native) crates supply the platform pieces.

pub mod composer;
pub mod config;
pub mod draft;
pub mod pending;
pub mod storage;
pub mod wire;

pub use composer::{Composer, SendOutcome, SendTicket};
pub use config::ComposeConfig;
pub use draft::{DraftKey, DraftStore};
pub use pending::{PendingMessage, PendingMessages};
pub use storage::{KeyValueStore, MemoryStore, StorageError};
pub use wire::{GraphqlRequest, PostMessageVariables, PostedMessage, SendError, WireError, settle_response};
