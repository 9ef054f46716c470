//! Browser-facing helpers behind the message form.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each helper has a native fallback so the crate builds and tests off-wasm.

pub mod browser_storage;
pub mod clock;
pub mod logging;
