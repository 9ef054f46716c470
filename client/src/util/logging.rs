//! Browser console logging setup.
//!
//! `compose` reports through `tracing`; with its `log` feature enabled and no
//! subscriber installed, those events are forwarded to the `log` facade and
//! end up in the console via `console_log`.

/// Install the panic hook and console logger. Safe to call more than once.
pub fn init() {
    #[cfg(feature = "hydrate")]
    {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
    }
}
