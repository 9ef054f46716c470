//! Wall-clock helpers for the draft timer and optimistic timestamps.

/// Milliseconds since the Unix epoch.
pub fn now_ms() -> u64 {
    #[cfg(feature = "hydrate")]
    {
        // Date.now() is a whole, non-negative millisecond count.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let ms = js_sys::Date::now() as u64;
        ms
    }
    #[cfg(not(feature = "hydrate"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }
}

/// Local datetime string stamped on optimistic messages.
pub fn datetime_string() -> String {
    #[cfg(feature = "hydrate")]
    {
        String::from(js_sys::Date::new_0().to_string())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        now_ms().to_string()
    }
}
