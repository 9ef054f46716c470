//! Client-side configuration handed to every form through the session.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use compose::ComposeConfig;

/// Endpoint the GraphQL mutation is posted to, relative to the page origin.
pub const DEFAULT_GRAPHQL_ENDPOINT: &str = "/graphql";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub graphql_endpoint: String,
    pub compose: ComposeConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            graphql_endpoint: DEFAULT_GRAPHQL_ENDPOINT.to_owned(),
            compose: ComposeConfig::default(),
        }
    }
}

impl ClientConfig {
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.graphql_endpoint = endpoint.into();
        self
    }

    /// Debounce interval as a browser timer delay.
    #[must_use]
    pub fn debounce_timer_ms(&self) -> u32 {
        u32::try_from(self.compose.debounce_ms()).unwrap_or(u32::MAX)
    }
}
