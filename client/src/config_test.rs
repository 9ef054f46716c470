use super::*;

#[test]
fn default_config_posts_to_relative_graphql_endpoint() {
    let config = ClientConfig::default();
    assert_eq!(config.graphql_endpoint, "/graphql");
    assert_eq!(config.debounce_timer_ms(), 500);
}

#[test]
fn with_endpoint_overrides_only_endpoint() {
    let config = ClientConfig::default().with_endpoint("https://chat.example.com/graphql");
    assert_eq!(config.graphql_endpoint, "https://chat.example.com/graphql");
    assert_eq!(config.compose, ComposeConfig::default());
}

#[test]
fn oversized_debounce_saturates_timer_delay() {
    let mut config = ClientConfig::default();
    config.compose.debounce = std::time::Duration::from_secs(u64::from(u32::MAX));
    assert_eq!(config.debounce_timer_ms(), u32::MAX);
}
