//! GraphQL transport for the `postMessage` mutation.
//!
//! Client-side (hydrate): real HTTP POST via `gloo-net`.
//! Server-side (SSR): a stub returning an error, since sending is only
//! meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Every failure is folded into `compose::SendError` so the form can forward
//! a single human-readable message to its error callback.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use compose::{PostMessageVariables, PostedMessage, SendError};

#[cfg(any(test, feature = "hydrate"))]
fn transport_error(err: impl std::fmt::Display) -> SendError {
    SendError::Transport(err.to_string())
}

#[cfg(any(test, not(feature = "hydrate")))]
fn offline_error() -> SendError {
    SendError::Transport("not available on server".to_owned())
}

/// Post a message to `endpoint` and return the server's copy of it.
///
/// # Errors
///
/// Returns [`SendError::Transport`] when the request cannot be made, and the
/// status/GraphQL/decode variants produced by [`compose::settle_response`].
pub async fn post_message(
    endpoint: &str,
    variables: &PostMessageVariables,
) -> Result<PostedMessage, SendError> {
    #[cfg(feature = "hydrate")]
    {
        let request = compose::GraphqlRequest::post_message(variables);
        let resp = gloo_net::http::Request::post(endpoint)
            .json(&request)
            .map_err(transport_error)?
            .send()
            .await
            .map_err(transport_error)?;
        let status = resp.status();
        let body = resp.text().await.map_err(transport_error)?;
        compose::settle_response(status, &body)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (endpoint, variables);
        Err(offline_error())
    }
}
