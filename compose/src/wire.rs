//! GraphQL wire schema for the `postMessage` mutation.
//!
//! Both front ends (`client` over `gloo-net`, `cli` over `reqwest`) build the
//! same request envelope and decode the same response body through these
//! helpers, so transport code only moves bytes.

#[cfg(test)]
#[path = "wire_test.rs"]
mod wire_test;

use serde::{Deserialize, Serialize};

/// Mutation document sent for every message post.
pub const POST_MESSAGE_MUTATION: &str = "mutation newMessage($channelId: String!, $userId: String!, $text: String!) {
  postMessage(channelId: $channelId, userId: $userId, text: $text) {
    datetime
    text
    userId
    messageId
  }
}";

/// Error returned by [`decode_post_message_response`].
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The body was not valid JSON or did not match the response shape.
    #[error("malformed response body: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The server reported one or more GraphQL errors.
    #[error("{0}")]
    Graphql(String),
    /// The body carried neither `data.postMessage` nor `errors`.
    #[error("response contained no message")]
    Empty,
}

/// Failure of a send operation, as surfaced to the submission controller.
///
/// `Display` is the human-readable message handed to error callbacks.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SendError {
    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Transport(String),
    /// The endpoint answered with a non-success HTTP status.
    #[error("send failed with status {0}")]
    Status(u16),
    /// The endpoint answered with GraphQL errors.
    #[error("{0}")]
    Graphql(String),
    /// The endpoint answered without a message payload.
    #[error("response contained no message")]
    EmptyResponse,
    /// The response body could not be decoded.
    #[error("invalid response: {0}")]
    Decode(String),
}

impl From<WireError> for SendError {
    fn from(err: WireError) -> Self {
        match err {
            WireError::Malformed(e) => Self::Decode(e.to_string()),
            WireError::Graphql(message) => Self::Graphql(message),
            WireError::Empty => Self::EmptyResponse,
        }
    }
}

/// Variables of the `postMessage` mutation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMessageVariables {
    pub channel_id: String,
    pub user_id: String,
    pub text: String,
}

/// Message as confirmed by the server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostedMessage {
    pub datetime: String,
    pub text: String,
    pub user_id: String,
    pub message_id: String,
}

/// GraphQL request envelope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GraphqlRequest<'a> {
    pub query: &'a str,
    pub variables: &'a PostMessageVariables,
}

impl<'a> GraphqlRequest<'a> {
    /// Wrap `variables` in the `postMessage` mutation envelope.
    #[must_use]
    pub fn post_message(variables: &'a PostMessageVariables) -> Self {
        Self {
            query: POST_MESSAGE_MUTATION,
            variables,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<PostMessageData>,
    errors: Option<Vec<GraphqlErrorItem>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostMessageData {
    post_message: Option<PostedMessage>,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorItem {
    message: String,
}

/// Decode a GraphQL response body into the posted message.
///
/// GraphQL errors win over partial data: a response carrying both is treated
/// as a failed send.
///
/// # Errors
///
/// Returns [`WireError::Malformed`] for bodies that are not a GraphQL
/// response, [`WireError::Graphql`] with the `; `-joined error messages when
/// the server reported errors, and [`WireError::Empty`] when there is no
/// message payload.
pub fn decode_post_message_response(body: &str) -> Result<PostedMessage, WireError> {
    let response: GraphqlResponse = serde_json::from_str(body)?;
    let errors = response.errors.unwrap_or_default();
    if !errors.is_empty() {
        let joined = errors
            .into_iter()
            .map(|e| e.message)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(WireError::Graphql(joined));
    }
    response
        .data
        .and_then(|d| d.post_message)
        .ok_or(WireError::Empty)
}

/// Turn an HTTP status and body into the outcome of a send.
///
/// GraphQL errors in the body are reported as such even on non-2xx
/// statuses; any other non-2xx answer becomes [`SendError::Status`].
///
/// # Errors
///
/// Returns the [`SendError`] describing why no message was posted.
pub fn settle_response(status: u16, body: &str) -> Result<PostedMessage, SendError> {
    let decoded = decode_post_message_response(body);
    if (200..300).contains(&status) {
        return decoded.map_err(SendError::from);
    }
    match decoded {
        Err(WireError::Graphql(message)) => Err(SendError::Graphql(message)),
        _ => Err(SendError::Status(status)),
    }
}
