//! GraphQL send operation over `reqwest`.

use compose::{GraphqlRequest, PostMessageVariables, PostedMessage, SendError};

/// Something that can perform the `postMessage` send operation.
pub trait MessageSender {
    async fn post_message(&self, variables: &PostMessageVariables) -> Result<PostedMessage, SendError>;
}

pub struct GraphqlSender {
    client: reqwest::Client,
    endpoint: String,
}

impl GraphqlSender {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: reqwest::Client::builder().build()?,
            endpoint: endpoint.into(),
        })
    }
}

impl MessageSender for GraphqlSender {
    async fn post_message(&self, variables: &PostMessageVariables) -> Result<PostedMessage, SendError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&GraphqlRequest::post_message(variables))
            .send()
            .await
            .map_err(|e| SendError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| SendError::Transport(e.to_string()))?;
        tracing::debug!(%status, endpoint = %self.endpoint, "postMessage answered");
        compose::settle_response(status, &body)
    }
}
