use std::time::Duration;

use async_trait::async_trait;
use log::info;
use serde::{Deserialize, Serialize};

use super::error::RequestError;
use super::fetch::{FetchOptions, fetch_json};
use crate::core::state::Turn;

/// Body posted to the chat endpoint: the full conversation so far.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<Turn>,
}

/// Body expected back. `output` is optional on the wire; an absent or
/// empty value is a logical failure handled by the controller.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ChatReply {
    #[serde(default)]
    pub output: Option<String>,
}

impl ChatReply {
    /// The reply text, if there is any to show.
    pub fn text(&self) -> Option<&str> {
        self.output.as_deref().filter(|s| !s.is_empty())
    }
}

/// The remote side of a conversation.
///
/// `Ok(None)` means the transport succeeded with no content (HTTP 204).
#[async_trait]
pub trait ChatEndpoint: Send + Sync {
    /// Short label for logs and the status line.
    fn name(&self) -> &str;

    async fn exchange(&self, request: &ChatRequest) -> Result<Option<ChatReply>, RequestError>;
}

/// Chat endpoint reached over HTTP with `POST <url>`.
pub struct HttpEndpoint {
    url: String,
    headers: Vec<(String, String)>,
    client: reqwest::Client,
}

impl HttpEndpoint {
    pub fn new(
        url: impl Into<String>,
        headers: Vec<(String, String)>,
        timeout: Option<Duration>,
    ) -> Result<Self, RequestError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| RequestError::Transport(e.to_string()))?;

        Ok(Self {
            url: url.into(),
            headers,
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ChatEndpoint for HttpEndpoint {
    fn name(&self) -> &str {
        &self.url
    }

    async fn exchange(&self, request: &ChatRequest) -> Result<Option<ChatReply>, RequestError> {
        let body = serde_json::to_value(request).map_err(|e| RequestError::Decode(e.to_string()))?;

        info!(
            "Chat request: url={}, message_count={}",
            self.url,
            request.messages.len()
        );

        let mut options = FetchOptions::post(self.url.clone(), body);
        options.headers = self.headers.clone();

        fetch_json(&self.client, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::{Role, Turn};
    use serde_json::json;

    #[test]
    fn request_serializes_as_messages_array() {
        let request = ChatRequest {
            messages: vec![
                Turn::new(Role::User, "hi"),
                Turn::new(Role::System, "Hello"),
            ],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "messages": [
                    {"role": "USER", "message": "hi"},
                    {"role": "SYSTEM", "message": "Hello"}
                ]
            })
        );
    }

    #[test]
    fn reply_output_is_optional() {
        let reply: ChatReply = serde_json::from_value(json!({})).unwrap();
        assert_eq!(reply.text(), None);

        let reply: ChatReply = serde_json::from_value(json!({"output": ""})).unwrap();
        assert_eq!(reply.text(), None);

        let reply: ChatReply =
            serde_json::from_value(json!({"output": "Hello", "extra": 1})).unwrap();
        assert_eq!(reply.text(), Some("Hello"));
    }

    #[test]
    fn endpoint_keeps_url() {
        let endpoint = HttpEndpoint::new("http://localhost:9/chat", vec![], None).unwrap();
        assert_eq!(endpoint.url(), "http://localhost:9/chat");
        assert_eq!(endpoint.name(), "http://localhost:9/chat");
    }
}
