use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;

use super::wire::{ChatRequest, ChatResponse, HealthStatus};
use super::ChatBackend;
use crate::message::Message;

/// HTTP client for the career counselor backend.
///
/// No request timeout is set; a hung backend keeps the call outstanding.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Use a preconfigured `reqwest::Client` (proxy, TLS or header settings)
    pub fn with_client(base_url: &str, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        let url = self.endpoint(&["api", "v1", "health"])?;
        let response = self.client.get(url).send().await?;
        read_json(response, "health").await
    }

    /// Ids of every conversation the backend currently holds
    pub async fn list_conversations(&self) -> Result<Vec<String>> {
        let url = self.endpoint(&["api", "v1", "chat", "conversations"])?;
        let response = self.client.get(url).send().await?;
        read_json(response, "conversation list").await
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .with_context(|| format!("Invalid backend URL: {}", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("Backend URL cannot have a path: {}", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl ChatBackend for ApiClient {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let url = self.endpoint(&["api", "v1", "chat", "chat"])?;
        tracing::debug!(
            %url,
            conversation_id = request.conversation_id.as_deref().unwrap_or("-"),
            "posting chat message"
        );

        let response = self.client.post(url).json(request).send().await?;
        read_json(response, "chat").await
    }

    async fn conversation_messages(&self, conversation_id: &str) -> Result<Vec<Message>> {
        let url = self.endpoint(&["api", "v1", "chat", "conversations", conversation_id, "messages"])?;
        let response = self.client.get(url).send().await?;
        read_json(response, "conversation history").await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(anyhow!("{} request failed with status {}: {}", what, status, text));
    }

    let body = response.text().await?;
    serde_json::from_str(&body).with_context(|| format!("Could not decode {} response", what))
}
