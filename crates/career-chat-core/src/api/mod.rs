pub mod client;
pub mod wire;

use anyhow::Result;
use async_trait::async_trait;

use crate::message::Message;

pub use client::ApiClient;
pub use wire::{ChatRequest, ChatResponse, HealthStatus, Reply};

/// The calls the send lifecycle makes against the chat backend.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send one user turn. Non-2xx statuses are errors.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse>;

    /// Fetch the stored history of an existing conversation.
    async fn conversation_messages(&self, conversation_id: &str) -> Result<Vec<Message>>;
}
