use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::message::Message;

/// Body of `POST /api/v1/chat/chat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Sent as `null` until the backend has assigned an id
    pub conversation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>, conversation_id: Option<String>) -> Self {
        Self {
            message: message.into(),
            conversation_id,
            metadata: None,
        }
    }
}

/// Successful reply from the chat endpoint.
///
/// Current backends send the full history in `messages`; older ones only send
/// the assistant's reply in `message`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub conversation_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<Message>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// What a response asks the transcript to do
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Authoritative history that supersedes the local transcript
    History(Vec<Message>),
    /// Single assistant reply to append
    Single(String),
}

impl ChatResponse {
    /// Split the response into the conversation id and the reply it carries.
    ///
    /// The id is returned even when the body carries no reply, since the
    /// backend has already recorded the turn under it.
    pub fn into_reply(self) -> (String, Result<Reply>) {
        let reply = match (self.messages, self.message) {
            (Some(messages), _) if !messages.is_empty() => Ok(Reply::History(messages)),
            (_, Some(message)) => Ok(Reply::Single(message)),
            _ => Err(anyhow!(
                "Chat response for conversation {} carried neither messages nor message",
                self.conversation_id
            )),
        };
        (self.conversation_id, reply)
    }
}

/// Body of `GET /api/v1/health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}
