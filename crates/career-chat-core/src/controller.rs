//! The send lifecycle: one user turn against the chat backend.
//!
//! A turn is `begin` (guard, optimistic user entry, pending on), one backend
//! call, then `resolve` (reconcile the reply, pending off). `send_message`
//! runs all three; an event loop that must stay responsive while the request
//! is outstanding calls the halves itself.

use anyhow::Result;

use crate::api::{ChatBackend, ChatRequest, ChatResponse, Reply};
use crate::message::Role;
use crate::transcript::Transcript;

/// Shown in the transcript whenever a request fails, whatever the cause.
pub const FAILURE_MESSAGE: &str = "エラーが発生しました。もう一度お試しください。";

/// Why a submission was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Nothing but whitespace was submitted
    EmptyInput,
    /// A request is already in flight
    AlreadyPending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Nothing was appended and no request was issued
    Rejected(Rejection),
    /// The backend's full history replaced the transcript
    Replied,
    /// A single assistant reply was appended
    Appended,
    /// The request failed and a system notice was appended
    Failed,
}

/// Owns the transcript and is the only thing that mutates it.
#[derive(Debug, Default)]
pub struct ChatController {
    transcript: Transcript,
}

impl ChatController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn is_pending(&self) -> bool {
        self.transcript.is_pending()
    }

    /// Accept a submission and build the request to dispatch for it.
    pub fn begin(&mut self, text: &str) -> std::result::Result<ChatRequest, Rejection> {
        if self.transcript.is_pending() {
            return Err(Rejection::AlreadyPending);
        }
        if text.trim().is_empty() {
            return Err(Rejection::EmptyInput);
        }

        // Stored as typed; only the emptiness check trims
        self.transcript.append_message(Role::User, text);
        self.transcript.set_pending(true);

        Ok(ChatRequest::new(
            text,
            self.transcript.conversation_id().map(str::to_owned),
        ))
    }

    /// Reconcile the settled request started by `begin`.
    pub fn resolve(&mut self, result: Result<ChatResponse>) -> SendOutcome {
        let reply = result.and_then(|response| {
            // Any decoded body names the conversation, reply or not
            let (conversation_id, reply) = response.into_reply();
            self.transcript.set_conversation_id(conversation_id);
            reply
        });

        let outcome = match reply {
            Ok(Reply::History(messages)) => {
                tracing::info!(count = messages.len(), "adopting server history");
                self.transcript.replace_messages(messages);
                SendOutcome::Replied
            }
            Ok(Reply::Single(content)) => {
                tracing::info!("appending single reply");
                self.transcript.append_message(Role::Assistant, content);
                SendOutcome::Appended
            }
            Err(err) => {
                tracing::warn!(error = %format!("{err:#}"), "chat request failed");
                self.transcript.append_message(Role::System, FAILURE_MESSAGE);
                SendOutcome::Failed
            }
        };

        self.transcript.set_pending(false);
        outcome
    }

    /// Run one complete user turn against `backend`.
    pub async fn send_message<B>(&mut self, backend: &B, text: &str) -> SendOutcome
    where
        B: ChatBackend + ?Sized,
    {
        let request = match self.begin(text) {
            Ok(request) => request,
            Err(rejection) => return SendOutcome::Rejected(rejection),
        };

        let result = backend.chat(&request).await;
        self.resolve(result)
    }

    /// Load an existing server-side conversation in place of the transcript.
    pub async fn resume<B>(&mut self, backend: &B, conversation_id: &str) -> SendOutcome
    where
        B: ChatBackend + ?Sized,
    {
        if self.transcript.is_pending() {
            return SendOutcome::Rejected(Rejection::AlreadyPending);
        }

        self.transcript.set_pending(true);
        let outcome = match backend.conversation_messages(conversation_id).await {
            Ok(messages) => {
                tracing::info!(conversation_id, count = messages.len(), "resumed conversation");
                self.transcript.set_conversation_id(conversation_id);
                self.transcript.replace_messages(messages);
                SendOutcome::Replied
            }
            Err(err) => {
                tracing::warn!(conversation_id, error = %format!("{err:#}"), "could not resume conversation");
                self.transcript.append_message(Role::System, FAILURE_MESSAGE);
                SendOutcome::Failed
            }
        };
        self.transcript.set_pending(false);
        outcome
    }
}
