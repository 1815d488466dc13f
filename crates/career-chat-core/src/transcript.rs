//! Conversation state for a single session
//!
//! The transcript is pure state: ordered messages, the backend-assigned
//! conversation id, and the in-flight flag. It performs no validation; the
//! controller decides when each mutation is allowed.

use crate::message::{Message, Role};

#[derive(Debug, Default, Clone)]
pub struct Transcript {
    conversation_id: Option<String>,
    messages: Vec<Message>,
    pending: bool,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_message(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(Message::new(role, content));
    }

    /// Replace the whole transcript with an authoritative history
    pub fn replace_messages(&mut self, messages: Vec<Message>) {
        self.messages = messages;
    }

    pub fn set_conversation_id(&mut self, id: impl Into<String>) {
        self.conversation_id = Some(id.into());
    }

    pub fn set_pending(&mut self, pending: bool) {
        self.pending = pending;
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_transcript_is_empty() {
        let transcript = Transcript::new();
        assert!(transcript.is_empty());
        assert_eq!(transcript.conversation_id(), None);
        assert!(!transcript.is_pending());
    }

    #[test]
    fn test_append_keeps_insertion_order() {
        let mut transcript = Transcript::new();
        transcript.append_message(Role::User, "first");
        transcript.append_message(Role::Assistant, "second");
        transcript.append_message(Role::System, "third");

        let contents: Vec<&str> = transcript.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["first", "second", "third"]);
        assert_eq!(transcript.messages()[2].role, Role::System);
    }

    #[test]
    fn test_replace_discards_previous_messages() {
        let mut transcript = Transcript::new();
        transcript.append_message(Role::User, "local");
        transcript.replace_messages(vec![Message::user("server"), Message::assistant("reply")]);

        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.messages()[0], Message::user("server"));
    }

    #[test]
    fn test_conversation_id_is_overwritten() {
        let mut transcript = Transcript::new();
        transcript.set_conversation_id("abc");
        transcript.set_conversation_id("def");
        assert_eq!(transcript.conversation_id(), Some("def"));
    }
}
