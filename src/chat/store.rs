//! Conversation state ownership.
//!
//! The store is the single source of truth for message order and
//! conversation identity. Messages are append-only; the only mutation
//! it permits after an append is growing the text of the most recently
//! appended bot placeholder, addressed by the handle returned when the
//! placeholder was created.

use crate::error::{Error, Result};
use crate::types::{Conversation, ConversationId, Message, Sender};

/// Handle to a message in the store.
///
/// Reveals address their target through this handle rather than "the
/// last message", so a stale reveal can never touch a newer message.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MessageId(usize);

impl MessageId {
    /// Position of the message in display order.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Owns the ordered message list and the conversation identity.
#[derive(Debug, Default)]
pub struct ConversationStore {
    conversation: Conversation,
}

impl ConversationStore {
    /// Creates an empty store with no conversation identity.
    pub fn new() -> Self {
        Self {
            conversation: Conversation::new(),
        }
    }

    /// The messages in display order.
    pub fn messages(&self) -> &[Message] {
        &self.conversation.messages
    }

    /// The number of messages in the conversation.
    pub fn len(&self) -> usize {
        self.conversation.messages.len()
    }

    /// Returns true if no messages have been exchanged.
    pub fn is_empty(&self) -> bool {
        self.conversation.messages.is_empty()
    }

    /// The backend-assigned conversation identity, once known.
    pub fn conversation_id(&self) -> Option<&ConversationId> {
        self.conversation.id.as_ref()
    }

    /// Returns the message behind a handle.
    pub fn message(&self, id: MessageId) -> Option<&Message> {
        self.conversation.messages.get(id.0)
    }

    /// Appends a user message and returns its handle.
    pub fn append_user(&mut self, text: &str) -> MessageId {
        self.push(Message::user(text))
    }

    /// Appends an empty bot message and returns its handle.
    ///
    /// The handle is the mutation target for a subsequent reveal.
    pub fn append_bot_placeholder(&mut self) -> MessageId {
        self.push(Message::bot_placeholder())
    }

    /// Appends a bot-sender failure notice and returns its handle.
    pub fn append_error(&mut self, text: &str) -> MessageId {
        self.push(Message::error(text))
    }

    /// Adopts the backend-assigned identity if none is set yet.
    ///
    /// The identity transitions at most once. A later response carrying
    /// a different identity is a backend anomaly; it is ignored and
    /// logged rather than adopted.
    pub fn set_conversation_id(&mut self, id: ConversationId) {
        match &self.conversation.id {
            None => {
                tracing::debug!(conversation = id.as_str(), "conversation identity assigned");
                self.conversation.id = Some(id);
            }
            Some(existing) if *existing != id => {
                tracing::warn!(
                    kept = existing.as_str(),
                    received = id.as_str(),
                    "backend returned a different conversation id; keeping the first"
                );
            }
            Some(_) => {}
        }
    }

    /// Appends one character to the message behind `id`.
    ///
    /// The target must be the most recently appended message and must
    /// be a bot placeholder; anything else violates the append-only
    /// invariant and is rejected.
    pub fn reveal_char(&mut self, id: MessageId, ch: char) -> Result<()> {
        let last = self.conversation.messages.len().checked_sub(1);
        if last != Some(id.0) {
            return Err(Error::validation(
                "reveal target is no longer the last message",
                Some("message".to_string()),
            ));
        }
        let message = &mut self.conversation.messages[id.0];
        if message.sender != Sender::Bot || message.is_error {
            return Err(Error::validation(
                "reveal target is not a bot placeholder",
                Some("message".to_string()),
            ));
        }
        message.text.push(ch);
        Ok(())
    }

    fn push(&mut self, message: Message) -> MessageId {
        self.conversation.messages.push(message);
        MessageId(self.conversation.messages.len() - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_keep_insertion_order() {
        let mut store = ConversationStore::new();
        store.append_user("Hello");
        store.append_bot_placeholder();
        store.append_user("again");

        let senders: Vec<Sender> = store.messages().iter().map(|m| m.sender).collect();
        assert_eq!(senders, vec![Sender::User, Sender::Bot, Sender::User]);
    }

    #[test]
    fn reveal_grows_the_placeholder() {
        let mut store = ConversationStore::new();
        store.append_user("Hello");
        let target = store.append_bot_placeholder();

        store.reveal_char(target, 'H').unwrap();
        store.reveal_char(target, 'i').unwrap();
        assert_eq!(store.message(target).unwrap().text, "Hi");
    }

    #[test]
    fn reveal_rejects_stale_target() {
        let mut store = ConversationStore::new();
        let stale = store.append_bot_placeholder();
        store.append_user("next");

        let err = store.reveal_char(stale, 'x').unwrap_err();
        assert!(err.is_validation());
        assert_eq!(store.message(stale).unwrap().text, "");
    }

    #[test]
    fn reveal_rejects_non_placeholder_target() {
        let mut store = ConversationStore::new();
        let user = store.append_user("Hello");
        assert!(store.reveal_char(user, 'x').is_err());

        let error = store.append_error("boom");
        assert!(store.reveal_char(error, 'x').is_err());
    }

    #[test]
    fn conversation_id_set_once() {
        let mut store = ConversationStore::new();
        assert!(store.conversation_id().is_none());

        store.set_conversation_id(ConversationId::from("abc123"));
        assert_eq!(store.conversation_id().unwrap().as_str(), "abc123");

        // A differing id from a later response is ignored.
        store.set_conversation_id(ConversationId::from("zzz999"));
        assert_eq!(store.conversation_id().unwrap().as_str(), "abc123");

        // The same id is a no-op.
        store.set_conversation_id(ConversationId::from("abc123"));
        assert_eq!(store.conversation_id().unwrap().as_str(), "abc123");
    }

    #[test]
    fn error_messages_are_flagged() {
        let mut store = ConversationStore::new();
        let id = store.append_error("⚠️ Something went wrong!");
        let message = store.message(id).unwrap();
        assert_eq!(message.sender, Sender::Bot);
        assert!(message.is_error);
        assert_eq!(message.text, "⚠️ Something went wrong!");
    }

    #[test]
    fn user_text_is_stored_verbatim() {
        let mut store = ConversationStore::new();
        let id = store.append_user("  spaced  ");
        assert_eq!(store.message(id).unwrap().text, "  spaced  ");
    }
}
