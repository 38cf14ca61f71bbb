use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Message;

/// An opaque backend-assigned key correlating all messages in one chat
/// thread.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ConversationId {
    fn from(id: String) -> Self {
        ConversationId(id)
    }
}

impl From<&str> for ConversationId {
    fn from(id: &str) -> Self {
        ConversationId(id.to_string())
    }
}

/// A conversation: the ordered message history plus the backend-assigned
/// identity, once known.
///
/// The identity is absent until the first successful exchange and is set
/// at most once; the message list is insertion-ordered and never
/// reordered or pruned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    /// Backend-assigned identity; `None` until the first successful
    /// exchange.
    pub id: Option<ConversationId>,

    /// Messages in display order.
    pub messages: Vec<Message>,
}

impl Conversation {
    /// Creates a new, empty conversation with no identity.
    pub fn new() -> Self {
        Self {
            id: None,
            messages: Vec::new(),
        }
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}
