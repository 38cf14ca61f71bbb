use serde::{Deserialize, Serialize};

use crate::types::ConversationId;

/// Request body for `POST /bot/v1/message`.
///
/// `conversationId` is serialized as an explicit `null` on the first
/// exchange; the backend allocates an identity in response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotMessageRequest {
    /// The raw user input, untrimmed.
    pub text: String,

    /// The conversation identity, once known.
    pub conversation_id: Option<ConversationId>,
}

impl BotMessageRequest {
    /// Creates a new request for the given input and conversation.
    pub fn new(text: impl Into<String>, conversation_id: Option<ConversationId>) -> Self {
        Self {
            text: text.into(),
            conversation_id,
        }
    }
}
