use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::ConversationId;

/// Response body for `POST /bot/v1/message`, exactly as it appears on
/// the wire. `botMessage` is required for the success path; a 200
/// without it is treated as a backend failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotMessageResponse {
    /// The bot's reply, when the exchange succeeded.
    #[serde(default)]
    pub bot_message: Option<String>,

    /// The conversation identity, assigned on the first exchange.
    #[serde(default)]
    pub conversation_id: Option<ConversationId>,
}

/// A validated reply: the wire response after checking that a non-empty
/// `botMessage` is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotReply {
    /// The bot's reply text, guaranteed non-empty.
    pub bot_message: String,

    /// The conversation identity carried by the response, if any.
    pub conversation_id: Option<ConversationId>,
}

impl TryFrom<BotMessageResponse> for BotReply {
    type Error = Error;

    fn try_from(response: BotMessageResponse) -> Result<BotReply> {
        match response.bot_message {
            Some(bot_message) if !bot_message.is_empty() => Ok(BotReply {
                bot_message,
                conversation_id: response.conversation_id,
            }),
            _ => Err(Error::serialization(
                "response missing botMessage field",
                None,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{from_value, json};

    #[test]
    fn full_response_parses() {
        let response: BotMessageResponse = from_value(json!({
            "botMessage": "Hi there!",
            "conversationId": "abc123"
        }))
        .unwrap();
        let reply = BotReply::try_from(response).unwrap();
        assert_eq!(reply.bot_message, "Hi there!");
        assert_eq!(reply.conversation_id, Some(ConversationId::from("abc123")));
    }

    #[test]
    fn conversation_id_is_optional() {
        let response: BotMessageResponse =
            from_value(json!({"botMessage": "Hi there!"})).unwrap();
        let reply = BotReply::try_from(response).unwrap();
        assert!(reply.conversation_id.is_none());
    }

    #[test]
    fn missing_bot_message_is_rejected() {
        let response: BotMessageResponse =
            from_value(json!({"conversationId": "abc123"})).unwrap();
        let err = BotReply::try_from(response).unwrap_err();
        assert!(err.is_backend_failure());
    }

    #[test]
    fn empty_bot_message_is_rejected() {
        let response: BotMessageResponse = from_value(json!({"botMessage": ""})).unwrap();
        assert!(BotReply::try_from(response).is_err());
    }
}
