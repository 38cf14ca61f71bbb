use serde::{Deserialize, Serialize};

/// The author of a message in a conversation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// A message typed by the user.
    User,

    /// A message produced by the bot, including locally synthesized
    /// failure notices.
    Bot,
}

/// A single message in a conversation.
///
/// Messages are append-only. The one exception is the most recently
/// appended bot message, whose `text` grows one character at a time
/// while a reveal is in progress; no other message is ever mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who authored the message.
    pub sender: Sender,

    /// The message content.
    pub text: String,

    /// True only for locally synthesized failure notices; never set on
    /// a user message.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl Message {
    /// Creates a user message with the given text.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            is_error: false,
        }
    }

    /// Creates an empty bot message to be filled in by a reveal.
    pub fn bot_placeholder() -> Self {
        Self {
            sender: Sender::Bot,
            text: String::new(),
            is_error: false,
        }
    }

    /// Creates a bot-sender failure notice.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
            is_error: true,
        }
    }
}
