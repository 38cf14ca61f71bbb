//! Domain and wire types for the Nova client.
//!
//! Each wire type mirrors the backend's JSON contract exactly; serde
//! derives handle the camelCase field names used on the wire.

mod bot_message_request;
mod bot_message_response;
mod conversation;
mod login_request;
mod login_response;
mod message;
mod signup_request;
mod signup_response;

pub use bot_message_request::BotMessageRequest;
pub use bot_message_response::{BotMessageResponse, BotReply};
pub use conversation::{Conversation, ConversationId};
pub use login_request::LoginRequest;
pub use login_response::LoginResponse;
pub use message::{Message, Sender};
pub use signup_request::SignupRequest;
pub use signup_response::SignupResponse;
