//! Chat session module for conversations with the Nova backend.
//!
//! This module provides the client-side chat core: conversation state,
//! one-request-per-send orchestration, and the character-by-character
//! reveal of replies. It supports:
//!
//! - An append-only conversation store with a single, handle-addressed
//!   mutation target
//! - A cancellable reveal schedule that simulates live typing
//! - Slash commands for session control
//! - Configurable base URL, timeout, and reveal speed
//!
//! # Architecture
//!
//! The module is organized into several components:
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`store`]: conversation state and identity
//! - [`typing`]: the reveal state machine
//! - [`session`]: the send orchestrator tying the pieces together
//! - [`commands`]: slash command parsing and handling

mod commands;
mod config;
mod session;
mod store;
mod typing;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig};
pub use session::{
    BotTransport, ChatSession, RevealOutcome, SEND_FAILURE_TEXT, SendOutcome, SessionStats,
};
pub use store::{ConversationStore, MessageId};
pub use typing::{TypingAnimator, TypingState};
