//! Logging trait for Nova client operations.
//!
//! This module provides the [`ClientLogger`] trait that allows users to
//! capture every exchange passing through the [`Nova`](crate::Nova)
//! client, preserving the internal failure taxonomy that the chat UI
//! collapses into a single error message.

use crate::error::Error;
use crate::types::{BotReply, ConversationId};

/// A trait for logging Nova client operations.
///
/// Implement this trait to record outbound messages, replies, and
/// failures for diagnostics. The default client installs no logger.
pub trait ClientLogger: Send + Sync {
    /// Log an outbound message request.
    ///
    /// Called once per `/bot/v1/message` request, before it is sent.
    fn log_request(&self, text: &str, conversation_id: Option<&ConversationId>);

    /// Log a validated reply from a successful exchange.
    fn log_reply(&self, reply: &BotReply);

    /// Log a failed exchange.
    ///
    /// The error keeps its internal classification (network versus
    /// backend failure) even though the chat surface shows a single
    /// fixed message for both.
    fn log_failure(&self, error: &Error);
}

/// A [`ClientLogger`] that forwards everything to `tracing` events.
pub struct TracingLogger;

impl ClientLogger for TracingLogger {
    fn log_request(&self, text: &str, conversation_id: Option<&ConversationId>) {
        tracing::debug!(
            chars = text.chars().count(),
            conversation = conversation_id.map(ConversationId::as_str),
            "sending message"
        );
    }

    fn log_reply(&self, reply: &BotReply) {
        tracing::debug!(
            chars = reply.bot_message.chars().count(),
            conversation = reply.conversation_id.as_ref().map(ConversationId::as_str),
            "received reply"
        );
    }

    fn log_failure(&self, error: &Error) {
        if error.is_network_failure() {
            tracing::warn!(error = %error, kind = "network", "exchange failed");
        } else {
            tracing::warn!(error = %error, kind = "backend", "exchange failed");
        }
    }
}
