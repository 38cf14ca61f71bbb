//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which owns conversation
//! state and drives one request/response cycle per user-initiated send,
//! including the incremental reveal of each reply.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::Nova;
use crate::chat::config::ChatConfig;
use crate::chat::store::{ConversationStore, MessageId};
use crate::chat::typing::{TypingAnimator, TypingState};
use crate::error::Result;
use crate::observability::{REVEAL_TICKS, REVEALS_CANCELLED, SEND_CYCLES, SEND_FAILURES, SEND_REJECTED};
use crate::render::Renderer;
use crate::types::{BotReply, ConversationId, Message};

/// The user-visible text appended when a send cycle fails.
///
/// Network and backend failures both collapse to this one message; the
/// distinction survives only in the logs.
pub const SEND_FAILURE_TEXT: &str = "⚠️ Something went wrong!";

/// Transport expected by the chat session.
///
/// [`Nova`] is the production implementation; tests substitute scripted
/// fakes.
#[async_trait::async_trait]
pub trait BotTransport: Send + Sync {
    /// Send one user message and return the validated reply.
    async fn send_message(
        &self,
        text: &str,
        conversation_id: Option<&ConversationId>,
    ) -> Result<BotReply>;
}

#[async_trait::async_trait]
impl BotTransport for Nova {
    async fn send_message(
        &self,
        text: &str,
        conversation_id: Option<&ConversationId>,
    ) -> Result<BotReply> {
        Nova::send_message(self, text, conversation_id).await
    }
}

/// How a call to [`ChatSession::send`] concluded.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The exchange succeeded; a placeholder was appended and a reveal
    /// is scheduled against it.
    Sent {
        /// Handle of the placeholder message.
        message: MessageId,
    },

    /// The exchange failed; a failure notice was appended.
    Failed {
        /// Handle of the failure notice.
        message: MessageId,
    },

    /// Ignored: the input was empty or whitespace-only.
    RejectedEmpty,

    /// Ignored: a cycle was already in flight.
    RejectedBusy,
}

/// How a call to [`ChatSession::drive_reveal`] concluded.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RevealOutcome {
    /// Every character was revealed.
    Completed,

    /// The reveal was cancelled before completion; the placeholder
    /// keeps whatever text had been revealed.
    Cancelled,

    /// No reveal was scheduled.
    Idle,
}

struct ActiveReveal {
    animator: TypingAnimator,
    token: CancellationToken,
}

/// Aggregated stats for a chat session.
#[derive(Debug, Clone)]
pub struct SessionStats {
    /// The number of messages in the conversation.
    pub message_count: usize,
    /// The backend-assigned conversation identity, if known.
    pub conversation_id: Option<String>,
    /// Completed send cycles, including failed ones.
    pub send_cycles: u64,
    /// Send cycles that ended on the failure path.
    pub failed_cycles: u64,
    /// Whether a reveal is currently scheduled.
    pub reveal_pending: bool,
    /// The interval between reveal ticks.
    pub reveal_interval: Duration,
    /// The timeout applied to backend requests.
    pub request_timeout: Duration,
}

/// A chat session that owns conversation state and drives message
/// exchange with the backend.
///
/// The session serializes request/response cycles: a `sending` gate
/// rejects a second send while one is in flight, and a new cycle
/// cancels any reveal still running from the previous one before it
/// touches the store.
pub struct ChatSession<T: BotTransport> {
    transport: T,
    config: ChatConfig,
    store: ConversationStore,
    input: String,
    sending: bool,
    reveal: Option<ActiveReveal>,
    send_cycles: u64,
    failed_cycles: u64,
}

impl ChatSession<Nova> {
    /// Creates a new chat session with the given client and configuration.
    pub fn new(client: Nova, config: ChatConfig) -> Self {
        Self::with_transport(client, config)
    }
}

impl<T: BotTransport> ChatSession<T> {
    /// Creates a new chat session with a custom transport.
    pub fn with_transport(transport: T, config: ChatConfig) -> Self {
        Self {
            transport,
            config,
            store: ConversationStore::new(),
            input: String::new(),
            sending: false,
            reveal: None,
            send_cycles: 0,
            failed_cycles: 0,
        }
    }

    /// The messages exchanged so far, in display order.
    pub fn messages(&self) -> &[Message] {
        self.store.messages()
    }

    /// The number of messages in the conversation.
    pub fn message_count(&self) -> usize {
        self.store.len()
    }

    /// The backend-assigned conversation identity, once known.
    pub fn conversation_id(&self) -> Option<&ConversationId> {
        self.store.conversation_id()
    }

    /// Read access to the underlying store.
    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// Returns true while a request/response cycle is in flight.
    pub fn is_sending(&self) -> bool {
        self.sending
    }

    /// Replaces the compose buffer.
    pub fn set_input(&mut self, text: &str) {
        self.input = text.to_string();
    }

    /// The current compose buffer.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Sends the compose buffer.
    ///
    /// The buffer is cleared when a cycle actually runs; rejected calls
    /// leave it untouched so the user keeps what they typed.
    pub async fn send_input(&mut self) -> SendOutcome {
        let raw = self.input.clone();
        self.send(&raw).await
    }

    /// Drives exactly one request/response cycle.
    ///
    /// The call is a no-op when the trimmed input is empty or a cycle
    /// is already in flight. Otherwise it appends the user's message,
    /// performs a single request attempt, and on success appends a
    /// placeholder and schedules a reveal of the reply; on any failure
    /// it appends a fixed failure notice instead. Failures never
    /// propagate out of this method.
    ///
    /// Cleanup (clearing the compose buffer and dropping the `sending`
    /// gate) runs on every exit path of a cycle.
    pub async fn send(&mut self, raw_input: &str) -> SendOutcome {
        let trimmed = raw_input.trim();
        if trimmed.is_empty() {
            return SendOutcome::RejectedEmpty;
        }
        if self.sending {
            SEND_REJECTED.click();
            return SendOutcome::RejectedBusy;
        }

        // A reveal still running from the previous cycle loses its
        // mutation rights before this cycle touches the store.
        self.cancel_reveal();

        self.sending = true;
        SEND_CYCLES.click();
        self.send_cycles += 1;
        self.store.append_user(trimmed);

        // The wire request carries the raw input, untrimmed.
        let result = self
            .transport
            .send_message(raw_input, self.store.conversation_id())
            .await;

        let outcome = match result {
            Ok(reply) => {
                let target = self.store.append_bot_placeholder();
                self.begin_reveal(target, &reply.bot_message);
                if let Some(id) = reply.conversation_id {
                    self.store.set_conversation_id(id);
                }
                SendOutcome::Sent { message: target }
            }
            Err(err) => {
                SEND_FAILURES.click();
                self.failed_cycles += 1;
                let kind = if err.is_network_failure() {
                    "network"
                } else {
                    "backend"
                };
                tracing::warn!(error = %err, kind, "send cycle failed");
                let message = self.store.append_error(SEND_FAILURE_TEXT);
                SendOutcome::Failed { message }
            }
        };

        // Guaranteed cleanup: both paths above fall through to here.
        self.input.clear();
        self.sending = false;
        outcome
    }

    /// Returns true while a reveal is scheduled or running.
    pub fn reveal_pending(&self) -> bool {
        self.reveal.is_some()
    }

    /// Lifecycle state of the current reveal; Idle when none is
    /// scheduled.
    pub fn typing_state(&self) -> TypingState {
        self.reveal
            .as_ref()
            .map(|active| active.animator.state())
            .unwrap_or(TypingState::Idle)
    }

    /// A detached handle that cancels the scheduled reveal.
    ///
    /// The handle stays valid while the reveal runs, so an interrupt
    /// handler can stop it without access to the session.
    pub fn reveal_handle(&self) -> Option<CancellationToken> {
        self.reveal.as_ref().map(|active| active.token.clone())
    }

    /// Cancels the scheduled reveal, if any.
    ///
    /// The placeholder keeps whatever text had been revealed; nothing
    /// mutates it afterwards.
    pub fn cancel_reveal(&mut self) -> bool {
        match self.reveal.take() {
            Some(active) => {
                active.token.cancel();
                REVEALS_CANCELLED.click();
                tracing::debug!(
                    remaining = active.animator.remaining(),
                    "reveal cancelled"
                );
                true
            }
            None => false,
        }
    }

    /// Runs the scheduled reveal to completion, one character per tick.
    ///
    /// Rendering happens as each character lands in the store. The loop
    /// stops early when `interrupt` is raised or the reveal's handle is
    /// cancelled.
    pub async fn drive_reveal(
        &mut self,
        renderer: &mut dyn Renderer,
        interrupt: &AtomicBool,
    ) -> RevealOutcome {
        let token = match &self.reveal {
            Some(active) => active.token.clone(),
            None => return RevealOutcome::Idle,
        };

        loop {
            {
                let Some(active) = self.reveal.as_ref() else {
                    return RevealOutcome::Cancelled;
                };
                if active.animator.is_done() {
                    break;
                }
            }

            tokio::time::sleep(self.config.reveal_interval).await;

            if interrupt.load(Ordering::Relaxed) || token.is_cancelled() {
                if self.cancel_reveal() {
                    renderer.print_interrupted();
                }
                return RevealOutcome::Cancelled;
            }

            let (target, ch) = {
                let Some(active) = self.reveal.as_mut() else {
                    return RevealOutcome::Cancelled;
                };
                let target = active.animator.target();
                match active.animator.next_char() {
                    Some(ch) => (target, ch),
                    None => break,
                }
            };

            if let Err(err) = self.store.reveal_char(target, ch) {
                tracing::warn!(error = %err, "reveal target invalidated; stopping");
                self.reveal = None;
                return RevealOutcome::Cancelled;
            }
            REVEAL_TICKS.click();
            let mut buf = [0u8; 4];
            renderer.print_text(ch.encode_utf8(&mut buf));
        }

        self.reveal = None;
        renderer.finish_response();
        RevealOutcome::Completed
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            message_count: self.store.len(),
            conversation_id: self
                .store
                .conversation_id()
                .map(|id| id.as_str().to_string()),
            send_cycles: self.send_cycles,
            failed_cycles: self.failed_cycles,
            reveal_pending: self.reveal.is_some(),
            reveal_interval: self.config.reveal_interval,
            request_timeout: self.config.request_timeout,
        }
    }

    fn begin_reveal(&mut self, target: MessageId, full_text: &str) {
        let animator = TypingAnimator::new(target, full_text);
        if animator.is_done() {
            // Zero-length reveal: nothing to schedule.
            return;
        }
        self.reveal = Some(ActiveReveal {
            animator,
            token: CancellationToken::new(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use crate::error::Error;
    use crate::types::Sender;

    struct FakeTransport {
        replies: Mutex<VecDeque<Result<BotReply>>>,
    }

    impl FakeTransport {
        fn new(replies: Vec<Result<BotReply>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
            }
        }
    }

    #[async_trait::async_trait]
    impl BotTransport for FakeTransport {
        async fn send_message(
            &self,
            _text: &str,
            _conversation_id: Option<&ConversationId>,
        ) -> Result<BotReply> {
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(Error::connection("no scripted reply", None)))
        }
    }

    struct NullRenderer;

    impl Renderer for NullRenderer {
        fn print_text(&mut self, _text: &str) {}
        fn print_error(&mut self, _error: &str) {}
        fn print_info(&mut self, _info: &str) {}
        fn finish_response(&mut self) {}
        fn print_interrupted(&mut self) {}
    }

    fn reply(text: &str, conversation_id: Option<&str>) -> Result<BotReply> {
        Ok(BotReply {
            bot_message: text.to_string(),
            conversation_id: conversation_id.map(ConversationId::from),
        })
    }

    fn session(replies: Vec<Result<BotReply>>) -> ChatSession<FakeTransport> {
        ChatSession::with_transport(FakeTransport::new(replies), ChatConfig::new())
    }

    #[tokio::test]
    async fn send_appends_user_then_placeholder() {
        let mut session = session(vec![reply("Hi there!", Some("abc123"))]);
        session.set_input("Hello");

        let outcome = session.send_input().await;
        assert!(matches!(outcome, SendOutcome::Sent { .. }));

        let messages = session.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].sender, Sender::User);
        assert_eq!(messages[0].text, "Hello");
        assert_eq!(messages[1].sender, Sender::Bot);
        assert_eq!(messages[1].text, "");
        assert_eq!(session.conversation_id().unwrap().as_str(), "abc123");
        assert!(!session.is_sending());
        assert!(session.input().is_empty());
        assert!(session.reveal_pending());
        assert_eq!(session.typing_state(), TypingState::Revealing);
    }

    #[tokio::test(start_paused = true)]
    async fn reveal_completes_full_text() {
        let mut session = session(vec![reply("Hi there!", Some("abc123"))]);
        let outcome = session.send("Hello").await;
        let SendOutcome::Sent { message } = outcome else {
            panic!("expected a successful send");
        };

        let interrupt = AtomicBool::new(false);
        let outcome = session.drive_reveal(&mut NullRenderer, &interrupt).await;
        assert_eq!(outcome, RevealOutcome::Completed);
        assert_eq!(session.store().message(message).unwrap().text, "Hi there!");
        assert!(!session.reveal_pending());
        assert_eq!(session.typing_state(), TypingState::Idle);
    }

    #[tokio::test]
    async fn failed_cycle_appends_fixed_error() {
        let mut session = session(vec![Err(Error::timeout("deadline", Some(30.0)))]);
        session.set_input("test");

        let outcome = session.send_input().await;
        assert!(matches!(outcome, SendOutcome::Failed { .. }));

        let messages = session.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].text, "test");
        assert_eq!(messages[1].sender, Sender::Bot);
        assert!(messages[1].is_error);
        assert_eq!(messages[1].text, SEND_FAILURE_TEXT);
        assert!(!session.is_sending());
        assert!(session.input().is_empty());
        assert!(!session.reveal_pending());
    }

    #[tokio::test]
    async fn whitespace_send_is_a_noop() {
        let mut session = session(vec![reply("unused", None)]);
        session.set_input("   ");

        assert_eq!(session.send_input().await, SendOutcome::RejectedEmpty);
        assert_eq!(session.message_count(), 0);
        // Rejected calls leave the compose buffer alone.
        assert_eq!(session.input(), "   ");
    }

    #[tokio::test]
    async fn busy_send_is_rejected() {
        let mut session = session(vec![reply("unused", None)]);
        session.sending = true;

        assert_eq!(session.send("hello").await, SendOutcome::RejectedBusy);
        assert_eq!(session.message_count(), 0);
        assert!(session.is_sending());
    }

    #[tokio::test(start_paused = true)]
    async fn conversation_id_is_never_overwritten() {
        let mut session = session(vec![
            reply("first", Some("abc123")),
            reply("second", Some("zzz999")),
        ]);
        let interrupt = AtomicBool::new(false);

        session.send("one").await;
        session.drive_reveal(&mut NullRenderer, &interrupt).await;
        session.send("two").await;

        assert_eq!(session.conversation_id().unwrap().as_str(), "abc123");
    }

    #[tokio::test(start_paused = true)]
    async fn new_send_cancels_pending_reveal() {
        let mut session = session(vec![
            reply("Hello!", Some("abc123")),
            reply("World", None),
        ]);

        let SendOutcome::Sent { message: first } = session.send("one").await else {
            panic!("expected a successful send");
        };
        // The first reveal never runs; the next cycle cancels it.
        let SendOutcome::Sent { message: second } = session.send("two").await else {
            panic!("expected a successful send");
        };

        let interrupt = AtomicBool::new(false);
        let outcome = session.drive_reveal(&mut NullRenderer, &interrupt).await;
        assert_eq!(outcome, RevealOutcome::Completed);

        assert_eq!(session.store().message(first).unwrap().text, "");
        assert_eq!(session.store().message(second).unwrap().text, "World");
        assert_eq!(session.message_count(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn interrupt_cancels_reveal() {
        let mut session = session(vec![reply("Hi there!", None)]);
        let SendOutcome::Sent { message } = session.send("Hello").await else {
            panic!("expected a successful send");
        };

        let interrupt = AtomicBool::new(true);
        let outcome = session.drive_reveal(&mut NullRenderer, &interrupt).await;
        assert_eq!(outcome, RevealOutcome::Cancelled);
        assert_eq!(session.store().message(message).unwrap().text, "");
        assert!(!session.reveal_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn detached_handle_cancels_mid_reveal() {
        let mut session = session(vec![reply("Hello, world", None)]);
        session.send("hi").await;

        let token = session.reveal_handle().unwrap();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(95)).await;
            token.cancel();
        });

        let interrupt = AtomicBool::new(false);
        let outcome = session.drive_reveal(&mut NullRenderer, &interrupt).await;
        assert_eq!(outcome, RevealOutcome::Cancelled);

        // Three 30 ms ticks elapse before the cancel at 95 ms lands.
        assert_eq!(session.messages()[1].text, "Hel");
        assert!(!session.reveal_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn drive_without_reveal_is_idle() {
        let mut session = session(vec![]);
        let interrupt = AtomicBool::new(false);
        let outcome = session.drive_reveal(&mut NullRenderer, &interrupt).await;
        assert_eq!(outcome, RevealOutcome::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn stats_track_cycles() {
        let mut session = session(vec![
            reply("Hi there!", Some("abc123")),
            Err(Error::connection("refused", None)),
        ]);
        let interrupt = AtomicBool::new(false);

        session.send("one").await;
        session.drive_reveal(&mut NullRenderer, &interrupt).await;
        session.send("two").await;

        let stats = session.stats();
        assert_eq!(stats.message_count, 4);
        assert_eq!(stats.conversation_id.as_deref(), Some("abc123"));
        assert_eq!(stats.send_cycles, 2);
        assert_eq!(stats.failed_cycles, 1);
        assert!(!stats.reveal_pending);
    }
}
