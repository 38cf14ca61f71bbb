//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and
//! configuration structures for controlling chat behavior.

use std::time::Duration;

use arrrg_derive::CommandLine;

/// Default interval between reveal ticks.
const DEFAULT_REVEAL_INTERVAL_MS: u32 = 30;

/// Default timeout for backend requests.
const DEFAULT_REQUEST_TIMEOUT_MS: u32 = 30_000;

/// Command-line arguments for the nova-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Backend base URL.
    #[arrrg(optional, "Backend base URL (default: $NOVA_BASE_URL)", "URL")]
    pub base_url: Option<String>,

    /// Milliseconds between revealed characters.
    #[arrrg(optional, "Milliseconds per revealed character (default: 30)", "MS")]
    pub reveal_ms: Option<u32>,

    /// Request timeout in milliseconds.
    #[arrrg(optional, "Request timeout in milliseconds (default: 30000)", "MS")]
    pub timeout_ms: Option<u32>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Backend base URL; falls back to NOVA_BASE_URL when absent.
    pub base_url: Option<String>,

    /// Interval between reveal ticks.
    pub reveal_interval: Duration,

    /// Timeout for backend requests.
    pub request_timeout: Duration,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Base URL: from NOVA_BASE_URL at client construction
    /// - Reveal interval: 30 ms per character
    /// - Request timeout: 30 s
    /// - Color: enabled
    pub fn new() -> Self {
        Self {
            base_url: None,
            reveal_interval: Duration::from_millis(DEFAULT_REVEAL_INTERVAL_MS as u64),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS as u64),
            use_color: true,
        }
    }

    /// Sets the backend base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the interval between reveal ticks.
    pub fn with_reveal_interval(mut self, interval: Duration) -> Self {
        self.reveal_interval = interval;
        self
    }

    /// Sets the backend request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        ChatConfig {
            base_url: args.base_url,
            reveal_interval: Duration::from_millis(
                args.reveal_ms.unwrap_or(DEFAULT_REVEAL_INTERVAL_MS) as u64,
            ),
            request_timeout: Duration::from_millis(
                args.timeout_ms.unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS) as u64,
            ),
            use_color: !args.no_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ChatConfig::new();
        assert!(config.base_url.is_none());
        assert_eq!(config.reveal_interval, Duration::from_millis(30));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.use_color);
    }

    #[test]
    fn config_from_args_defaults() {
        let args = ChatArgs::default();
        let config = ChatConfig::from(args);
        assert!(config.base_url.is_none());
        assert_eq!(config.reveal_interval, Duration::from_millis(30));
        assert!(config.use_color);
    }

    #[test]
    fn config_from_args_custom() {
        let args = ChatArgs {
            base_url: Some("https://nova.example.com".to_string()),
            reveal_ms: Some(5),
            timeout_ms: Some(1_000),
            no_color: true,
        };
        let config = ChatConfig::from(args);
        assert_eq!(config.base_url.as_deref(), Some("https://nova.example.com"));
        assert_eq!(config.reveal_interval, Duration::from_millis(5));
        assert_eq!(config.request_timeout, Duration::from_secs(1));
        assert!(!config.use_color);
    }

    #[test]
    fn config_builder_pattern() {
        let config = ChatConfig::new()
            .with_base_url("https://nova.example.com")
            .with_reveal_interval(Duration::from_millis(10))
            .with_request_timeout(Duration::from_secs(5))
            .without_color();

        assert_eq!(config.base_url.as_deref(), Some("https://nova.example.com"));
        assert_eq!(config.reveal_interval, Duration::from_millis(10));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert!(!config.use_color);
    }
}
