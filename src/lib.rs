// Public modules
pub mod auth;
pub mod chat;
pub mod client;
pub mod client_logger;
pub mod error;
pub mod observability;
pub mod render;
pub mod types;

// Re-exports
pub use auth::{AuthToken, SessionContext, TokenClaims};
pub use client::Nova;
pub use client_logger::{ClientLogger, TracingLogger};
pub use error::{Error, Result};
pub use types::*;
