//! Session credential handling.
//!
//! The backend issues a JWT on login. Rather than reading an ambient
//! stored token from scattered call sites, the credential lives in an
//! explicit [`SessionContext`] that is passed to the components that
//! need it; `login` and `logout` are the only mutators.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;

/// An opaque session token issued by the backend on login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wraps a raw token string.
    pub fn new(token: impl Into<String>) -> Self {
        AuthToken(token.into())
    }

    /// Returns the raw token for use in an `Authorization` header.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Best-effort decode of the JWT payload segment.
    ///
    /// The token is treated as opaque for all protocol purposes; claims
    /// are only surfaced for display. Returns `None` for tokens that are
    /// not three-segment JWTs or whose payload does not decode.
    pub fn claims(&self) -> Option<TokenClaims> {
        let mut segments = self.0.split('.');
        let _header = segments.next()?;
        let payload = segments.next()?;
        segments.next()?;
        let decoded = URL_SAFE_NO_PAD.decode(payload.as_bytes()).ok()?;
        serde_json::from_slice(&decoded).ok()
    }
}

impl From<String> for AuthToken {
    fn from(token: String) -> Self {
        AuthToken(token)
    }
}

/// Claims decoded from a JWT payload, for display only.
///
/// Unknown fields are ignored; every known field is optional because
/// the backend's claim set is not part of the contract.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TokenClaims {
    /// Subject, typically the account identifier.
    #[serde(default)]
    pub sub: Option<String>,

    /// Account email, when the backend includes it.
    #[serde(default)]
    pub email: Option<String>,

    /// Expiry as seconds since the Unix epoch.
    #[serde(default)]
    pub exp: Option<u64>,
}

/// Holds the session credential for the lifetime of the process.
///
/// Presence of a token is what gates the chat surface: the binary only
/// mounts a chat session while `is_authenticated` returns true, and
/// logout both clears the token and discards the conversation.
#[derive(Debug, Default)]
pub struct SessionContext {
    token: Option<AuthToken>,
}

impl SessionContext {
    /// Creates a logged-out session context.
    pub fn new() -> Self {
        Self { token: None }
    }

    /// Stores the credential obtained from a successful login.
    pub fn login(&mut self, token: AuthToken) {
        self.token = Some(token);
    }

    /// Clears the credential, returning the token that was held.
    pub fn logout(&mut self) -> Option<AuthToken> {
        self.token.take()
    }

    /// Returns true while a credential is present.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Returns the held credential, if any.
    pub fn token(&self) -> Option<&AuthToken> {
        self.token.as_ref()
    }
}
