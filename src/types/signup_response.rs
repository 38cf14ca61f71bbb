use serde::{Deserialize, Serialize};

/// Response body for `POST /api/auth/signup`.
///
/// Signup does not return a token; the user logs in afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupResponse {
    /// Human-readable confirmation from the backend.
    pub message: String,
}
