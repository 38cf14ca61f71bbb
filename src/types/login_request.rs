use serde::{Deserialize, Serialize};

/// Request body for `POST /api/auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Account email address.
    pub email: String,

    /// Account password.
    pub password: String,
}

impl LoginRequest {
    /// Creates a new login request.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}
