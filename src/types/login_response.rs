use serde::{Deserialize, Serialize};

/// Response body for a successful `POST /api/auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// The session token (a JWT) to present on subsequent requests.
    pub token: String,
}
