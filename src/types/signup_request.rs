use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Request body for `POST /api/auth/signup`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    /// Desired display name.
    pub username: String,

    /// Account email address.
    pub email: String,

    /// Account password.
    pub password: String,

    /// What the account will be used for.
    pub use_case: String,

    /// Self-reported experience level with AI assistants.
    pub experience: String,
}

impl SignupRequest {
    /// Validates that every required field is present.
    ///
    /// The backend rejects incomplete signups too; checking locally
    /// avoids a round trip for the common mistakes.
    pub fn validate(&self) -> Result<()> {
        for (value, param) in [
            (&self.username, "username"),
            (&self.email, "email"),
            (&self.password, "password"),
            (&self.use_case, "useCase"),
            (&self.experience, "experience"),
        ] {
            if value.trim().is_empty() {
                return Err(Error::validation(
                    "please fill in all required fields",
                    Some(param.to_string()),
                ));
            }
        }
        Ok(())
    }
}
