//! The authenticated-user context.
//!
//! A [`Session`] is created once the backend has authenticated a user and is
//! passed explicitly to every operation acting on that user's data. Logging
//! out means dropping it; there is no process-wide current user.

/// Identity of the signed-in user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    user_id: String,
    username: String,
    email: String,
}

impl Session {
    /// Usernames are stored lowercase, so the given name is normalized.
    pub fn new(
        user_id: impl Into<String>,
        username: impl AsRef<str>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.as_ref().trim().to_lowercase(),
            email: email.into(),
        }
    }

    /// Backend id of the signed-in user.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Lowercase username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Account email.
    pub fn email(&self) -> &str {
        &self.email
    }
}
