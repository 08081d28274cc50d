//! Explicit session credential passed to the HTTP collaborator.
//!
//! There is no ambient token store: whoever builds an
//! [`crate::api::HttpBoardApi`] hands it a `Session`, and invalidating a
//! session means building a new client.

use std::fmt;

use uuid::Uuid;

/// Bearer credential plus the identity it was issued for, when known.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    email: Option<String>,
    user_id: Option<Uuid>,
}

impl Session {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into(), email: None, user_id: None }
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn with_user_id(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    #[must_use]
    pub fn user_id(&self) -> Option<Uuid> {
        self.user_id
    }

    /// Value for the `Authorization` header.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("email", &self.email)
            .field("user_id", &self.user_id)
            .finish()
    }
}
