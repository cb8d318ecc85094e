//! Explicit session context for authenticated calls.

use domain::models::user::AuthResponse;
use domain::models::User;

/// An authenticated session: bearer token plus, when known, the user it belongs to.
///
/// Sessions are values threaded through calls; nothing is read from ambient storage.
#[derive(Clone, PartialEq)]
pub struct Session {
    token: String,
    user: Option<User>,
}

impl Session {
    /// Session from a pre-issued token whose user is not yet known.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            user: None,
        }
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.user = Some(user);
        self
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }
}

impl From<AuthResponse> for Session {
    fn from(response: AuthResponse) -> Self {
        Self::new(response.token).with_user(response.user)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("user", &self.user.as_ref().map(|u| &u.username))
            .finish()
    }
}
