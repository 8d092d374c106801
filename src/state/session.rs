use std::fmt;

use crate::net::types::{LoginResponse, Role, User};

/// Bearer token plus the user it was issued to.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}

/// In-memory session for the lifetime of the process.
///
/// Created by a successful login, dropped on logout or when the server
/// rejects the token. Never persisted.
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    current: Option<Session>,
}

impl SessionState {
    /// Replace any existing session with the one from a login response.
    pub fn begin(&mut self, response: LoginResponse) -> &Session {
        self.current.insert(Session { token: response.token, user: response.user })
    }

    /// Drop the session, returning it if there was one.
    pub fn clear(&mut self) -> Option<Session> {
        self.current.take()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.token.as_str())
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.current.as_ref().map(|s| &s.user)
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.user().map(|u| u.role)
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;
