//! Session state machine.
//!
//! The authenticated/unauthenticated lifecycle is an explicit finite state
//! machine with a pure transition function. Two properties hold by
//! construction: a session is authenticated exactly when it carries both a
//! user and a token, and a loading session never carries an error.

use serde::Serialize;

use crate::identity::User;

/// States of the authentication lifecycle.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum SessionState {
    /// No session; the initial state.
    #[default]
    Anonymous,
    /// A login, registration or refresh call is in flight.
    Authenticating,
    /// A user and its bearer token are established.
    Authenticated { user: User, token: String },
    /// The last authentication attempt was rejected.
    Failed { message: String },
}

/// Events driving [`SessionState`] transitions.
#[derive(Clone, Debug)]
pub enum SessionEvent {
    /// A login, registration or refresh call was issued.
    Started,
    /// The backend accepted the call and returned a fresh identity.
    Succeeded { user: User, token: String },
    /// The backend rejected the call.
    Rejected { message: String },
    /// Explicit or forced logout teardown.
    LoggedOut,
    /// Drop any recorded error, leaving everything else untouched.
    ErrorCleared,
}

impl SessionState {
    /// Applies `event` and returns the next state.
    ///
    /// Entering [`SessionState::Authenticating`] drops any prior error.
    /// Clearing the error of a failed session resolves to
    /// [`SessionState::Anonymous`], which carries the same visible fields.
    #[must_use]
    pub fn apply(self, event: SessionEvent) -> SessionState {
        match event {
            SessionEvent::Started => SessionState::Authenticating,
            SessionEvent::Succeeded { user, token } => {
                SessionState::Authenticated { user, token }
            },
            SessionEvent::Rejected { message } => {
                SessionState::Failed { message }
            },
            SessionEvent::LoggedOut => SessionState::Anonymous,
            SessionEvent::ErrorCleared => match self {
                SessionState::Failed { .. } => SessionState::Anonymous,
                state => state,
            },
        }
    }

    #[inline]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated { .. })
    }

    #[inline]
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Authenticating)
    }

    /// Returns the established user, if any.
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated { user, .. } => Some(user),
            _ => None,
        }
    }

    /// Returns the established bearer token, if any.
    pub fn token(&self) -> Option<&str> {
        match self {
            SessionState::Authenticated { token, .. } => Some(token),
            _ => None,
        }
    }

    /// Returns the recorded error message, if any.
    pub fn error(&self) -> Option<&str> {
        match self {
            SessionState::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// Flattens the state into the record shape a view layer consumes.
    pub fn snapshot(&self) -> Session {
        Session {
            user: self.user().cloned(),
            token: self.token().map(str::to_owned),
            is_authenticated: self.is_authenticated(),
            is_loading: self.is_loading(),
            error: self.error().map(str::to_owned),
        }
    }
}

/// Flattened view of a [`SessionState`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}
