//! Request identities and the scopes messages are addressed through.

use super::{FlashMessage, SessionKey, UserId};

/// Identity of the caller as seen by the host application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestIdentity {
    session_key: Option<SessionKey>,
    user: Option<UserId>,
}

impl RequestIdentity {
    /// Creates an identity with neither a session nor a user.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            session_key: None,
            user: None,
        }
    }

    /// Sets the session key.
    #[must_use]
    pub fn with_session(mut self, session_key: SessionKey) -> Self {
        self.session_key = Some(session_key);
        self
    }

    /// Sets the authenticated user.
    #[must_use]
    pub const fn with_user(mut self, user: UserId) -> Self {
        self.user = Some(user);
        self
    }

    /// Returns the session key, if the request carries one.
    #[must_use]
    pub const fn session_key(&self) -> Option<&SessionKey> {
        self.session_key.as_ref()
    }

    /// Returns the authenticated user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<UserId> {
        self.user
    }
}

/// Filter every query runs under.
///
/// A session scope sees rows owned by the same user (or by nobody when the
/// caller is anonymous) whose session matches or is unset. A user scope sees
/// every row of that user regardless of session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageScope {
    /// Session-addressed messages.
    Session {
        /// Session key from the request.
        session_key: SessionKey,
        /// Authenticated user, if any.
        user: Option<UserId>,
    },
    /// User-addressed messages.
    User(UserId),
}

impl MessageScope {
    /// Resolves the scope for a request.
    ///
    /// Returns `None` when the identity lacks what the addressing mode needs:
    /// a session key when `use_sessions` is set, a user otherwise.
    #[must_use]
    pub fn resolve(identity: &RequestIdentity, use_sessions: bool) -> Option<Self> {
        if use_sessions {
            identity
                .session_key()
                .cloned()
                .map(|session_key| Self::Session {
                    session_key,
                    user: identity.user(),
                })
        } else {
            identity.user().map(Self::User)
        }
    }

    /// Returns whether the message is visible under this scope.
    #[must_use]
    pub fn matches(&self, message: &FlashMessage) -> bool {
        let owner = message.owner();
        match self {
            Self::Session { session_key, user } => {
                owner.user == *user
                    && owner
                        .session_key
                        .as_ref()
                        .is_none_or(|key| key == session_key)
            }
            Self::User(user) => owner.user == Some(*user),
        }
    }
}

/// Addressing recorded on a stored message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageOwner {
    /// Owning user, if any.
    pub user: Option<UserId>,
    /// Session the message was submitted in, if any.
    pub session_key: Option<SessionKey>,
}

impl MessageOwner {
    /// Owner for a message addressed directly to a user.
    #[must_use]
    pub const fn user(user: UserId) -> Self {
        Self {
            user: Some(user),
            session_key: None,
        }
    }

    /// Owner recorded for a message created during a request: the user and
    /// the session, whichever are present.
    #[must_use]
    pub fn from_identity(identity: &RequestIdentity) -> Self {
        Self {
            user: identity.user(),
            session_key: identity.session_key().cloned(),
        }
    }
}
