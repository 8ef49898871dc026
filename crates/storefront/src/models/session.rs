//! Session state.
//!
//! At most one session exists per process. The authenticated user is also
//! what gets persisted under the `currentUser` key.

use softbenny_core::UserId;

use super::user::User;

/// The current session: anonymous, or authenticated as one user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    /// No user is logged in.
    #[default]
    Anonymous,
    /// A user is logged in.
    Authenticated(User),
}

impl Session {
    /// The logged-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(user) => Some(user),
        }
    }

    /// The logged-in user's ID, if any.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.user().map(|user| user.id)
    }

    /// Whether a user is logged in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

impl From<Option<User>> for Session {
    fn from(user: Option<User>) -> Self {
        user.map_or(Self::Anonymous, Self::Authenticated)
    }
}
