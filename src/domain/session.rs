//! Session snapshot shared read-only with every component outside the store.

use blog_admin_types::User;
use serde::Serialize;

/// Lifecycle of the process-wide session.
///
/// Starts `Pending`, settles once `initialize` has run and afterwards only
/// moves between the two terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Pending,
    Authenticated,
    Unauthenticated,
}

impl SessionStatus {
    pub fn is_settled(self) -> bool {
        !matches!(self, Self::Pending)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Authenticated => "authenticated",
            Self::Unauthenticated => "unauthenticated",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    #[serde(skip)]
    token: Option<String>,
    user: Option<User>,
    status: SessionStatus,
}

impl Session {
    pub fn pending() -> Self {
        Self {
            token: None,
            user: None,
            status: SessionStatus::Pending,
        }
    }

    pub fn unauthenticated() -> Self {
        Self {
            token: None,
            user: None,
            status: SessionStatus::Unauthenticated,
        }
    }

    pub fn authenticated(token: String, user: User) -> Self {
        Self {
            token: Some(token),
            user: Some(user),
            status: SessionStatus::Authenticated,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }

    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.username.as_str())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::pending()
    }
}
