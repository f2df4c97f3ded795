//! The session value and the narrow access trait the interceptor and guard
//! depend on.
//!
//! DESIGN
//! ======
//! `Session` is an enum so token and profile are present together or not at
//! all. Each authenticated session carries a [`SessionTag`]; requests capture
//! the tag they were issued under so late responses from a superseded session
//! can be recognized and dropped.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::fmt;

use crate::net::types::{Profile, Role};

/// Identity of one authenticated session. Never reused within a process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionTag(u64);

impl SessionTag {
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Authentication state of the running client.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated {
        token: String,
        profile: Profile,
        tag: SessionTag,
    },
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => f.write_str("Anonymous"),
            Self::Authenticated { profile, tag, .. } => f
                .debug_struct("Authenticated")
                .field("token", &"<redacted>")
                .field("profile", profile)
                .field("tag", tag)
                .finish(),
        }
    }
}

impl Session {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::Authenticated { token, .. } => Some(token),
            Self::Anonymous => None,
        }
    }

    #[must_use]
    pub fn profile(&self) -> Option<&Profile> {
        match self {
            Self::Authenticated { profile, .. } => Some(profile),
            Self::Anonymous => None,
        }
    }

    #[must_use]
    pub fn tag(&self) -> Option<SessionTag> {
        match self {
            Self::Authenticated { tag, .. } => Some(*tag),
            Self::Anonymous => None,
        }
    }

    /// Role derived from the profile; `None` when anonymous.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.profile().map(|p| p.role)
    }

    #[must_use]
    pub fn is_in_role(&self, candidate: Role) -> bool {
        self.role() == Some(candidate)
    }

    #[must_use]
    pub fn satisfies(&self, requirement: Requirement) -> bool {
        match requirement {
            Requirement::Authenticated => self.is_authenticated(),
            Requirement::Role(role) => self.is_in_role(role),
            Requirement::Guest => !self.is_authenticated(),
        }
    }
}

/// Authorization question asked by the guard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Requirement {
    Authenticated,
    Role(Role),
    Guest,
}

/// Read/write view of the session store used by the interceptor and guard.
pub trait SessionAccess: Send + Sync {
    /// Snapshot of the current session.
    fn session(&self) -> Session;

    /// Force the session back to anonymous if it is still the one identified
    /// by `issued_under`. Returns `true` if this call ended the session.
    fn force_logout(&self, issued_under: SessionTag) -> bool;

    fn is_authorized(&self, requirement: Requirement) -> bool {
        self.session().satisfies(requirement)
    }
}
