//! Shell route table.
//!
//! DESIGN
//! ======
//! Routes are a closed enum so the guard, the navigator and configuration all
//! agree on the set of surfaces. Each route declares its access requirements
//! as [`RouteMeta`]; `/` is an alias that lands on the login surface.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use std::fmt;
use std::str::FromStr;

/// Access requirements a route declares.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RouteMeta {
    pub requires_auth: bool,
    pub requires_admin: bool,
    pub requires_guest_only: bool,
}

/// A named surface of the shell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RouteName {
    Login,
    Dashboard,
    AdminSettings,
}

impl RouteName {
    pub const ALL: [Self; 3] = [Self::Login, Self::Dashboard, Self::AdminSettings];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Dashboard => "dashboard",
            Self::AdminSettings => "admin-settings",
        }
    }

    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Dashboard => "/dashboard",
            Self::AdminSettings => "/admin/settings",
        }
    }

    #[must_use]
    pub fn meta(self) -> RouteMeta {
        match self {
            Self::Login => RouteMeta { requires_guest_only: true, ..RouteMeta::default() },
            Self::Dashboard => RouteMeta { requires_auth: true, ..RouteMeta::default() },
            Self::AdminSettings => RouteMeta { requires_auth: true, requires_admin: true, ..RouteMeta::default() },
        }
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouteName {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| RouteError::NotFound(s.to_owned()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("no route matches `{0}`")]
    NotFound(String),
    #[error("navigation to `{0}` did not settle")]
    RedirectLoop(RouteName),
}

/// Resolve a request path to a route, following the `/` alias.
///
/// # Errors
///
/// Returns [`RouteError::NotFound`] if no route owns the path.
pub fn resolve(path: &str) -> Result<RouteName, RouteError> {
    let trimmed = path.split(['?', '#']).next().unwrap_or_default();
    let normalized = match trimmed.trim_end_matches('/') {
        "" => return Ok(RouteName::Login),
        other => other,
    };
    RouteName::ALL
        .into_iter()
        .find(|r| r.path() == normalized)
        .ok_or_else(|| RouteError::NotFound(path.to_owned()))
}
