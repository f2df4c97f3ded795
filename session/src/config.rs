//! Session configuration loaded from the environment.
//!
//! Every field has a default matching the hosted shell, so an empty
//! environment yields a working configuration.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::str::FromStr;

use crate::router::routes::RouteName;

pub const DEFAULT_TOKEN_KEY: &str = "token";
pub const DEFAULT_PROFILE_KEY: &str = "currentUser";

/// Durable-storage keys holding the session record. Both are written and
/// cleared together.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageKeys {
    pub token: String,
    pub profile: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self { token: DEFAULT_TOKEN_KEY.to_owned(), profile: DEFAULT_PROFILE_KEY.to_owned() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub keys: StorageKeys,
    /// Where unauthenticated users and forced logouts are sent.
    pub login_route: RouteName,
    /// Default authenticated surface; also the target for denied admin routes.
    pub landing_route: RouteName,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            keys: StorageKeys::default(),
            login_route: RouteName::Login,
            landing_route: RouteName::Dashboard,
        }
    }
}

impl SessionConfig {
    /// Load from `ROLEGATE_TOKEN_KEY`, `ROLEGATE_PROFILE_KEY`,
    /// `ROLEGATE_LOGIN_ROUTE` and `ROLEGATE_LANDING_ROUTE`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset or unparsable values fall
    /// back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let keys = StorageKeys {
            token: lookup_nonempty(&lookup, "ROLEGATE_TOKEN_KEY").unwrap_or(defaults.keys.token),
            profile: lookup_nonempty(&lookup, "ROLEGATE_PROFILE_KEY").unwrap_or(defaults.keys.profile),
        };
        Self {
            keys,
            login_route: lookup_parse(&lookup, "ROLEGATE_LOGIN_ROUTE", defaults.login_route),
            landing_route: lookup_parse(&lookup, "ROLEGATE_LANDING_ROUTE", defaults.landing_route),
        }
    }
}

fn lookup_nonempty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

fn lookup_parse<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup_nonempty(lookup, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
