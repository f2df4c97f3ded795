//! Wire DTOs exchanged with the resource service.
//!
//! DESIGN
//! ======
//! Field names follow the service's JSON payloads (`name` for the display
//! name, capitalized role and status values) so serde round-trips against the
//! HTTP API and the persisted profile record stay lossless.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role assigned to an account. Drives every authorization decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::User => "User",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Self::Admin),
            "User" => Ok(Self::User),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Whether a directory account may currently sign in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountStatus {
    Active,
    Inactive,
}

/// Profile of the signed-in user as returned by the credential exchange.
///
/// This is also the payload persisted under the profile storage key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Numeric account identifier.
    pub id: u64,
    /// Login name.
    pub username: String,
    /// Human-readable name shown in the shell header.
    #[serde(rename = "name")]
    pub display_name: String,
    /// Avatar glyph or URL, if the service provides one.
    #[serde(default)]
    pub avatar: Option<String>,
    /// Role the session is authorized under.
    pub role: Role,
}

/// `POST /api/login` request body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful credential exchange: an opaque token plus the user's profile.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: Profile,
}

impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse")
            .field("token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}

/// One entry of the user directory (`GET /api/users`). Never carries a password.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: u64,
    pub username: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: AccountStatus,
}

/// Dashboard counters served by the slow endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    pub revenue: u64,
    pub customers: u64,
    pub growth: u64,
}

/// `GET /api/slow-data` response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlowData {
    pub metrics: Metrics,
    /// RFC 3339 timestamp of when the service computed the metrics.
    pub timestamp: String,
}
