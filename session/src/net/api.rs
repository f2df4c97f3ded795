//! Resource-service contract consumed by the session store.
//!
//! SYSTEM CONTEXT
//! ==============
//! The store only ever sees this trait. The in-process [`crate::net::mock`]
//! service backs tests and demos; the CLI provides an HTTP implementation
//! against the same endpoint paths declared here.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use super::error::ServiceError;
use super::types::{LoginResponse, SlowData, UserRecord};

/// `POST` credential exchange.
pub const LOGIN_ENDPOINT: &str = "/api/login";
/// `GET` user directory (requires a token).
pub const USERS_ENDPOINT: &str = "/api/users";
/// `GET` dashboard metrics (requires a token, slow).
pub const SLOW_DATA_ENDPOINT: &str = "/api/slow-data";

/// Format a token as an `Authorization` header value.
#[must_use]
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Extract the token from an `Authorization` header value.
///
/// Returns an empty string for a missing or non-bearer header so the service
/// treats it the same as an absent token.
#[must_use]
pub fn token_from_header(header: Option<&str>) -> &str {
    header
        .and_then(|value| value.strip_prefix("Bearer "))
        .map_or("", str::trim)
}

/// Remote credential and protected-data service.
#[async_trait::async_trait]
pub trait ResourceService: Send + Sync {
    /// Exchange credentials for a token and profile.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Unauthorized`] for rejected credentials, or a
    /// transport/status error if the exchange could not complete.
    async fn authenticate(&self, username: &str, password: &str) -> Result<LoginResponse, ServiceError>;

    /// Fetch the user directory.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Unauthorized`] when the token is missing or rejected.
    async fn list_users(&self, token: &str) -> Result<Vec<UserRecord>, ServiceError>;

    /// Fetch dashboard metrics.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Unauthorized`] when the token is missing.
    async fn slow_data(&self, token: &str) -> Result<SlowData, ServiceError>;
}
