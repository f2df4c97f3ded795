//! Resource-service error contract.
//!
//! The interceptor pattern-matches on [`ServiceError::is_unauthorized`]; every
//! transport must map "token missing, malformed or rejected" onto
//! [`ServiceError::Unauthorized`] and nothing else.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// HTTP status the service uses to reject a credential.
pub const UNAUTHORIZED_STATUS: u16 = 401;

/// Failure returned by a [`crate::net::api::ResourceService`] call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// The service rejected the presented credential (status 401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// Any other non-success status.
    #[error("service returned {status}: {message}")]
    Status { status: u16, message: String },
    /// The request never produced a response.
    #[error("transport failed: {0}")]
    Transport(String),
    /// The response body did not match the expected shape.
    #[error("invalid response payload: {0}")]
    Decode(String),
}

impl ServiceError {
    /// Classify a non-success status, routing 401 to [`ServiceError::Unauthorized`].
    #[must_use]
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        if status == UNAUTHORIZED_STATUS {
            Self::Unauthorized(message)
        } else {
            Self::Status { status, message }
        }
    }

    /// Status code carried by the error, if the service produced one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized(_) => Some(UNAUTHORIZED_STATUS),
            Self::Status { status, .. } => Some(*status),
            Self::Transport(_) | Self::Decode(_) => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}
