//! Session-level error taxonomy surfaced to the shell and UI.

use crate::net::error::ServiceError;
use crate::util::storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The credential exchange rejected the username/password pair.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// A protected action was attempted without a session.
    #[error("not authenticated")]
    NotAuthenticated,
    /// The service rejected the session token mid-session, or the response
    /// belonged to a session that has since ended.
    #[error("session expired, please login again")]
    SessionExpired,
    /// The persisted session record was corrupt or incomplete and was discarded.
    #[error("malformed durable session record: {0}")]
    MalformedDurableRecord(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Service(#[from] ServiceError),
}
