//! Client-side session manager for the role-based shell.
//!
//! SYSTEM CONTEXT
//! ==============
//! `state` owns the authoritative session and its durable mirror, `net`
//! talks to the resource service (every protected call goes through the
//! unauthorized-response interceptor), and `router` decides whether a route
//! transition is allowed. `shell` wires the three together and turns state
//! outcomes into navigation.

pub mod config;
pub mod net;
pub mod router;
pub mod shell;
pub mod state;
pub mod util;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{SessionConfig, StorageKeys};
pub use net::error::ServiceError;
pub use net::types::{LoginResponse, Profile, Role, SlowData, UserRecord};
pub use router::routes::RouteName;
pub use shell::Shell;
pub use state::error::SessionError;
pub use state::session::{Requirement, Session, SessionAccess, SessionTag};
pub use state::store::SessionStore;
pub use util::storage::{SessionStorage, StorageError};
