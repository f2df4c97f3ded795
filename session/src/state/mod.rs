//! Session state: the authoritative session value, its errors, and the store
//! that owns it.

pub mod error;
pub mod session;
pub mod store;
