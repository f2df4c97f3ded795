//! Resource-service boundary: wire types, errors, the service trait and the
//! unauthorized-response interceptor that every protected call goes through.

pub mod api;
pub mod error;
pub mod interceptor;
pub mod mock;
pub mod types;
