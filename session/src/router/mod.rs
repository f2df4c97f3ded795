//! Route table, navigation guard and the navigation capability.

pub mod guard;
pub mod navigator;
pub mod routes;
