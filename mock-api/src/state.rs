//! Shared application state.

use std::sync::Arc;

use session::net::mock::MockApi;

use crate::config::MockApiConfig;

#[derive(Clone)]
pub struct AppState {
    pub api: Arc<MockApi>,
}

impl AppState {
    #[must_use]
    pub fn new(config: &MockApiConfig) -> Self {
        Self { api: Arc::new(MockApi::new(config.latency)) }
    }
}
