//! Environment configuration for the mock server.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

use session::net::mock::MockLatency;

const DEFAULT_PORT: u16 = 3000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockApiConfig {
    pub port: u16,
    pub latency: MockLatency,
}

impl MockApiConfig {
    /// Load from `PORT` and `MOCK_LATENCY_MS`. Without `MOCK_LATENCY_MS` each
    /// endpoint keeps its own default delay.
    #[must_use]
    pub fn from_env() -> Self {
        let port = env_parse("PORT", DEFAULT_PORT);
        let latency_ms = std::env::var("MOCK_LATENCY_MS").ok().and_then(|v| v.trim().parse().ok());
        Self::resolve(port, latency_ms)
    }

    pub(crate) fn resolve(port: u16, latency_ms: Option<u64>) -> Self {
        let latency = latency_ms.map_or_else(MockLatency::default, |ms| MockLatency::uniform(Duration::from_millis(ms)));
        Self { port, latency }
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}
