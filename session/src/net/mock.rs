//! In-process mock of the resource service.
//!
//! DESIGN
//! ======
//! Four fixed demo accounts, artificial latency per endpoint, and the same
//! rejection rules as the hosted mock: every protected endpoint answers an
//! empty token with 401, and the user directory also rejects any token
//! containing `expired`. Tests use [`MockApi::instant`] so no time
//! is spent sleeping.

#[cfg(test)]
#[path = "mock_test.rs"]
mod mock_test;

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rand::Rng;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use super::api::ResourceService;
use super::error::ServiceError;
use super::types::{AccountStatus, LoginResponse, Metrics, Profile, Role, SlowData, UserRecord};

const DEFAULT_LOGIN_LATENCY_MS: u64 = 800;
const DEFAULT_USERS_LATENCY_MS: u64 = 600;
const DEFAULT_SLOW_DATA_LATENCY_MS: u64 = 2000;

/// Artificial delay applied before each endpoint answers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MockLatency {
    pub login: Duration,
    pub users: Duration,
    pub slow_data: Duration,
}

impl MockLatency {
    #[must_use]
    pub fn none() -> Self {
        Self { login: Duration::ZERO, users: Duration::ZERO, slow_data: Duration::ZERO }
    }

    /// Same delay for every endpoint.
    #[must_use]
    pub fn uniform(delay: Duration) -> Self {
        Self { login: delay, users: delay, slow_data: delay }
    }
}

impl Default for MockLatency {
    fn default() -> Self {
        Self {
            login: Duration::from_millis(DEFAULT_LOGIN_LATENCY_MS),
            users: Duration::from_millis(DEFAULT_USERS_LATENCY_MS),
            slow_data: Duration::from_millis(DEFAULT_SLOW_DATA_LATENCY_MS),
        }
    }
}

struct MockAccount {
    record: UserRecord,
    password: &'static str,
}

fn account(
    id: u64,
    username: &str,
    name: &str,
    role: Role,
    password: &'static str,
    status: AccountStatus,
) -> MockAccount {
    MockAccount {
        record: UserRecord {
            id,
            username: username.to_owned(),
            name: name.to_owned(),
            email: format!("{}@example.com", username.split('_').next().unwrap_or(username)),
            role,
            status,
        },
        password,
    }
}

/// Mock credential and resource service.
pub struct MockApi {
    accounts: Vec<MockAccount>,
    latency: MockLatency,
}

impl MockApi {
    #[must_use]
    pub fn new(latency: MockLatency) -> Self {
        let accounts = vec![
            account(1, "admin", "Admin User", Role::Admin, "admin123", AccountStatus::Active),
            account(2, "user", "Regular User", Role::User, "user123", AccountStatus::Active),
            account(3, "john_doe", "John Doe", Role::User, "password", AccountStatus::Active),
            account(4, "jane_smith", "Jane Smith", Role::User, "password", AccountStatus::Inactive),
        ];
        Self { accounts, latency }
    }

    /// Mock service that answers without any delay.
    #[must_use]
    pub fn instant() -> Self {
        Self::new(MockLatency::none())
    }

    fn find(&self, username: &str) -> Option<&MockAccount> {
        self.accounts.iter().find(|a| a.record.username == username)
    }

    fn check_token(token: &str) -> Result<(), ServiceError> {
        if token.is_empty() || token.contains("expired") {
            return Err(ServiceError::Unauthorized("Unauthorized".to_owned()));
        }
        Ok(())
    }
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new(MockLatency::default())
    }
}

/// Token in the hosted mock's format: `mock_jwt_token_{Role}_{unix millis}`.
#[must_use]
pub fn issue_token(role: Role) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis());
    format!("mock_jwt_token_{role}_{millis}")
}

fn random_metrics() -> Metrics {
    let mut rng = rand::rng();
    Metrics {
        revenue: rng.random_range(50_000..150_000),
        customers: rng.random_range(500..1500),
        growth: rng.random_range(10..60),
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[async_trait::async_trait]
impl ResourceService for MockApi {
    async fn authenticate(&self, username: &str, password: &str) -> Result<LoginResponse, ServiceError> {
        pause(self.latency.login).await;

        let Some(found) = self.find(username).filter(|a| a.password == password) else {
            return Err(ServiceError::Unauthorized("Invalid credentials".to_owned()));
        };
        let record = &found.record;
        Ok(LoginResponse {
            token: issue_token(record.role),
            user: Profile {
                id: record.id,
                username: record.username.clone(),
                display_name: record.name.clone(),
                avatar: None,
                role: record.role,
            },
        })
    }

    async fn list_users(&self, token: &str) -> Result<Vec<UserRecord>, ServiceError> {
        pause(self.latency.users).await;
        Self::check_token(token)?;
        Ok(self.accounts.iter().map(|a| a.record.clone()).collect())
    }

    async fn slow_data(&self, token: &str) -> Result<SlowData, ServiceError> {
        pause(self.latency.slow_data).await;
        if token.is_empty() {
            return Err(ServiceError::Unauthorized("Unauthorized".to_owned()));
        }

        let metrics = random_metrics();
        let timestamp = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .map_err(|e| ServiceError::Decode(e.to_string()))?;
        Ok(SlowData { metrics, timestamp })
    }
}
