//! Shared fakes for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Semaphore;

use crate::net::api::ResourceService;
use crate::net::error::ServiceError;
use crate::net::types::{AccountStatus, LoginResponse, Metrics, Profile, Role, SlowData, UserRecord};
use crate::state::session::{Session, SessionAccess, SessionTag};
use crate::util::storage::{MemoryStorage, SessionStorage, StorageError};

pub(crate) fn profile(role: Role) -> Profile {
    let (id, username, name) = match role {
        Role::Admin => (1, "admin", "Admin User"),
        Role::User => (2, "user", "Regular User"),
    };
    Profile { id, username: username.into(), display_name: name.into(), avatar: None, role }
}

pub(crate) fn user_record(id: u64, username: &str) -> UserRecord {
    UserRecord {
        id,
        username: username.into(),
        name: username.into(),
        email: format!("{username}@example.com"),
        role: Role::User,
        status: AccountStatus::Active,
    }
}

// =============================================================================
// FakeSession
// =============================================================================

/// `SessionAccess` double that counts forced logouts.
pub(crate) struct FakeSession {
    session: Mutex<Session>,
    force_logout_calls: AtomicUsize,
}

impl FakeSession {
    pub(crate) fn anonymous() -> Self {
        Self { session: Mutex::new(Session::Anonymous), force_logout_calls: AtomicUsize::new(0) }
    }

    pub(crate) fn authenticated(profile: Profile) -> Self {
        let session = Session::Authenticated { token: "fake-token".into(), profile, tag: SessionTag::new(1) };
        Self { session: Mutex::new(session), force_logout_calls: AtomicUsize::new(0) }
    }

    pub(crate) fn force_logout_calls(&self) -> usize {
        self.force_logout_calls.load(Ordering::SeqCst)
    }
}

impl SessionAccess for FakeSession {
    fn session(&self) -> Session {
        self.session.lock().unwrap().clone()
    }

    fn force_logout(&self, issued_under: SessionTag) -> bool {
        self.force_logout_calls.fetch_add(1, Ordering::SeqCst);
        let mut session = self.session.lock().unwrap();
        if session.tag() == Some(issued_under) {
            *session = Session::Anonymous;
            return true;
        }
        false
    }
}

// =============================================================================
// FakeService
// =============================================================================

/// Scriptable `ResourceService` that records calls.
///
/// When a gate is installed, `list_users` and `slow_data` wait for a permit
/// before answering, which lets tests interleave logout with an in-flight
/// request.
pub(crate) struct FakeService {
    login_reply: Mutex<Result<LoginResponse, ServiceError>>,
    users_reply: Mutex<Result<Vec<UserRecord>, ServiceError>>,
    gate: Mutex<Option<Arc<Semaphore>>>,
    pub(crate) login_calls: AtomicUsize,
    pub(crate) users_calls: AtomicUsize,
    pub(crate) slow_data_calls: AtomicUsize,
    seen_tokens: Mutex<Vec<String>>,
}

impl FakeService {
    pub(crate) fn new() -> Self {
        Self {
            login_reply: Mutex::new(Ok(LoginResponse { token: "token-admin".into(), user: profile(Role::Admin) })),
            users_reply: Mutex::new(Ok(vec![user_record(1, "admin"), user_record(2, "user")])),
            gate: Mutex::new(None),
            login_calls: AtomicUsize::new(0),
            users_calls: AtomicUsize::new(0),
            slow_data_calls: AtomicUsize::new(0),
            seen_tokens: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn reply_login(&self, reply: Result<LoginResponse, ServiceError>) {
        *self.login_reply.lock().unwrap() = reply;
    }

    pub(crate) fn login_as(&self, token: &str, role: Role) {
        self.reply_login(Ok(LoginResponse { token: token.into(), user: profile(role) }));
    }

    pub(crate) fn reply_users(&self, reply: Result<Vec<UserRecord>, ServiceError>) {
        *self.users_reply.lock().unwrap() = reply;
    }

    /// Hold protected requests until permits are added to the returned gate.
    pub(crate) fn install_gate(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub(crate) fn network_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
            + self.users_calls.load(Ordering::SeqCst)
            + self.slow_data_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn seen_tokens(&self) -> Vec<String> {
        self.seen_tokens.lock().unwrap().clone()
    }

    async fn wait_gate(&self) {
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            let _permit = gate.acquire().await.unwrap();
        }
    }
}

#[async_trait::async_trait]
impl ResourceService for FakeService {
    async fn authenticate(&self, _username: &str, _password: &str) -> Result<LoginResponse, ServiceError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        self.login_reply.lock().unwrap().clone()
    }

    async fn list_users(&self, token: &str) -> Result<Vec<UserRecord>, ServiceError> {
        self.users_calls.fetch_add(1, Ordering::SeqCst);
        self.seen_tokens.lock().unwrap().push(token.to_owned());
        self.wait_gate().await;
        self.users_reply.lock().unwrap().clone()
    }

    async fn slow_data(&self, token: &str) -> Result<SlowData, ServiceError> {
        self.slow_data_calls.fetch_add(1, Ordering::SeqCst);
        self.seen_tokens.lock().unwrap().push(token.to_owned());
        self.wait_gate().await;
        if token.contains("expired") {
            return Err(ServiceError::Unauthorized("Unauthorized".into()));
        }
        Ok(SlowData {
            metrics: Metrics { revenue: 100_000, customers: 900, growth: 20 },
            timestamp: "2024-01-01T00:00:00Z".into(),
        })
    }
}

// =============================================================================
// FlakyStorage
// =============================================================================

/// `MemoryStorage` wrapper with scripted failures.
#[derive(Default)]
pub(crate) struct FlakyStorage {
    pub(crate) inner: MemoryStorage,
    put_failures: Mutex<HashMap<String, usize>>,
    fail_removes: AtomicBool,
    fail_gets: AtomicBool,
}

impl FlakyStorage {
    /// Fail the next `times` writes to `key`.
    pub(crate) fn fail_puts(&self, key: &str, times: usize) {
        self.put_failures.lock().unwrap().insert(key.to_owned(), times);
    }

    pub(crate) fn fail_removes(&self, fail: bool) {
        self.fail_removes.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_gets(&self, fail: bool) {
        self.fail_gets.store(fail, Ordering::SeqCst);
    }
}

impl SessionStorage for FlakyStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_gets.load(Ordering::SeqCst) {
            let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied");
            return Err(StorageError::Io(denied));
        }
        self.inner.get(key)
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(left) = self.put_failures.lock().unwrap().get_mut(key).filter(|left| **left > 0) {
            *left -= 1;
            return Err(StorageError::Unavailable(format!("put {key}")));
        }
        self.inner.put(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        if self.fail_removes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!("remove {key}")));
        }
        self.inner.remove(key)
    }
}
