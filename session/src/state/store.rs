//! Session store: the single owner and writer of the client session.
//!
//! ARCHITECTURE
//! ============
//! Two states, Anonymous and Authenticated. Every transition updates the
//! in-memory session and the durable record in the same synchronous step,
//! under the store mutex, so the two never disagree about whether the user is
//! logged in. The mutex is never held across an await: network calls happen
//! first, then the outcome is applied in one short critical section.
//!
//! TRADE-OFFS
//! ==========
//! `restore` trusts the persisted token without asking the service; an expired
//! token is only discovered on the first protected call, where the interceptor
//! turns the 401 into a forced logout.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use super::error::SessionError;
use super::session::{Session, SessionAccess, SessionTag};
use crate::config::StorageKeys;
use crate::net::api::ResourceService;
use crate::net::error::ServiceError;
use crate::net::interceptor::Interceptor;
use crate::net::types::{LoginResponse, Profile, Role, SlowData, UserRecord};
use crate::util::storage::{SessionStorage, StorageError};

/// Result of [`SessionStore::logout`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogoutOutcome {
    LoggedOut,
    AlreadyAnonymous,
    /// The session ended in memory but the durable record could neither be
    /// removed nor blanked; a restart may bring it back.
    DurableRecordRetained,
}

/// Result of [`SessionStore::restore`]. Restoring never fails the process.
#[derive(Debug)]
pub enum RestoreOutcome {
    Restored(Profile),
    /// No durable record existed.
    Empty,
    /// A durable record existed but could not be used; it has been removed.
    Discarded(SessionError),
    /// Storage could not be read. The record is left in place and the store
    /// starts anonymous.
    Unavailable(SessionError),
}

#[derive(Default)]
struct StoreInner {
    session: Session,
    users: Vec<UserRecord>,
    last_tag: u64,
}

impl StoreInner {
    fn next_tag(&mut self) -> SessionTag {
        self.last_tag += 1;
        SessionTag::new(self.last_tag)
    }
}

pub struct SessionStore {
    service: Arc<dyn ResourceService>,
    storage: Arc<dyn SessionStorage>,
    keys: StorageKeys,
    inner: Mutex<StoreInner>,
}

impl SessionStore {
    pub fn new(service: Arc<dyn ResourceService>, storage: Arc<dyn SessionStorage>, keys: StorageKeys) -> Self {
        Self { service, storage, keys, inner: Mutex::new(StoreInner::default()) }
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    #[must_use]
    pub fn session(&self) -> Session {
        self.lock().session.clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.lock().session.is_authenticated()
    }

    #[must_use]
    pub fn profile(&self) -> Option<Profile> {
        self.lock().session.profile().cloned()
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.lock().session.role()
    }

    #[must_use]
    pub fn is_in_role(&self, candidate: Role) -> bool {
        self.lock().session.is_in_role(candidate)
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.is_in_role(Role::Admin)
    }

    /// Most recent successfully fetched user directory.
    #[must_use]
    pub fn users(&self) -> Vec<UserRecord> {
        self.lock().users.clone()
    }

    // =========================================================================
    // LOGIN / LOGOUT / RESTORE
    // =========================================================================

    /// Exchange credentials and establish a new session.
    ///
    /// Overlapping calls are not serialized; whichever completes last wins.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidCredentials`] when the service rejects the
    /// credentials, [`SessionError::Service`] for other service failures and
    /// [`SessionError::Storage`] when the session could not be persisted. The
    /// session is unchanged in every error case.
    pub async fn login(&self, username: &str, password: &str) -> Result<Profile, SessionError> {
        let response = self
            .service
            .authenticate(username, password)
            .await
            .map_err(|err| {
                if err.is_unauthorized() {
                    SessionError::InvalidCredentials
                } else {
                    SessionError::Service(err)
                }
            });
        match response {
            Ok(response) => self.establish(response),
            Err(err) => {
                warn!(%username, error = %err, "login failed");
                Err(err)
            }
        }
    }

    fn establish(&self, response: LoginResponse) -> Result<Profile, SessionError> {
        if response.token.is_empty() {
            return Err(ServiceError::Decode("login response carried an empty token".to_owned()).into());
        }
        let profile_json = serde_json::to_string(&response.user).map_err(StorageError::from)?;

        let mut inner = self.lock();
        if let Err(err) = self.persist(&response.token, &profile_json) {
            warn!(error = %err, "failed to persist session; keeping previous state");
            self.mirror(&inner.session);
            return Err(err.into());
        }

        let tag = inner.next_tag();
        let profile = response.user;
        info!(username = %profile.username, role = %profile.role, tag = tag.value(), "session established");
        inner.users.clear();
        inner.session = Session::Authenticated { token: response.token, profile: profile.clone(), tag };
        Ok(profile)
    }

    /// End the current session. Idempotent.
    ///
    /// Clears the session, the cached user directory and the durable record.
    /// The durable clear is retried even when already anonymous, so a record
    /// left behind by an earlier failure is removed. Navigation back to the
    /// login surface is left to the caller.
    pub fn logout(&self) -> LogoutOutcome {
        let mut inner = self.lock();
        self.clear(&mut inner)
    }

    fn clear(&self, inner: &mut StoreInner) -> LogoutOutcome {
        inner.users.clear();
        let was_authenticated = inner.session.is_authenticated();
        inner.session = Session::Anonymous;
        if let Err(err) = self.clear_durable() {
            warn!(error = %err, "durable session record retained");
            return LogoutOutcome::DurableRecordRetained;
        }
        if !was_authenticated {
            return LogoutOutcome::AlreadyAnonymous;
        }
        info!("session cleared");
        LogoutOutcome::LoggedOut
    }

    /// Rehydrate the session from durable storage without contacting the
    /// service. Called once at process start.
    pub fn restore(&self) -> RestoreOutcome {
        let mut inner = self.lock();
        match self.read_durable() {
            Ok(None) => RestoreOutcome::Empty,
            Ok(Some((token, profile))) => {
                let tag = inner.next_tag();
                info!(username = %profile.username, role = %profile.role, "session restored");
                inner.users.clear();
                inner.session = Session::Authenticated { token, profile: profile.clone(), tag };
                RestoreOutcome::Restored(profile)
            }
            Err(err @ SessionError::MalformedDurableRecord(_)) => {
                warn!(error = %err, "discarding durable session record");
                if let Err(clear_err) = self.clear_durable() {
                    warn!(error = %clear_err, "malformed durable session record retained");
                }
                inner.users.clear();
                inner.session = Session::Anonymous;
                RestoreOutcome::Discarded(err)
            }
            Err(err) => {
                warn!(error = %err, "durable session record unreadable; starting anonymous");
                inner.users.clear();
                inner.session = Session::Anonymous;
                RestoreOutcome::Unavailable(err)
            }
        }
    }

    // =========================================================================
    // PROTECTED RESOURCES
    // =========================================================================

    /// Fetch the user directory and cache it.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotAuthenticated`] without a session (no request is
    /// made), [`SessionError::SessionExpired`] when the token was rejected or
    /// the session ended while the request was in flight, and
    /// [`SessionError::Service`] for other service failures.
    pub async fn fetch_users(&self, interceptor: &Interceptor) -> Result<Vec<UserRecord>, SessionError> {
        let (token, tag) = self.credentials()?;
        let result = interceptor.call(tag, self.service.list_users(&token)).await;
        let users = self.settle(tag, result)?;

        let mut inner = self.lock();
        if inner.session.tag() != Some(tag) {
            debug!(tag = tag.value(), "dropping user directory from superseded session");
            return Err(SessionError::SessionExpired);
        }
        inner.users.clone_from(&users);
        Ok(users)
    }

    /// Fetch dashboard metrics. Not cached.
    ///
    /// # Errors
    ///
    /// Same as [`SessionStore::fetch_users`].
    pub async fn fetch_slow_data(&self, interceptor: &Interceptor) -> Result<SlowData, SessionError> {
        let (token, tag) = self.credentials()?;
        let result = interceptor.call(tag, self.service.slow_data(&token)).await;
        self.settle(tag, result)
    }

    fn credentials(&self) -> Result<(String, SessionTag), SessionError> {
        match &self.lock().session {
            Session::Authenticated { token, tag, .. } => Ok((token.clone(), *tag)),
            Session::Anonymous => Err(SessionError::NotAuthenticated),
        }
    }

    fn settle<T>(&self, tag: SessionTag, result: Result<T, ServiceError>) -> Result<T, SessionError> {
        match result {
            Ok(_) if self.lock().session.tag() != Some(tag) => {
                debug!(tag = tag.value(), "dropping response from superseded session");
                Err(SessionError::SessionExpired)
            }
            Ok(value) => Ok(value),
            Err(err) if err.is_unauthorized() => Err(SessionError::SessionExpired),
            Err(err) => Err(SessionError::Service(err)),
        }
    }

    // =========================================================================
    // DURABLE RECORD
    // =========================================================================

    fn persist(&self, token: &str, profile_json: &str) -> Result<(), StorageError> {
        self.storage.put(&self.keys.token, token)?;
        self.storage.put(&self.keys.profile, profile_json)
    }

    /// Best-effort rewrite of the durable record to match `session`.
    fn mirror(&self, session: &Session) {
        if let Session::Authenticated { token, profile, .. } = session {
            let rewritten = serde_json::to_string(profile)
                .map_err(StorageError::from)
                .and_then(|json| self.persist(token, &json));
            match rewritten {
                Ok(()) => return,
                Err(err) => warn!(error = %err, "failed to rewrite durable session record"),
            }
        }
        if let Err(err) = self.clear_durable() {
            warn!(error = %err, "durable session record retained after failed login");
        }
    }

    /// Remove both keys. If a removal fails, blank the token instead: a blank
    /// token is malformed, so `restore` discards it rather than resuming.
    fn clear_durable(&self) -> Result<(), StorageError> {
        let mut failed = false;
        for key in [&self.keys.token, &self.keys.profile] {
            if let Err(err) = self.storage.remove(key) {
                warn!(%key, error = %err, "failed to clear durable session key");
                failed = true;
            }
        }
        if failed {
            self.storage.put(&self.keys.token, "")?;
            debug!("durable session token blanked");
        }
        Ok(())
    }

    fn read_key(&self, key: &str) -> Result<Option<String>, SessionError> {
        self.storage.get(key).map_err(|err| match err {
            StorageError::Json(e) => SessionError::MalformedDurableRecord(format!("unreadable storage: {e}")),
            other => SessionError::Storage(other),
        })
    }

    fn read_durable(&self) -> Result<Option<(String, Profile)>, SessionError> {
        let token = self.read_key(&self.keys.token)?;
        let profile = self.read_key(&self.keys.profile)?;
        match (token, profile) {
            (None, None) => Ok(None),
            (Some(token), Some(_)) if token.trim().is_empty() => {
                Err(SessionError::MalformedDurableRecord("empty token".to_owned()))
            }
            (Some(token), Some(raw)) => {
                let profile = serde_json::from_str(&raw)
                    .map_err(|e| SessionError::MalformedDurableRecord(format!("unreadable profile: {e}")))?;
                Ok(Some((token, profile)))
            }
            (Some(_), None) => Err(SessionError::MalformedDurableRecord("token without profile".to_owned())),
            (None, Some(_)) => Err(SessionError::MalformedDurableRecord("profile without token".to_owned())),
        }
    }
}

impl SessionAccess for SessionStore {
    fn session(&self) -> Session {
        SessionStore::session(self)
    }

    fn force_logout(&self, issued_under: SessionTag) -> bool {
        let mut inner = self.lock();
        match inner.session.tag() {
            Some(current) if current == issued_under => self.clear(&mut inner) != LogoutOutcome::AlreadyAnonymous,
            Some(current) => {
                debug!(stale = issued_under.value(), current = current.value(), "ignoring 401 from superseded session");
                false
            }
            None => false,
        }
    }
}
