//! Shell adapter: wires store, interceptor, guard and navigator together.
//!
//! DESIGN
//! ======
//! The store's transitions return outcomes and never navigate. This adapter is
//! the thin layer that turns them into redirects, and the only place that
//! drives the navigator besides the interceptor's forced logout. Screens talk
//! to the `Shell`; tests can still drive the store directly.

#[cfg(test)]
#[path = "shell_test.rs"]
mod shell_test;

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::net::api::ResourceService;
use crate::net::interceptor::Interceptor;
use crate::net::types::{Profile, SlowData, UserRecord};
use crate::router::guard::{Decision, Guard};
use crate::router::navigator::Navigator;
use crate::router::routes::{self, RouteError, RouteName};
use crate::state::error::SessionError;
use crate::state::store::{LogoutOutcome, RestoreOutcome, SessionStore};
use crate::util::storage::SessionStorage;

/// Guard redirects followed before giving up on a navigation.
const MAX_REDIRECTS: usize = 4;

pub struct Shell {
    config: SessionConfig,
    store: Arc<SessionStore>,
    interceptor: Interceptor,
    guard: Guard,
    navigator: Arc<dyn Navigator>,
}

impl Shell {
    pub fn new(
        config: SessionConfig,
        service: Arc<dyn ResourceService>,
        storage: Arc<dyn SessionStorage>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let store = Arc::new(SessionStore::new(service, storage, config.keys.clone()));
        let interceptor = Interceptor::new(store.clone()).with_navigator(navigator.clone(), config.login_route);
        let guard = Guard::new(store.clone(), config.login_route, config.landing_route);
        Self { config, store, interceptor, guard, navigator }
    }

    /// Build the shell and rehydrate any persisted session.
    pub fn start(
        config: SessionConfig,
        service: Arc<dyn ResourceService>,
        storage: Arc<dyn SessionStorage>,
        navigator: Arc<dyn Navigator>,
    ) -> (Self, RestoreOutcome) {
        let shell = Self::new(config, service, storage, navigator);
        let restored = shell.store.restore();
        (shell, restored)
    }

    #[must_use]
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    #[must_use]
    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    #[must_use]
    pub fn guard(&self) -> &Guard {
        &self.guard
    }

    // =========================================================================
    // NAVIGATION
    // =========================================================================

    /// Navigate to `path`, applying the guard and following its redirects.
    /// Returns the route the shell ended up on.
    ///
    /// # Errors
    ///
    /// [`RouteError::NotFound`] for unknown paths, [`RouteError::RedirectLoop`]
    /// if guard redirects do not settle.
    pub fn visit(&self, path: &str) -> Result<RouteName, RouteError> {
        let route = routes::resolve(path)?;
        self.navigate(route)
    }

    fn navigate(&self, requested: RouteName) -> Result<RouteName, RouteError> {
        let mut target = requested;
        for _ in 0..MAX_REDIRECTS {
            match self.guard.check(target) {
                Decision::Allow => {
                    self.navigator.redirect(target);
                    return Ok(target);
                }
                Decision::Redirect(next) => {
                    debug!(from = %target, to = %next, "guard redirect");
                    target = next;
                }
            }
        }
        Err(RouteError::RedirectLoop(requested))
    }

    // =========================================================================
    // SESSION ACTIONS
    // =========================================================================

    /// Log in and move to the landing surface.
    ///
    /// # Errors
    ///
    /// See [`SessionStore::login`].
    pub async fn login(&self, username: &str, password: &str) -> Result<Profile, SessionError> {
        let profile = self.store.login(username, password).await?;
        if let Err(err) = self.navigate(self.config.landing_route) {
            debug!(error = %err, "post-login navigation did not settle");
        }
        Ok(profile)
    }

    /// Log out and return to the login surface.
    pub fn logout(&self) -> LogoutOutcome {
        let outcome = self.store.logout();
        match outcome {
            LogoutOutcome::LoggedOut => info!("logged out"),
            LogoutOutcome::DurableRecordRetained => warn!("logged out; stored session could not be cleared"),
            LogoutOutcome::AlreadyAnonymous => {}
        }
        self.navigator.redirect(self.config.login_route);
        outcome
    }

    /// # Errors
    ///
    /// See [`SessionStore::fetch_users`].
    pub async fn fetch_users(&self) -> Result<Vec<UserRecord>, SessionError> {
        self.store.fetch_users(&self.interceptor).await
    }

    /// # Errors
    ///
    /// See [`SessionStore::fetch_slow_data`].
    pub async fn fetch_slow_data(&self) -> Result<SlowData, SessionError> {
        self.store.fetch_slow_data(&self.interceptor).await
    }
}
