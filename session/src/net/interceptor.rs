//! Unauthorized-response interceptor.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every protected call to the resource service is wrapped by
//! [`Interceptor::call`]. It is the only place that decides a token is no
//! longer valid: a 401 forces the session back to anonymous and sends the
//! shell to the login surface before the error reaches the caller. Other
//! errors pass through untouched.
//!
//! Two requests failing with 401 at once produce one logout: the second
//! `force_logout` finds the session already ended, and redirecting to the
//! login route while already on it is inert.

#[cfg(test)]
#[path = "interceptor_test.rs"]
mod interceptor_test;

use std::future::Future;
use std::sync::Arc;

use super::error::ServiceError;
use crate::router::navigator::Navigator;
use crate::router::routes::RouteName;
use crate::state::session::{SessionAccess, SessionTag};

pub struct Interceptor {
    session: Arc<dyn SessionAccess>,
    navigator: Option<Arc<dyn Navigator>>,
    login_route: RouteName,
}

impl Interceptor {
    pub fn new(session: Arc<dyn SessionAccess>) -> Self {
        Self { session, navigator: None, login_route: RouteName::Login }
    }

    #[must_use]
    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>, login_route: RouteName) -> Self {
        self.navigator = Some(navigator);
        self.login_route = login_route;
        self
    }

    /// Await `request`, issued under session `tag`, and apply the forced
    /// logout protocol if it fails with 401.
    ///
    /// # Errors
    ///
    /// Returns the request's own error unchanged.
    pub async fn call<T, F>(&self, tag: SessionTag, request: F) -> Result<T, ServiceError>
    where
        F: Future<Output = Result<T, ServiceError>>,
    {
        let result = request.await;
        if let Err(err) = &result {
            if err.is_unauthorized() {
                self.on_unauthorized(tag);
            }
        }
        result
    }

    fn on_unauthorized(&self, tag: SessionTag) {
        if self.session.force_logout(tag) {
            tracing::warn!(tag = tag.value(), "token rejected by resource service; session ended");
        }
        if self.session.session().is_authenticated() {
            // A newer session replaced the one this request belonged to.
            return;
        }
        if let Some(navigator) = &self.navigator {
            navigator.redirect(self.login_route);
        }
    }
}
