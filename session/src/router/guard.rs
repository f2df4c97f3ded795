//! Navigation guard evaluated before every route transition.
//!
//! Rules, first match wins:
//! 1. auth required and anonymous: go to login
//! 2. admin required and not an admin (anonymous included): go to landing
//! 3. guest-only and authenticated: go to landing
//! 4. otherwise allow
//!
//! The guard only reads the session. It never calls the network and never
//! changes state.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use std::sync::Arc;

use super::routes::{RouteMeta, RouteName};
use crate::net::types::Role;
use crate::state::session::{Requirement, SessionAccess};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect(RouteName),
}

pub struct Guard {
    session: Arc<dyn SessionAccess>,
    login_route: RouteName,
    landing_route: RouteName,
}

impl Guard {
    pub fn new(session: Arc<dyn SessionAccess>, login_route: RouteName, landing_route: RouteName) -> Self {
        Self { session, login_route, landing_route }
    }

    #[must_use]
    pub fn evaluate(&self, meta: RouteMeta) -> Decision {
        let allowed = |requirement| self.session.is_authorized(requirement);

        if meta.requires_auth && !allowed(Requirement::Authenticated) {
            return Decision::Redirect(self.login_route);
        }
        if meta.requires_admin && !allowed(Requirement::Role(Role::Admin)) {
            return Decision::Redirect(self.landing_route);
        }
        if meta.requires_guest_only && !allowed(Requirement::Guest) {
            return Decision::Redirect(self.landing_route);
        }
        Decision::Allow
    }

    #[must_use]
    pub fn check(&self, route: RouteName) -> Decision {
        self.evaluate(route.meta())
    }
}
