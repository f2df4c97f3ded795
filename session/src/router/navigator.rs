//! Navigation capability used by the guard and by forced logout.
//!
//! Redirecting to the route that is already current is inert, which is what
//! keeps concurrent forced logouts from stacking login redirects.

#[cfg(test)]
#[path = "navigator_test.rs"]
mod navigator_test;

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::routes::RouteName;

pub trait Navigator: Send + Sync {
    /// Move to `target`. No-op if `target` is already current.
    fn redirect(&self, target: RouteName);

    /// Route currently displayed, if any navigation has happened yet.
    fn current(&self) -> Option<RouteName>;
}

/// In-memory navigator that records every route change.
#[derive(Debug, Default)]
pub struct HistoryNavigator {
    history: Mutex<Vec<RouteName>>,
}

impl HistoryNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Navigator that starts on `route`.
    #[must_use]
    pub fn starting_at(route: RouteName) -> Self {
        Self { history: Mutex::new(vec![route]) }
    }

    /// Every route entered so far, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<RouteName> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RouteName>> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Navigator for HistoryNavigator {
    fn redirect(&self, target: RouteName) {
        let mut history = self.lock();
        if history.last() == Some(&target) {
            return;
        }
        tracing::debug!(route = %target, "navigate");
        history.push(target);
    }

    fn current(&self) -> Option<RouteName> {
        self.lock().last().copied()
    }
}
