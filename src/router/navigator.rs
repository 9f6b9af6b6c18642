//! In-app navigation with the guard applied on every transition.

use std::sync::Arc;

use super::guard::{Decision, NavigationGuard};
use super::routes::normalize_path;
use crate::state::session::SessionState;

#[cfg(test)]
#[path = "navigator_test.rs"]
mod tests;

/// Oldest locations are dropped past this many entries.
pub const MAX_HISTORY: usize = 100;

/// Outcome of one navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub requested: String,
    pub location: String,
    pub decision: Decision,
}

impl Navigation {
    #[must_use]
    pub fn redirected(&self) -> bool {
        matches!(self.decision, Decision::Redirect { .. })
    }
}

pub struct Navigator {
    guard: NavigationGuard,
    session: Arc<SessionState>,
    history: Vec<String>,
}

impl Navigator {
    #[must_use]
    pub fn new(guard: NavigationGuard, session: Arc<SessionState>) -> Self {
        Self { guard, session, history: Vec::new() }
    }

    /// Current location; `None` before the first navigation.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.history.last().map(String::as_str)
    }

    /// Landed locations, oldest first, at most `MAX_HISTORY` of them.
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Navigate to `target`, landing on it or on exactly one redirect.
    ///
    /// The session is re-read on every call, so a login or logout between
    /// navigations changes the outcome of the next one.
    pub fn navigate(&mut self, target: &str) -> Navigation {
        let requested = normalize_path(target);
        let session = self.session.snapshot();
        let decision = self.guard.evaluate(&requested, &session);

        let location = match decision {
            Decision::Allow => {
                tracing::debug!(path = %requested, "navigation allowed");
                requested.clone()
            }
            Decision::Redirect { to, reason } => {
                tracing::info!(from = %requested, to, %reason, "navigation redirected");
                to.to_owned()
            }
        };

        if self.history.len() == MAX_HISTORY {
            self.history.remove(0);
        }
        self.history.push(location.clone());
        Navigation { requested, location, decision }
    }
}
