//! Navigation guard: one decision table for every route.
//!
//! DESIGN
//! ======
//! Rules are checked in priority order against the target's declared
//! `Access` and a session snapshot:
//! 1. auth required, no token          -> login route
//! 2. role required, role not held     -> the session's role home
//! 3. guest-only, token present        -> the session's role home
//! 4. otherwise                        -> allow
//!
//! Role home precedence is admin > customer > professional. A signed-in
//! session holding none of those roles has no home: rule 2 sends it to the
//! login route instead and rule 3 lets it through, so no redirect cycle can
//! form.

use std::fmt;

use super::routes::{Access, LOGIN_PATH, RouteTable, home_for};
use crate::state::session::{Role, Session};

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    Unauthenticated,
    MissingRole(Role),
    GuestOnly,
}

impl fmt::Display for RedirectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthenticated => f.write_str("authentication required"),
            Self::MissingRole(role) => write!(f, "role {role} required"),
            Self::GuestOnly => f.write_str("guest-only route"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect { to: &'static str, reason: RedirectReason },
}

/// Apply the decision table to one access requirement.
#[must_use]
pub fn decide(access: Access, session: &Session) -> Decision {
    if access.requires_auth() && !session.is_authenticated() {
        return Decision::Redirect { to: LOGIN_PATH, reason: RedirectReason::Unauthenticated };
    }
    match access {
        Access::RequiresAuth(role) if !session.has_role(role) => Decision::Redirect {
            to: home_for(session).unwrap_or(LOGIN_PATH),
            reason: RedirectReason::MissingRole(role),
        },
        Access::GuestOnly if session.is_authenticated() => match home_for(session) {
            Some(home) => Decision::Redirect { to: home, reason: RedirectReason::GuestOnly },
            None => Decision::Allow,
        },
        _ => Decision::Allow,
    }
}

#[derive(Debug, Clone, Default)]
pub struct NavigationGuard {
    table: RouteTable,
}

impl NavigationGuard {
    #[must_use]
    pub fn new(table: RouteTable) -> Self {
        Self { table }
    }

    #[must_use]
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Decide whether `path` may be entered with `session`.
    #[must_use]
    pub fn evaluate(&self, path: &str, session: &Session) -> Decision {
        decide(self.table.access_for(path), session)
    }
}
