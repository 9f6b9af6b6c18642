//! Static route table and per-route access declarations.

use std::fmt;

use crate::state::session::{Role, Session};

#[cfg(test)]
#[path = "routes_test.rs"]
mod tests;

pub const HOME_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/auth/login";
pub const REGISTER_PATH: &str = "/auth/register";
pub const DASHBOARD_PATH: &str = "/dashboard";
pub const SERVICES_PATH: &str = "/services";
pub const ADMIN_HOME: &str = "/admin/dashboard";
pub const CUSTOMER_HOME: &str = "/customer/dashboard";
pub const PROFESSIONAL_HOME: &str = "/professional/dashboard";

/// Who may navigate to a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// No restriction.
    Public,
    /// Only while signed out.
    GuestOnly,
    /// Signed in, any role.
    Authenticated,
    /// Signed in and holding the role.
    RequiresAuth(Role),
}

impl Access {
    #[must_use]
    pub fn requires_auth(self) -> bool {
        matches!(self, Self::Authenticated | Self::RequiresAuth(_))
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => f.write_str("public"),
            Self::GuestOnly => f.write_str("guest-only"),
            Self::Authenticated => f.write_str("requires-auth"),
            Self::RequiresAuth(role) => write!(f, "requires-auth({role})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub name: &'static str,
    pub path: &'static str,
    pub access: Access,
}

impl RouteEntry {
    #[must_use]
    pub const fn new(name: &'static str, path: &'static str, access: Access) -> Self {
        Self { name, path, access }
    }
}

/// Landing route for a role.
#[must_use]
pub fn home_route(role: Role) -> &'static str {
    match role {
        Role::Admin => ADMIN_HOME,
        Role::Customer => CUSTOMER_HOME,
        Role::Professional => PROFESSIONAL_HOME,
    }
}

/// Landing route for the session's highest-precedence role, if it has one.
#[must_use]
pub fn home_for(session: &Session) -> Option<&'static str> {
    session.primary_role().map(home_route)
}

/// Strip query and fragment, force a leading slash, drop trailing slashes.
#[must_use]
pub fn normalize_path(raw: &str) -> String {
    let end = raw.find(['?', '#']).unwrap_or(raw.len());
    let trimmed = raw[..end].trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return HOME_PATH.to_owned();
    }
    if trimmed.starts_with('/') { trimmed.to_owned() } else { format!("/{trimmed}") }
}

// =============================================================================
// ROUTE TABLE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    #[must_use]
    pub fn new(entries: Vec<RouteEntry>) -> Self {
        Self { entries }
    }

    /// The marketplace's routes.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(vec![
            RouteEntry::new("home", HOME_PATH, Access::GuestOnly),
            RouteEntry::new("login", LOGIN_PATH, Access::GuestOnly),
            RouteEntry::new("register", REGISTER_PATH, Access::GuestOnly),
            RouteEntry::new("dashboard", DASHBOARD_PATH, Access::Authenticated),
            RouteEntry::new("services", SERVICES_PATH, Access::Public),
            RouteEntry::new("admin-dashboard", ADMIN_HOME, Access::RequiresAuth(Role::Admin)),
            RouteEntry::new("customer-dashboard", CUSTOMER_HOME, Access::RequiresAuth(Role::Customer)),
            RouteEntry::new("professional-dashboard", PROFESSIONAL_HOME, Access::RequiresAuth(Role::Professional)),
        ])
    }

    #[must_use]
    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// Entry whose path matches `path` after normalization.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<&RouteEntry> {
        let path = normalize_path(path);
        self.entries.iter().find(|entry| entry.path == path)
    }

    /// Declared access for `path`. Unlisted paths are public; the view
    /// layer renders its own not-found page for them.
    #[must_use]
    pub fn access_for(&self, path: &str) -> Access {
        self.lookup(path).map_or(Access::Public, |entry| entry.access)
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::standard()
    }
}
