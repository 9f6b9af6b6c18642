//! Client-held authentication session.
//!
//! DESIGN
//! ======
//! `SessionState` is constructed once at startup from durable storage and
//! shared as `Arc<SessionState>` with the request client and the navigator.
//! Token and roles live behind one lock so `login`/`logout` replace them
//! together; readers never observe a token without its roles.
//!
//! Persisted shape is flat: `authToken` holds the token string and `roles`
//! holds a JSON array of role names. Persistence failures are logged and
//! never surfaced; the in-memory session is authoritative for this process.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use super::storage::Storage;

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

pub const TOKEN_KEY: &str = "authToken";
pub const ROLES_KEY: &str = "roles";

// =============================================================================
// ROLE
// =============================================================================

/// Role granted by the backend. Declaration order is redirect precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Customer,
    Professional,
}

impl Role {
    /// Highest-precedence first.
    pub const PRECEDENCE: [Role; 3] = [Role::Admin, Role::Customer, Role::Professional];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Customer => "customer",
            Self::Professional => "professional",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "customer" => Ok(Self::Customer),
            "professional" => Ok(Self::Professional),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

/// Parse backend role names, dropping ones this client does not know.
pub fn parse_roles<I, S>(names: I) -> Vec<Role>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .filter_map(|name| match name.as_ref().parse::<Role>() {
            Ok(role) => Some(role),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring role");
                None
            }
        })
        .collect()
}

// =============================================================================
// SESSION SNAPSHOT
// =============================================================================

/// Point-in-time copy of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    pub token: Option<String>,
    pub roles: Vec<Role>,
}

impl Session {
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Roles held, or none when unauthenticated.
    #[must_use]
    pub fn effective_roles(&self) -> &[Role] {
        if self.is_authenticated() { &self.roles } else { &[] }
    }

    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.effective_roles().contains(&role)
    }

    /// Highest-precedence role held (admin > customer > professional).
    #[must_use]
    pub fn primary_role(&self) -> Option<Role> {
        Role::PRECEDENCE.into_iter().find(|role| self.has_role(*role))
    }
}

// =============================================================================
// SESSION STATE
// =============================================================================

pub struct SessionState {
    current: RwLock<Session>,
    storage: Arc<dyn Storage>,
}

impl SessionState {
    /// Restore the session persisted in `storage`.
    ///
    /// Unreadable entries load as an empty session; a malformed role list
    /// loads as no roles.
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let token = match storage.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read persisted token; starting anonymous");
                None
            }
        };
        let roles = match storage.get(ROLES_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(names) => parse_roles(names),
                Err(e) => {
                    tracing::warn!(error = %e, "persisted roles are not a JSON string array");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read persisted roles");
                Vec::new()
            }
        };
        tracing::debug!(authenticated = token.is_some(), roles = ?roles, "session restored");
        Self { current: RwLock::new(Session { token, roles }), storage }
    }

    fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.current.write().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    /// Roles held; empty when unauthenticated.
    #[must_use]
    pub fn roles(&self) -> Vec<Role> {
        self.read().effective_roles().to_vec()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated()
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.read().clone()
    }

    /// Replace token and roles together, then persist both.
    ///
    /// An empty token is treated as no token, matching what `load` restores.
    pub fn login(&self, token: impl Into<String>, roles: Vec<Role>) {
        let token = Some(token.into()).filter(|t| !t.is_empty());
        let next = Session { token, roles };
        let mut current = self.write();
        self.persist(&next);
        tracing::info!(authenticated = next.is_authenticated(), roles = ?next.roles, "session logged in");
        *current = next;
    }

    /// Clear token and roles and drop the persisted entries.
    pub fn logout(&self) {
        let mut current = self.write();
        self.clear_persisted();
        *current = Session::anonymous();
        tracing::info!("session logged out");
    }

    /// Callers hold the write lock.
    fn clear_persisted(&self) {
        // Token first: a leftover role list without a token restores anonymous.
        for key in [TOKEN_KEY, ROLES_KEY] {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!(error = %e, key, "failed to remove persisted session entry");
            }
        }
    }

    /// Callers hold the write lock. Storage never pairs a token with roles
    /// from another login: the old token goes first, the new token last.
    fn persist(&self, session: &Session) {
        let Some(token) = session.token.as_deref() else {
            self.clear_persisted();
            return;
        };
        let names: Vec<&str> = session.roles.iter().map(|r| r.as_str()).collect();
        let roles = match serde_json::to_string(&names) {
            Ok(roles) => roles,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode roles");
                self.clear_persisted();
                return;
            }
        };
        if let Err(e) = self.storage.remove(TOKEN_KEY) {
            tracing::warn!(error = %e, "failed to remove previous token; session not persisted");
            return;
        }
        if let Err(e) = self.storage.set(ROLES_KEY, &roles) {
            tracing::warn!(error = %e, "failed to persist roles; session not persisted");
            if let Err(e) = self.storage.remove(ROLES_KEY) {
                tracing::warn!(error = %e, "failed to remove previous roles");
            }
            return;
        }
        if let Err(e) = self.storage.set(TOKEN_KEY, token) {
            tracing::warn!(error = %e, "failed to persist token; session not persisted");
        }
    }
}
