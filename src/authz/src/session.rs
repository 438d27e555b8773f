//! Session types and identity sources
//!
//! The authorization core does not authenticate anyone. It consumes the
//! authenticated identity produced by the auth subsystem through the
//! [`SessionSource`] trait: "given the current request, hand me the
//! session, or its absence, or the lookup failure."

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Authenticated identity for one user within their active organization.
///
/// A session with no `roles` field behaves exactly like one with an
/// empty role list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// User identifier
    pub user_id: String,

    /// Roles granted by the user's organization membership
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
}

impl Session {
    /// Create a session with no roles.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            roles: None,
        }
    }

    /// Attach a role list.
    pub fn with_roles<S: Into<String>>(mut self, roles: impl IntoIterator<Item = S>) -> Self {
        self.roles = Some(roles.into_iter().map(Into::into).collect());
        self
    }

    /// The role list, empty when the field is absent.
    pub fn roles(&self) -> &[String] {
        self.roles.as_deref().unwrap_or(&[])
    }
}

/// Current-identity provider.
///
/// `resolve` returns `Ok(None)` for an anonymous caller; lookup
/// failures must be returned as errors, never folded into `None`.
#[async_trait]
pub trait SessionSource: Send + Sync {
    /// Resolve the current session, if any.
    async fn resolve(&self) -> Result<Option<Session>>;
}

/// A source bound to an already-resolved session value.
///
/// Binds a per-request identity for the guards, and doubles as the
/// simplest test double.
#[derive(Debug, Clone)]
pub struct StaticSession(pub Option<Session>);

#[async_trait]
impl SessionSource for StaticSession {
    async fn resolve(&self) -> Result<Option<Session>> {
        Ok(self.0.clone())
    }
}

impl From<Session> for StaticSession {
    fn from(session: Session) -> Self {
        StaticSession(Some(session))
    }
}

impl From<Option<Session>> for StaticSession {
    fn from(session: Option<Session>) -> Self {
        StaticSession(session)
    }
}

/// In-memory token → session store.
///
/// Stands in for the platform's session backend at the HTTP boundary
/// and in integration tests.
#[derive(Debug, Default)]
pub struct MemorySessions {
    sessions: RwLock<HashMap<String, Session>>,
}

impl MemorySessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session under a bearer token.
    pub async fn insert(&self, token: impl Into<String>, session: Session) {
        self.sessions.write().await.insert(token.into(), session);
    }

    /// Remove a session (sign-out).
    pub async fn remove(&self, token: &str) {
        self.sessions.write().await.remove(token);
    }

    /// Look up the session for a token.
    pub async fn get(&self, token: &str) -> Option<Session> {
        self.sessions.read().await.get(token).cloned()
    }

    /// A [`SessionSource`] bound to one request's bearer token.
    pub fn for_token(self: &Arc<Self>, token: Option<String>) -> TokenSession {
        TokenSession {
            store: Arc::clone(self),
            token,
        }
    }
}

/// Per-request source resolving a bearer token against [`MemorySessions`].
#[derive(Debug, Clone)]
pub struct TokenSession {
    store: Arc<MemorySessions>,
    token: Option<String>,
}

#[async_trait]
impl SessionSource for TokenSession {
    async fn resolve(&self) -> Result<Option<Session>> {
        match &self.token {
            Some(token) => Ok(self.store.get(token).await),
            None => Ok(None),
        }
    }
}
