//! Session permission facade
//!
//! [`Access`] bundles a resolved session, its role list, and the
//! predicate library into one per-request value. Two adapters produce
//! it from different session feeds with identical authorization logic:
//!
//! - [`AccessResolver`] for request handling: re-resolves the session
//!   from its [`SessionSource`] on every call, so each check reflects
//!   the identity at that moment.
//! - [`AccessWatch`] for reactive consumers: snapshots a
//!   `tokio::sync::watch` channel fed by the session layer and yields a
//!   fresh facade whenever the session value changes.

use crate::error::Result;
use crate::predicate;
use crate::registry::{PermissionId, Registry};
use crate::session::{Session, SessionSource};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Per-request (or per-render) permission facade.
///
/// Cheap to construct and intended to be short-lived; build a fresh one
/// per request rather than caching across requests.
#[derive(Debug, Clone)]
pub struct Access {
    registry: Arc<Registry>,
    session: Option<Session>,
    roles: Vec<String>,
}

impl Access {
    /// Build a facade from an already-resolved session.
    pub fn new(registry: Arc<Registry>, session: Option<Session>) -> Self {
        let roles = session
            .as_ref()
            .map(|s| s.roles().to_vec())
            .unwrap_or_default();

        Self {
            registry,
            session,
            roles,
        }
    }

    /// Whether any held role grants `permission`.
    pub fn can(&self, permission: &str) -> bool {
        predicate::has_permission(&self.registry, &self.roles, permission)
    }

    /// At least one of `permissions` is granted. Empty list is false.
    pub fn can_any<S: AsRef<str>>(&self, permissions: &[S]) -> bool {
        predicate::has_any_permission(&self.registry, &self.roles, permissions)
    }

    /// Every one of `permissions` is granted. Empty list is vacuously true.
    pub fn can_all<S: AsRef<str>>(&self, permissions: &[S]) -> bool {
        predicate::has_all_permissions(&self.registry, &self.roles, permissions)
    }

    /// Exact role membership.
    pub fn is(&self, role: &str) -> bool {
        predicate::has_role(&self.roles, role)
    }

    /// At least one of `roles` is held. Empty list is false.
    pub fn is_any<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        predicate::has_any_role(&self.roles, roles)
    }

    /// Every one of `roles` is held. Empty list is vacuously true.
    pub fn is_all<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        predicate::has_all_roles(&self.roles, roles)
    }

    /// The resolved role list (empty for anonymous callers).
    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    /// The full permission union across the held roles.
    pub fn permissions(&self) -> HashSet<PermissionId> {
        predicate::permissions_for_roles(&self.registry, &self.roles)
    }

    /// The underlying session, if any.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }
}

/// Request-scoped facade factory.
///
/// Holds the registry and the identity source; `resolve` performs the
/// (possibly async) session lookup and wraps the result. Identity-source
/// failures propagate unchanged so the caller can distinguish an outage
/// from an anonymous request.
#[derive(Clone)]
pub struct AccessResolver {
    registry: Arc<Registry>,
    source: Arc<dyn SessionSource>,
}

impl AccessResolver {
    pub fn new(registry: Arc<Registry>, source: Arc<dyn SessionSource>) -> Self {
        Self { registry, source }
    }

    /// Resolve the current session and build a facade around it.
    ///
    /// Re-resolves on every call; nothing is cached here.
    pub async fn resolve(&self) -> Result<Access> {
        let session = self.source.resolve().await?;

        debug!(
            user_id = session.as_ref().map(|s| s.user_id.as_str()),
            "resolved session for access check"
        );

        Ok(Access::new(Arc::clone(&self.registry), session))
    }
}

/// Create a reactive session feed.
///
/// Returns the writer handed to the session layer and the watch handed
/// to consumers. Replacing the session value wakes every watcher.
pub fn session_channel(
    registry: Arc<Registry>,
    initial: Option<Session>,
) -> (SessionWriter, AccessWatch) {
    let (tx, rx) = watch::channel(initial);
    (SessionWriter { tx }, AccessWatch { registry, rx })
}

/// Writer side of a reactive session feed (sign-in/sign-out events).
#[derive(Debug)]
pub struct SessionWriter {
    tx: watch::Sender<Option<Session>>,
}

impl SessionWriter {
    /// Publish a new session value (None for sign-out).
    pub fn replace(&self, session: Option<Session>) {
        // send only fails when every watcher is gone, which is fine.
        let _ = self.tx.send(session);
    }
}

/// Reactive facade over a session feed.
#[derive(Debug, Clone)]
pub struct AccessWatch {
    registry: Arc<Registry>,
    rx: watch::Receiver<Option<Session>>,
}

impl AccessWatch {
    /// Facade over the session value as of now.
    pub fn current(&self) -> Access {
        Access::new(Arc::clone(&self.registry), self.rx.borrow().clone())
    }

    /// Wait for the session value to change, then snapshot it.
    ///
    /// Returns `None` once the writer is dropped.
    pub async fn next(&mut self) -> Option<Access> {
        self.rx.changed().await.ok()?;
        Some(self.current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{permission, role};
    use crate::session::StaticSession;

    fn registry() -> Arc<Registry> {
        Arc::new(Registry::default())
    }

    #[test]
    fn test_facade_role_predicates() {
        let session = Session::new("user-1").with_roles(["manager", "staff"]);
        let access = Access::new(registry(), Some(session));

        assert!(access.is(role::MANAGER));
        assert!(access.is(role::STAFF));
        assert!(!access.is(role::ADMIN));
        assert!(access.is_any(&[role::MANAGER, role::ADMIN]));
        assert!(!access.is_all(&[role::MANAGER, role::ADMIN]));
        assert_eq!(access.roles(), ["manager", "staff"]);
    }

    #[test]
    fn test_anonymous_facade() {
        let access = Access::new(registry(), None);

        assert!(access.roles().is_empty());
        assert!(access.session().is_none());
        assert!(!access.can(permission::ORG_VIEW));
        assert!(!access.is(role::GUEST));
        assert!(!access.can_any(&[permission::ORG_VIEW]));

        // Vacuous truth still holds with zero roles.
        assert!(access.can_all::<&str>(&[]));
        assert!(access.is_all::<&str>(&[]));
        assert!(!access.can_any::<&str>(&[]));
        assert!(!access.is_any::<&str>(&[]));
    }

    #[test]
    fn test_session_without_roles_field() {
        let access = Access::new(registry(), Some(Session::new("user-1")));

        assert!(access.session().is_some());
        assert!(access.roles().is_empty());
        assert!(!access.can(permission::ORG_VIEW));
    }

    #[test]
    fn test_permission_union_exposed() {
        let session = Session::new("user-1").with_roles(["guest"]);
        let access = Access::new(registry(), Some(session));

        let permissions = access.permissions();
        assert!(permissions.contains(permission::ORG_VIEW));
        assert!(permissions.contains(permission::FACILITY_VIEW));
        assert_eq!(permissions.len(), 2);
    }

    #[tokio::test]
    async fn test_resolver_reresolves_per_call() {
        let resolver = AccessResolver::new(
            registry(),
            Arc::new(StaticSession::from(
                Session::new("user-1").with_roles(["admin"]),
            )),
        );

        let first = resolver.resolve().await.unwrap();
        let second = resolver.resolve().await.unwrap();
        assert!(first.can(permission::ORG_EDIT));
        assert!(second.can(permission::ORG_EDIT));
    }

    #[tokio::test]
    async fn test_watch_reflects_session_changes() {
        let (writer, mut watch) = session_channel(registry(), None);

        assert!(!watch.current().can(permission::ORG_EDIT));

        writer.replace(Some(Session::new("user-1").with_roles(["admin"])));
        let access = watch.next().await.unwrap();
        assert!(access.can(permission::ORG_EDIT));

        writer.replace(None);
        let access = watch.next().await.unwrap();
        assert!(!access.can(permission::ORG_EDIT));
        assert!(access.session().is_none());

        drop(writer);
        assert!(watch.next().await.is_none());
    }
}
