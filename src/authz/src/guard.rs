//! Enforcement wrappers
//!
//! Single-shot gates in front of request handlers. Each invocation
//! resolves the session once, checks one [`Requirement`], and either
//! forwards to the handler unchanged or fails with a structured error:
//!
//! - no session at all → [`AuthzError::Unauthorized`], checked before
//!   any permission/role evaluation;
//! - session present but requirement unmet → [`AuthzError::Forbidden`]
//!   naming the full missing requirement;
//! - identity-source failure → propagated unchanged, never downgraded
//!   to `Unauthorized`.

use crate::access::{Access, AccessResolver};
use crate::error::{AuthzError, Result};
use futures::future::BoxFuture;
use serde::Serialize;
use std::fmt;
use std::future::Future;
use tracing::debug;

/// One gate requirement.
///
/// `Any*` lists follow OR semantics and fail when empty; `All*` lists
/// follow AND semantics and are vacuously satisfied when empty. The
/// whole value is serialized into Forbidden error payloads, so the
/// surrounding HTTP layer can name exactly what was missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Requirement {
    Permission(String),
    Role(String),
    AnyPermission(Vec<String>),
    AllPermissions(Vec<String>),
    AnyRole(Vec<String>),
    AllRoles(Vec<String>),
}

impl Requirement {
    /// Whether the facade satisfies this requirement.
    pub fn satisfied_by(&self, access: &Access) -> bool {
        match self {
            Requirement::Permission(p) => access.can(p),
            Requirement::Role(r) => access.is(r),
            Requirement::AnyPermission(ps) => access.can_any(ps),
            Requirement::AllPermissions(ps) => access.can_all(ps),
            Requirement::AnyRole(rs) => access.is_any(rs),
            Requirement::AllRoles(rs) => access.is_all(rs),
        }
    }

    /// Gate check: Unauthorized for anonymous callers, Forbidden when
    /// the requirement is unmet, Ok otherwise.
    pub fn check(&self, access: &Access) -> Result<()> {
        if access.session().is_none() {
            debug!(requirement = %self, "denied: no session");
            return Err(AuthzError::Unauthorized);
        }

        if self.satisfied_by(access) {
            Ok(())
        } else {
            debug!(requirement = %self, roles = ?access.roles(), "denied: requirement not met");
            Err(AuthzError::Forbidden(self.clone()))
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Permission(p) => write!(f, "permission '{}'", p),
            Requirement::Role(r) => write!(f, "role '{}'", r),
            Requirement::AnyPermission(ps) => {
                write!(f, "any of permissions [{}]", ps.join(", "))
            }
            Requirement::AllPermissions(ps) => {
                write!(f, "all of permissions [{}]", ps.join(", "))
            }
            Requirement::AnyRole(rs) => write!(f, "any of roles [{}]", rs.join(", ")),
            Requirement::AllRoles(rs) => write!(f, "all of roles [{}]", rs.join(", ")),
        }
    }
}

/// Resolve the session and enforce `requirement`, returning the facade
/// for the handler's own use.
pub async fn require(resolver: &AccessResolver, requirement: Requirement) -> Result<Access> {
    let access = resolver.resolve().await?;
    requirement.check(&access)?;
    Ok(access)
}

pub async fn require_permission(
    resolver: &AccessResolver,
    permission: impl Into<String>,
) -> Result<Access> {
    require(resolver, Requirement::Permission(permission.into())).await
}

pub async fn require_role(resolver: &AccessResolver, role: impl Into<String>) -> Result<Access> {
    require(resolver, Requirement::Role(role.into())).await
}

pub async fn require_any_permission<S: Into<String>>(
    resolver: &AccessResolver,
    permissions: impl IntoIterator<Item = S>,
) -> Result<Access> {
    require(
        resolver,
        Requirement::AnyPermission(permissions.into_iter().map(Into::into).collect()),
    )
    .await
}

pub async fn require_all_permissions<S: Into<String>>(
    resolver: &AccessResolver,
    permissions: impl IntoIterator<Item = S>,
) -> Result<Access> {
    require(
        resolver,
        Requirement::AllPermissions(permissions.into_iter().map(Into::into).collect()),
    )
    .await
}

pub async fn require_any_role<S: Into<String>>(
    resolver: &AccessResolver,
    roles: impl IntoIterator<Item = S>,
) -> Result<Access> {
    require(
        resolver,
        Requirement::AnyRole(roles.into_iter().map(Into::into).collect()),
    )
    .await
}

pub async fn require_all_roles<S: Into<String>>(
    resolver: &AccessResolver,
    roles: impl IntoIterator<Item = S>,
) -> Result<Access> {
    require(
        resolver,
        Requirement::AllRoles(roles.into_iter().map(Into::into).collect()),
    )
    .await
}

/// Wrap a handler behind a requirement, preserving its signature.
///
/// The returned callable checks the gate first; on success it forwards
/// its argument to `handler` unchanged and yields the handler's result,
/// on failure the handler is never invoked. Handlers taking several
/// values use a tuple argument.
pub fn with_requirement<A, T, F, Fut>(
    resolver: AccessResolver,
    requirement: Requirement,
    handler: F,
) -> impl Fn(A) -> BoxFuture<'static, Result<T>>
where
    A: Send + 'static,
    T: Send + 'static,
    F: Fn(A) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = T> + Send + 'static,
{
    move |args: A| {
        let resolver = resolver.clone();
        let requirement = requirement.clone();
        let handler = handler.clone();

        Box::pin(async move {
            let access = resolver.resolve().await?;
            requirement.check(&access)?;
            Ok(handler(args).await)
        })
    }
}

/// [`with_requirement`] for a single permission.
pub fn with_permission<A, T, F, Fut>(
    resolver: AccessResolver,
    permission: impl Into<String>,
    handler: F,
) -> impl Fn(A) -> BoxFuture<'static, Result<T>>
where
    A: Send + 'static,
    T: Send + 'static,
    F: Fn(A) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = T> + Send + 'static,
{
    with_requirement(resolver, Requirement::Permission(permission.into()), handler)
}

/// [`with_requirement`] for a single role.
pub fn with_role<A, T, F, Fut>(
    resolver: AccessResolver,
    role: impl Into<String>,
    handler: F,
) -> impl Fn(A) -> BoxFuture<'static, Result<T>>
where
    A: Send + 'static,
    T: Send + 'static,
    F: Fn(A) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = T> + Send + 'static,
{
    with_requirement(resolver, Requirement::Role(role.into()), handler)
}
