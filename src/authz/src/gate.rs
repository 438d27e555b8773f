//! View-level conditional gate
//!
//! [`Gate`] decides between two render subtrees based on the facade,
//! without ever failing: insufficient privilege just yields the
//! fallback. Requirement fields are opt-in; every supplied field must
//! pass (AND across kinds), with OR inside `any_*` lists and AND inside
//! `all_*` lists. A gate with no fields always renders the primary
//! subtree.

use crate::access::Access;

/// Declarative requirement set for conditional rendering.
///
/// Fields are checked in declaration order and short-circuit on the
/// first failure; predicates are pure, so the order is unobservable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Gate {
    permission: Option<String>,
    any_permission: Option<Vec<String>>,
    all_permissions: Option<Vec<String>>,
    role: Option<String>,
    any_role: Option<Vec<String>>,
    all_roles: Option<Vec<String>>,
}

impl Gate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a single permission.
    pub fn permission(mut self, permission: impl Into<String>) -> Self {
        self.permission = Some(permission.into());
        self
    }

    /// Require at least one of the listed permissions.
    pub fn any_permission<S: Into<String>>(
        mut self,
        permissions: impl IntoIterator<Item = S>,
    ) -> Self {
        self.any_permission = Some(permissions.into_iter().map(Into::into).collect());
        self
    }

    /// Require every listed permission.
    pub fn all_permissions<S: Into<String>>(
        mut self,
        permissions: impl IntoIterator<Item = S>,
    ) -> Self {
        self.all_permissions = Some(permissions.into_iter().map(Into::into).collect());
        self
    }

    /// Require a single role.
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Require at least one of the listed roles.
    pub fn any_role<S: Into<String>>(mut self, roles: impl IntoIterator<Item = S>) -> Self {
        self.any_role = Some(roles.into_iter().map(Into::into).collect());
        self
    }

    /// Require every listed role.
    pub fn all_roles<S: Into<String>>(mut self, roles: impl IntoIterator<Item = S>) -> Self {
        self.all_roles = Some(roles.into_iter().map(Into::into).collect());
        self
    }

    /// Whether every supplied requirement passes for this facade.
    pub fn allows(&self, access: &Access) -> bool {
        if let Some(p) = &self.permission {
            if !access.can(p) {
                return false;
            }
        }
        if let Some(ps) = &self.any_permission {
            if !access.can_any(ps) {
                return false;
            }
        }
        if let Some(ps) = &self.all_permissions {
            if !access.can_all(ps) {
                return false;
            }
        }
        if let Some(r) = &self.role {
            if !access.is(r) {
                return false;
            }
        }
        if let Some(rs) = &self.any_role {
            if !access.is_any(rs) {
                return false;
            }
        }
        if let Some(rs) = &self.all_roles {
            if !access.is_all(rs) {
                return false;
            }
        }
        true
    }

    /// Render `primary` when the gate allows, `fallback` otherwise.
    pub fn render<T>(
        &self,
        access: &Access,
        primary: impl FnOnce() -> T,
        fallback: impl FnOnce() -> T,
    ) -> T {
        if self.allows(access) {
            primary()
        } else {
            fallback()
        }
    }

    /// Render `primary` when the gate allows, nothing otherwise.
    pub fn render_or_default<T: Default>(&self, access: &Access, primary: impl FnOnce() -> T) -> T {
        self.render(access, primary, T::default)
    }
}
