//! Authorization predicates
//!
//! Pure set-membership checks over a caller's raw role list and the
//! [`Registry`]. All functions are total: malformed or unknown role
//! strings contribute nothing, empty inputs follow the any/all
//! asymmetry below, and nothing here can fail.
//!
//! Empty requirement lists are asymmetric by design: "all of an empty
//! set" is vacuously true (no constraint to violate), while "any of an
//! empty set" is false (nothing that could be satisfied).

use crate::registry::{PermissionId, Registry};
use std::collections::HashSet;

/// Exact-match role membership.
pub fn has_role(roles: &[String], role: &str) -> bool {
    roles.iter().any(|r| r == role)
}

/// At least one of `wanted` is held. Empty `wanted` is false.
pub fn has_any_role<S: AsRef<str>>(roles: &[String], wanted: &[S]) -> bool {
    wanted.iter().any(|r| has_role(roles, r.as_ref()))
}

/// Every one of `wanted` is held. Empty `wanted` is vacuously true.
pub fn has_all_roles<S: AsRef<str>>(roles: &[String], wanted: &[S]) -> bool {
    wanted.iter().all(|r| has_role(roles, r.as_ref()))
}

/// Union of the permission sets granted by `roles`, deduplicated.
///
/// Unknown roles contribute nothing; an empty role list yields the
/// empty set.
pub fn permissions_for_roles(registry: &Registry, roles: &[String]) -> HashSet<PermissionId> {
    let mut permissions = HashSet::new();
    for role in roles {
        permissions.extend(registry.permissions_of(role).iter().cloned());
    }
    permissions
}

/// Whether any held role grants `permission`.
pub fn has_permission(registry: &Registry, roles: &[String], permission: &str) -> bool {
    roles
        .iter()
        .any(|role| registry.permissions_of(role).contains(permission))
}

/// At least one of `wanted` is granted. Empty `wanted` is false.
pub fn has_any_permission<S: AsRef<str>>(
    registry: &Registry,
    roles: &[String],
    wanted: &[S],
) -> bool {
    wanted
        .iter()
        .any(|p| has_permission(registry, roles, p.as_ref()))
}

/// Every one of `wanted` is granted. Empty `wanted` is vacuously true.
pub fn has_all_permissions<S: AsRef<str>>(
    registry: &Registry,
    roles: &[String],
    wanted: &[S],
) -> bool {
    wanted
        .iter()
        .all(|p| has_permission(registry, roles, p.as_ref()))
}
