//! Role-permission registry
//!
//! The closed role and permission enumerations for the platform, and the
//! immutable mapping from each role to the set of permissions it grants.
//! The registry is built once at startup and handed to consumers as a
//! value (usually behind an `Arc`), never read from ambient global state,
//! so tests can run against alternate tables.

use std::collections::{HashMap, HashSet};

/// Role identifier (opaque string token)
pub type RoleId = String;

/// Permission identifier (opaque string token)
pub type PermissionId = String;

/// Platform roles, most to least privileged.
///
/// These strings are persisted inside organization-membership records;
/// renaming one is a breaking change requiring a data migration.
pub mod role {
    pub const ADMIN: &str = "admin";
    pub const MANAGER: &str = "manager";
    pub const STAFF: &str = "staff";
    pub const MEMBER: &str = "member";
    pub const GUEST: &str = "guest";

    /// Every role the platform knows about.
    pub const ALL: [&str; 5] = [ADMIN, MANAGER, STAFF, MEMBER, GUEST];
}

/// Platform permissions, namespaced by resource area.
///
/// Like role strings, these may be persisted or transmitted in error
/// payloads and must stay stable.
pub mod permission {
    pub const ORG_VIEW: &str = "org:view";
    pub const ORG_EDIT: &str = "org:edit";
    pub const ORG_DELETE: &str = "org:delete";

    pub const MEMBER_VIEW: &str = "member:view";
    pub const MEMBER_INVITE: &str = "member:invite";
    pub const MEMBER_MANAGE: &str = "member:manage";

    pub const FACILITY_VIEW: &str = "facility:view";
    pub const FACILITY_CREATE: &str = "facility:create";
    pub const FACILITY_EDIT: &str = "facility:edit";
    pub const FACILITY_DELETE: &str = "facility:delete";

    pub const BOOKING_VIEW: &str = "booking:view";
    pub const BOOKING_CREATE: &str = "booking:create";
    pub const BOOKING_MANAGE: &str = "booking:manage";

    /// Every permission the platform knows about.
    pub const ALL: [&str; 13] = [
        ORG_VIEW,
        ORG_EDIT,
        ORG_DELETE,
        MEMBER_VIEW,
        MEMBER_INVITE,
        MEMBER_MANAGE,
        FACILITY_VIEW,
        FACILITY_CREATE,
        FACILITY_EDIT,
        FACILITY_DELETE,
        BOOKING_VIEW,
        BOOKING_CREATE,
        BOOKING_MANAGE,
    ];
}

/// Immutable role → permission-set mapping.
///
/// Lookups are total: an unknown role yields the empty set, never an
/// error. The default table encodes the platform's grant matrix; the
/// admin set dominates all others by convention (documented, not
/// asserted).
#[derive(Debug, Clone)]
pub struct Registry {
    grants: HashMap<RoleId, HashSet<PermissionId>>,
    empty: HashSet<PermissionId>,
}

impl Registry {
    /// Build a registry from an explicit grant table.
    pub fn from_grants(grants: HashMap<RoleId, HashSet<PermissionId>>) -> Self {
        Self {
            grants,
            empty: HashSet::new(),
        }
    }

    /// The permission set granted by a role.
    ///
    /// Unknown roles contribute the empty set.
    pub fn permissions_of(&self, role: &str) -> &HashSet<PermissionId> {
        self.grants.get(role).unwrap_or(&self.empty)
    }

    /// Whether the role appears in the grant table.
    pub fn is_known_role(&self, role: &str) -> bool {
        self.grants.contains_key(role)
    }
}

impl Default for Registry {
    /// The platform grant matrix.
    fn default() -> Self {
        use permission::*;

        let mut grants: HashMap<RoleId, HashSet<PermissionId>> = HashMap::new();

        let set = |perms: &[&str]| -> HashSet<PermissionId> {
            perms.iter().map(|p| p.to_string()).collect()
        };

        grants.insert(role::ADMIN.to_string(), set(&permission::ALL));
        grants.insert(
            role::MANAGER.to_string(),
            set(&[
                ORG_VIEW,
                ORG_EDIT,
                MEMBER_VIEW,
                MEMBER_INVITE,
                MEMBER_MANAGE,
                FACILITY_VIEW,
                FACILITY_CREATE,
                FACILITY_EDIT,
                FACILITY_DELETE,
                BOOKING_VIEW,
                BOOKING_CREATE,
                BOOKING_MANAGE,
            ]),
        );
        grants.insert(
            role::STAFF.to_string(),
            set(&[
                ORG_VIEW,
                MEMBER_VIEW,
                FACILITY_VIEW,
                FACILITY_EDIT,
                BOOKING_VIEW,
                BOOKING_CREATE,
                BOOKING_MANAGE,
            ]),
        );
        grants.insert(
            role::MEMBER.to_string(),
            set(&[ORG_VIEW, FACILITY_VIEW, BOOKING_VIEW, BOOKING_CREATE]),
        );
        grants.insert(role::GUEST.to_string(), set(&[ORG_VIEW, FACILITY_VIEW]));

        Self::from_grants(grants)
    }
}
