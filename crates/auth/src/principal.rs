use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use consola_core::UserId;

use crate::{Permission, Role};

/// A fully resolved principal for authorization decisions.
///
/// Roles and permissions are unique and unordered. A principal is assembled
/// once from the user and permission fetches and then treated as an
/// immutable snapshot: refreshes replace the whole value, they never patch
/// fields in place, so concurrent readers can never observe roles from one
/// fetch combined with permissions from another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: UserId,
    pub roles: HashSet<Role>,
    pub permissions: HashSet<Permission>,
}

impl Principal {
    pub fn new(
        user_id: UserId,
        roles: impl IntoIterator<Item = Role>,
        permissions: impl IntoIterator<Item = Permission>,
    ) -> Self {
        Self {
            user_id,
            roles: roles.into_iter().collect(),
            permissions: permissions.into_iter().collect(),
        }
    }

    /// The unauthenticated principal: no roles, no permissions.
    ///
    /// Evaluating against it denies every restricted requirement while the
    /// unrestricted requirement still allows.
    pub fn anonymous() -> Self {
        Self {
            user_id: UserId::nil(),
            roles: HashSet::new(),
            permissions: HashSet::new(),
        }
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }

    pub fn has_permission(&self, permission: &Permission) -> bool {
        self.permissions.contains(permission)
    }

    pub fn is_superadmin(&self) -> bool {
        self.roles.iter().any(Role::is_superadmin)
    }

    pub fn is_admin_general(&self) -> bool {
        self.roles.iter().any(Role::is_admin_general)
    }
}
