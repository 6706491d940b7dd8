use serde::{Deserialize, Serialize};

use crate::{Permission, Role};

/// A declarative access rule attached to a UI action or route.
///
/// Both groups empty means "no restriction" and always evaluates to Allow.
/// Duplicate entries are tolerated (the engine applies set semantics), so
/// call sites that concatenate a singular and a plural argument need no
/// dedup of their own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub permissions: Vec<Permission>,
    pub roles: Vec<Role>,
    /// `true` = every entry in a group must be satisfied (ALL);
    /// `false` = any one entry suffices (ANY). Defaults to ANY.
    pub require_all: bool,
}

impl Requirement {
    /// The empty requirement: no restriction.
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// Require a single permission.
    pub fn permission(permission: impl Into<Permission>) -> Self {
        Self {
            permissions: vec![permission.into()],
            ..Self::default()
        }
    }

    /// Require a single role.
    pub fn role(role: impl Into<Role>) -> Self {
        Self {
            roles: vec![role.into()],
            ..Self::default()
        }
    }

    /// Require any one of the given permissions.
    pub fn any_permission<P: Into<Permission>>(permissions: impl IntoIterator<Item = P>) -> Self {
        Self {
            permissions: permissions.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Require any one of the given roles.
    pub fn any_role<R: Into<Role>>(roles: impl IntoIterator<Item = R>) -> Self {
        Self {
            roles: roles.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn builder() -> RequirementBuilder {
        RequirementBuilder::default()
    }

    pub fn is_unrestricted(&self) -> bool {
        self.permissions.is_empty() && self.roles.is_empty()
    }
}

/// Builds a [`Requirement`] from the heterogeneous shapes call sites supply:
/// a singular `permission` plus a `permissions` list, and/or a singular
/// `role` plus a `roles` list.
///
/// The singular value, if present, is prepended to its corresponding list.
/// `require_all` defaults to `false` (ANY semantics) when unspecified.
#[derive(Debug, Clone, Default)]
pub struct RequirementBuilder {
    permission: Option<Permission>,
    permissions: Vec<Permission>,
    role: Option<Role>,
    roles: Vec<Role>,
    require_all: Option<bool>,
}

impl RequirementBuilder {
    pub fn permission(mut self, permission: impl Into<Permission>) -> Self {
        self.permission = Some(permission.into());
        self
    }

    pub fn permissions<P: Into<Permission>>(
        mut self,
        permissions: impl IntoIterator<Item = P>,
    ) -> Self {
        self.permissions = permissions.into_iter().map(Into::into).collect();
        self
    }

    pub fn role(mut self, role: impl Into<Role>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn roles<R: Into<Role>>(mut self, roles: impl IntoIterator<Item = R>) -> Self {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    pub fn require_all(mut self, require_all: bool) -> Self {
        self.require_all = Some(require_all);
        self
    }

    pub fn build(self) -> Requirement {
        let mut permissions = Vec::with_capacity(self.permissions.len() + 1);
        if let Some(singular) = self.permission {
            permissions.push(singular);
        }
        permissions.extend(self.permissions);

        let mut roles = Vec::with_capacity(self.roles.len() + 1);
        if let Some(singular) = self.role {
            roles.push(singular);
        }
        roles.extend(self.roles);

        Requirement {
            permissions,
            roles,
            require_all: self.require_all.unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_builder_is_unrestricted() {
        let requirement = Requirement::builder().build();
        assert!(requirement.is_unrestricted());
        assert!(!requirement.require_all);
    }

    #[test]
    fn singular_is_prepended_to_list() {
        let requirement = Requirement::builder()
            .permission("FIRST")
            .permissions(["SECOND", "THIRD"])
            .build();

        let names: Vec<&str> = requirement.permissions.iter().map(|p| p.as_str()).collect();
        assert_eq!(names, ["FIRST", "SECOND", "THIRD"]);
    }

    #[test]
    fn singular_role_is_prepended_too() {
        let requirement = Requirement::builder()
            .role("ADMIN")
            .roles(["VIEWER"])
            .require_all(true)
            .build();

        let names: Vec<&str> = requirement.roles.iter().map(|r| r.as_str()).collect();
        assert_eq!(names, ["ADMIN", "VIEWER"]);
        assert!(requirement.require_all);
    }

    #[test]
    fn require_all_defaults_to_any() {
        let requirement = Requirement::builder().permissions(["A", "B"]).build();
        assert!(!requirement.require_all);
    }

    #[test]
    fn convenience_constructors() {
        assert!(Requirement::unrestricted().is_unrestricted());
        assert_eq!(Requirement::permission("X").permissions.len(), 1);
        assert_eq!(Requirement::role("R").roles.len(), 1);
        assert_eq!(Requirement::any_permission(["A", "B"]).permissions.len(), 2);
        assert_eq!(Requirement::any_role(["A", "B"]).roles.len(), 2);
    }
}
