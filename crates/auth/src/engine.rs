use serde::Serialize;

use crate::{AdminGeneralAllowList, Permission, Principal, Requirement, Role};

/// Why a requirement was allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowReason {
    /// The principal holds `SUPERADMIN`; the requirement was not consulted.
    Superadmin,
    /// The requirement carries no restriction at all.
    Unrestricted,
    /// Both groups of the requirement were satisfied.
    Satisfied,
}

/// Why a requirement was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// The permission group was not satisfied.
    MissingPermissions,
    /// The role group was not satisfied.
    MissingRoles,
}

/// Outcome of evaluating a [`Requirement`] against a [`Principal`].
///
/// The reason codes are diagnostics; call sites branch on
/// [`Decision::is_allowed`] only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "decision", content = "reason")]
pub enum Decision {
    Allowed(AllowReason),
    Denied(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed(_))
    }
}

/// Maps (principal, requirement) pairs to decisions.
///
/// Owns the process-wide allow-list for the partial-bypass role; everything
/// else is stateless.
///
/// - No IO
/// - No panics
/// - Referentially transparent for a given (principal, requirement) pair,
///   so any number of readers may call it concurrently
#[derive(Debug, Clone, Default)]
pub struct AccessDecisionEngine {
    allow_list: AdminGeneralAllowList,
}

impl AccessDecisionEngine {
    pub fn new(allow_list: AdminGeneralAllowList) -> Self {
        Self { allow_list }
    }

    pub fn allow_list(&self) -> &AdminGeneralAllowList {
        &self.allow_list
    }

    /// Evaluate a requirement. The first matching branch decides:
    ///
    /// 1. `SUPERADMIN` principals are allowed unconditionally.
    /// 2. `ADMINISTRADOR_GENERAL` principals satisfy a permission through
    ///    the allow-list or an explicit grant, and satisfy the
    ///    `ADMINISTRADOR_GENERAL` role requirement implicitly.
    /// 3. Everyone else gets plain membership checks.
    ///
    /// Within a group, `require_all` selects ALL vs ANY; an empty group is
    /// vacuously satisfied; the two groups are combined with AND.
    pub fn evaluate(&self, principal: &Principal, requirement: &Requirement) -> Decision {
        if principal.is_superadmin() {
            return Decision::Allowed(AllowReason::Superadmin);
        }

        if requirement.is_unrestricted() {
            return Decision::Allowed(AllowReason::Unrestricted);
        }

        let admin_general = principal.is_admin_general();

        let permissions_ok = group_satisfied(
            &requirement.permissions,
            requirement.require_all,
            |permission| {
                principal.has_permission(permission)
                    || (admin_general && self.allow_list.contains(permission))
            },
        );
        if !permissions_ok {
            return Decision::Denied(DenyReason::MissingPermissions);
        }

        let roles_ok = group_satisfied(&requirement.roles, requirement.require_all, |role| {
            principal.has_role(role) || (admin_general && role.is_admin_general())
        });
        if !roles_ok {
            return Decision::Denied(DenyReason::MissingRoles);
        }

        Decision::Allowed(AllowReason::Satisfied)
    }

    /// Shorthand for `evaluate(..).is_allowed()`.
    pub fn is_allowed(&self, principal: &Principal, requirement: &Requirement) -> bool {
        self.evaluate(principal, requirement).is_allowed()
    }

    pub fn has_permission(&self, principal: &Principal, permission: impl Into<Permission>) -> bool {
        self.is_allowed(principal, &Requirement::permission(permission))
    }

    pub fn has_role(&self, principal: &Principal, role: impl Into<Role>) -> bool {
        self.is_allowed(principal, &Requirement::role(role))
    }

    pub fn has_any_permission<P: Into<Permission>>(
        &self,
        principal: &Principal,
        permissions: impl IntoIterator<Item = P>,
    ) -> bool {
        self.is_allowed(principal, &Requirement::any_permission(permissions))
    }

    pub fn has_any_role<R: Into<Role>>(
        &self,
        principal: &Principal,
        roles: impl IntoIterator<Item = R>,
    ) -> bool {
        self.is_allowed(principal, &Requirement::any_role(roles))
    }
}

/// ALL/ANY combinator over one requirement group. Empty groups are
/// vacuously satisfied. Duplicates cannot change the result: `all` and
/// `any` over a predicate are insensitive to repetition.
fn group_satisfied<T>(items: &[T], require_all: bool, satisfied: impl Fn(&T) -> bool) -> bool {
    if items.is_empty() {
        return true;
    }
    if require_all {
        items.iter().all(satisfied)
    } else {
        items.iter().any(satisfied)
    }
}
