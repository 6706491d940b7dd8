use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::Permission;

/// The set of permissions the `ADMINISTRADOR_GENERAL` role may exercise
/// without an explicit grant.
///
/// Configured once at startup and never mutated at runtime; the engine
/// only ever reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminGeneralAllowList(HashSet<Permission>);

impl AdminGeneralAllowList {
    pub fn new<P: Into<Permission>>(permissions: impl IntoIterator<Item = P>) -> Self {
        Self(permissions.into_iter().map(Into::into).collect())
    }

    /// An empty allow-list: `ADMINISTRADOR_GENERAL` then behaves like an
    /// ordinary principal for permission checks.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn contains(&self, permission: &Permission) -> bool {
        self.0.contains(permission)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.0.iter()
    }
}

impl<P: Into<Permission>> FromIterator<P> for AdminGeneralAllowList {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership() {
        let allow_list = AdminGeneralAllowList::new(["BUSINESS_CLIENT_READ"]);
        assert!(allow_list.contains(&Permission::new("BUSINESS_CLIENT_READ")));
        assert!(!allow_list.contains(&Permission::new("AUTH_ROLE_DELETE")));
    }

    #[test]
    fn empty_contains_nothing() {
        assert!(!AdminGeneralAllowList::empty().contains(&Permission::new("ANYTHING")));
    }
}
