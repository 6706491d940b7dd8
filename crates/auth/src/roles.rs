use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Name of the role that bypasses every check unconditionally.
pub const SUPERADMIN: &str = "SUPERADMIN";

/// Name of the secondary privileged role whose bypass is limited to the
/// configured allow-list.
pub const ADMINISTRADOR_GENERAL: &str = "ADMINISTRADOR_GENERAL";

/// Role identifier used for RBAC.
///
/// Roles are intentionally opaque strings at this layer; the two privileged
/// roles above are the only names the decision engine knows about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_superadmin(&self) -> bool {
        self.as_str() == SUPERADMIN
    }

    pub fn is_admin_general(&self) -> bool {
        self.as_str() == ADMINISTRADOR_GENERAL
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Role {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}
