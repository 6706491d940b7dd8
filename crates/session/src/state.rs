//! Session lifecycle state.

use consola_auth::Principal;

/// Lifecycle of the client-held session.
///
/// The authenticated variants own the principal, so "authenticated with no
/// principal" is unrepresentable. Readers receive whole-value clones and
/// can never observe a half-replaced principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No session. `error` carries the last auth failure, if any.
    Unauthenticated { error: Option<String> },

    /// A login/registration/first hydration is in flight.
    Authenticating,

    /// A principal is resolved and current.
    Authenticated { principal: Principal },

    /// A re-fetch is in flight; readers keep seeing the pre-refresh
    /// principal until the replacement is committed.
    Refreshing { principal: Principal },
}

impl SessionState {
    /// `Unauthenticated` with no error.
    pub fn unauthenticated() -> Self {
        Self::Unauthenticated { error: None }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(
            self,
            Self::Authenticated { .. } | Self::Refreshing { .. }
        )
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Authenticating | Self::Refreshing { .. })
    }

    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Self::Authenticated { principal } | Self::Refreshing { principal } => Some(principal),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Unauthenticated { error } => error.as_deref(),
            _ => None,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::unauthenticated()
    }
}
