//! Session error taxonomy.

use thiserror::Error;

/// Recoverable failures at the session boundary.
///
/// Every variant is translated into observable state (`error`,
/// `Unauthenticated`) before it is returned, so nothing here can escape to
/// crash a render path. The worst outcome is a forced logout.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Bad credentials or server rejection; the message is user-visible.
    #[error("authentication failed: {0}")]
    AuthFailure(String),

    /// Expired or undecodable token. An expected lifecycle event: it is
    /// resolved by forcing `Unauthenticated` without recording any
    /// user-visible error.
    #[error("session is stale")]
    SessionStale,

    /// Network or server failure while fetching the profile or the
    /// permission set. No partial principal is ever committed.
    #[error("failed to resolve principal: {0}")]
    FetchFailure(String),
}
