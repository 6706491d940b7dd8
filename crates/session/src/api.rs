//! External API boundary: DTOs and the collaborator traits.
//!
//! The endpoints behind these traits (and everything they do server-side)
//! are out of scope for this core; the traits exist so the session manager
//! can be exercised against in-memory fakes and wired to HTTP in
//! `consola-client`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use consola_core::UserId;

use crate::tokens::TokenPair;

/// Login/registration input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// The current-user record as the users endpoint returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Errors at the HTTP boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("API error ({0}): {1}")]
    Api(u16, String),

    /// The server answered but rejected the request; the message is meant
    /// for the user.
    #[error("{0}")]
    Rejected(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Authentication endpoints (external collaborator).
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<TokenPair, ApiError>;

    async fn register(&self, credentials: &Credentials) -> Result<TokenPair, ApiError>;

    /// Best-effort server-side session invalidation.
    async fn logout(&self, access_token: &str) -> Result<(), ApiError>;
}

/// Current-user endpoints (external collaborator).
#[async_trait]
pub trait UsersApi: Send + Sync {
    async fn current_user(&self, access_token: &str) -> Result<UserRecord, ApiError>;

    async fn current_user_permissions(&self, access_token: &str) -> Result<Vec<String>, ApiError>;
}
