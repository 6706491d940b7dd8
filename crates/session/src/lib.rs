//! `consola-session` — the client-held session: token custody, the
//! persisted snapshot, the lifecycle state machine, and the authorization
//! facade the rest of the console calls.
//!
//! The actual auth/user endpoints are external collaborators, consumed
//! through the traits in [`api`]; see `consola-client` for the HTTP
//! implementations.

pub mod api;
pub mod cache;
pub mod claims;
pub mod error;
pub mod manager;
pub mod state;
pub mod tokens;

pub use api::{ApiError, AuthApi, Credentials, UserRecord, UsersApi};
pub use cache::{PersistedSession, SessionCache};
pub use claims::{AccessClaims, TokenError, decode_claims, validate_expiry};
pub use error::SessionError;
pub use manager::SessionManager;
pub use state::SessionState;
pub use tokens::{TokenPair, TokenStore};
