//! `consola-client` — HTTP implementations of the console's external API
//! collaborators.
//!
//! The session core (`consola-session`) only knows the `AuthApi`/`UsersApi`
//! traits; this crate is the single place that speaks HTTP.

mod http;

pub use http::{HttpAuthApi, HttpUsersApi};
