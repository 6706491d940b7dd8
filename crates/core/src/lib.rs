//! `consola-core` — shared foundation for the console session core.
//!
//! This crate contains **pure** primitives (identifiers, the error model);
//! no infrastructure concerns.

pub mod error;
pub mod id;

pub use error::{CoreError, CoreResult};
pub use id::UserId;
