//! `consola-auth` — pure authorization boundary for the console (zero I/O).
//!
//! This crate is intentionally decoupled from HTTP, storage, and the session
//! lifecycle: it maps a resolved [`Principal`] and a declarative
//! [`Requirement`] to a [`Decision`], nothing more.

pub mod allowlist;
pub mod engine;
pub mod permissions;
pub mod principal;
pub mod requirement;
pub mod roles;

pub use allowlist::AdminGeneralAllowList;
pub use engine::{AccessDecisionEngine, AllowReason, Decision, DenyReason};
pub use permissions::Permission;
pub use principal::Principal;
pub use requirement::{Requirement, RequirementBuilder};
pub use roles::Role;
