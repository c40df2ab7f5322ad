//! services/api/src/security/mod.rs
//!
//! Credential handling: one-way password hashing and stateless bearer tokens.

pub mod password;
pub mod token;

pub use password::{hash_password, verify_dummy, verify_password, HashError};
pub use token::{TokenError, TokenService};
