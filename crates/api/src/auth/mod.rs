//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- access-token and SSO handoff-token generation/validation.

pub mod jwt;
pub mod password;
