//! Shared domain types and the error taxonomy used across hubgate crates.

pub mod error;
pub mod types;
