//! HTTP handler functions, grouped by resource.

pub mod admin;
pub mod auth;
pub mod jupyter;
pub mod profile;
