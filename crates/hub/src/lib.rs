//! Thin client for the JupyterHub administrative REST API.

pub mod client;

pub use client::{HubClient, HubError};
