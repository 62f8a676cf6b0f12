//! Route definitions for registration, login and the user's own profile.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{auth, profile};
use crate::state::AppState;

/// Routes mounted directly under `/api/v1`.
///
/// ```text
/// POST /register  -> register (public)
/// POST /login     -> login (public)
/// GET  /profile   -> get_profile (requires auth)
/// PUT  /profile   -> update_profile (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route(
            "/profile",
            get(profile::get_profile).put(profile::update_profile),
        )
}
