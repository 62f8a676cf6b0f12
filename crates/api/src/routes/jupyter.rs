//! Route definitions for the `/jupyter` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::jupyter;
use crate::state::AppState;

/// Routes mounted at `/jupyter`.
///
/// ```text
/// POST /start   -> start_session (requires auth)
/// GET  /login   -> autologin (public; token via header or query)
/// GET  /status  -> get_status (requires auth)
/// POST /stop    -> stop_session (requires auth)
/// GET  /token   -> get_token (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/start", post(jupyter::start_session))
        .route("/login", get(jupyter::autologin))
        .route("/status", get(jupyter::get_status))
        .route("/stop", post(jupyter::stop_session))
        .route("/token", get(jupyter::get_token))
}
