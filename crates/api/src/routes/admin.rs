//! Route definitions for the `/admin` resource (admin only).

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET    /users       -> list_users
/// PUT    /users/{id}  -> update_user (501, reserved)
/// DELETE /users/{id}  -> delete_user (501, reserved)
/// GET    /sessions    -> list_sessions
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users))
        .route(
            "/users/{id}",
            put(admin::update_user).delete(admin::delete_user),
        )
        .route("/sessions", get(admin::list_sessions))
}
