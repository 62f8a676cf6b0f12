pub mod account;
pub mod admin;
pub mod health;
pub mod jupyter;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /health                 service + database health (also at root)
///
/// /register               create account (public)
/// /login                  password login, returns bearer token (public)
/// /profile                get, update own profile (requires auth)
///
/// /jupyter/start          provision hub session (requires auth)
/// /jupyter/login          SSO autologin page (public; token in query)
/// /jupyter/status         active session status (requires auth)
/// /jupyter/stop           stop hub session (requires auth)
/// /jupyter/token          hub access token for active session (requires auth)
///
/// /admin/users            list accounts (admin only)
/// /admin/users/{id}       update, delete (reserved, 501)
/// /admin/sessions         list session records (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(account::router())
        .nest("/jupyter", jupyter::router())
        .nest("/admin", admin::router())
}
