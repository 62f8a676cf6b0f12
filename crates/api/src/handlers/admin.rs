//! Admin-only handlers. All of these sit behind [`RequireAdmin`].
//!
//! [`RequireAdmin`]: crate::middleware::rbac::RequireAdmin

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use hubgate_core::types::DbId;
use hubgate_db::models::session::JupyterSession;
use hubgate_db::models::user::UserResponse;
use hubgate_db::repositories::{SessionRepo, UserRepo};

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// A session row annotated with its owner's username.
#[derive(Debug, Serialize)]
pub struct AdminSessionEntry {
    #[serde(flatten)]
    pub session: JupyterSession,
    pub username: String,
}

/// GET /api/v1/admin/users
///
/// List every account, newest first.
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// GET /api/v1/admin/sessions
///
/// List every session record with the owning username, newest first.
pub async fn list_sessions(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> AppResult<Json<Vec<AdminSessionEntry>>> {
    let rows = SessionRepo::list_with_usernames(&state.pool).await?;
    let entries = rows
        .into_iter()
        .map(|row| {
            let (session, username) = row.into_parts();
            AdminSessionEntry { session, username }
        })
        .collect();
    Ok(Json(entries))
}

/// PUT /api/v1/admin/users/{id}
///
/// Not implemented yet.
pub async fn update_user(
    RequireAdmin(_): RequireAdmin,
    Path(_id): Path<DbId>,
) -> StatusCode {
    StatusCode::NOT_IMPLEMENTED
}

/// DELETE /api/v1/admin/users/{id}
///
/// Not implemented yet.
pub async fn delete_user(
    RequireAdmin(_): RequireAdmin,
    Path(_id): Path<DbId>,
) -> StatusCode {
    StatusCode::NOT_IMPLEMENTED
}
