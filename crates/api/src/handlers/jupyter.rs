//! Handlers orchestrating notebook session lifecycle against JupyterHub.
//!
//! Each flow composes the hub gateway with the session registry: make the
//! hub-side calls, record the session row, and hand the browser a short-lived
//! SSO token for the hub's own token-login page.

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Html;
use axum::Json;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use hubgate_core::error::CoreError;
use hubgate_core::types::DbId;
use hubgate_db::models::session::JupyterSession;
use hubgate_db::repositories::SessionRepo;

use crate::auth::jwt::{generate_login_token, validate_login_token};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Session record lifetime. Matches the hub access-token lifetime requested
/// by the gateway.
const SESSION_TTL_HOURS: i64 = 24;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /jupyter/login`.
#[derive(Debug, Deserialize)]
pub struct AutoLoginQuery {
    pub token: Option<String>,
}

/// Response body for `POST /jupyter/start`.
#[derive(Debug, Serialize)]
pub struct StartResponse {
    pub jupyter_url: String,
    pub message: &'static str,
}

/// Response body for `GET /jupyter/status`.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<JupyterSession>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

/// Response body for `GET /jupyter/token`.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Response body for `POST /jupyter/stop`.
#[derive(Debug, Serialize)]
pub struct StopResponse {
    pub message: &'static str,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/jupyter/start
///
/// Ensure the hub-side user exists, request a server spawn (best-effort),
/// record or refresh the session row, and return the SSO login URL.
pub async fn start_session(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<StartResponse>> {
    provision_user(&state, &user.username).await?;

    let expires_at = Utc::now() + Duration::hours(SESSION_TTL_HOURS);
    SessionRepo::upsert_active(
        &state.pool,
        user.user_id,
        &new_session_token(),
        None,
        expires_at,
    )
    .await?;

    let login_url = sso_login_url(&state, user.user_id, &user.username)?;

    Ok(Json(StartResponse {
        jupyter_url: login_url,
        message: "Jupyter session started successfully. Redirecting to JupyterHub...",
    }))
}

/// GET /api/v1/jupyter/login
///
/// SSO entry point. Resolves the identity from a bearer header or a `token`
/// query parameter (either token kind), provisions the hub session, and
/// responds with an HTML page that redirects to the hub's token-login URL.
pub async fn autologin(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<AutoLoginQuery>,
) -> AppResult<Html<String>> {
    let (user_id, username) = resolve_identity(&state, &headers, query.token.as_deref())
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid or missing token".into()))
        })?;

    provision_user(&state, &username).await?;

    // Success-critical: without a hub access token the SSO handoff is useless.
    let jupyter_token = state.hub.create_user_token(&username).await?;

    let expires_at = Utc::now() + Duration::hours(SESSION_TTL_HOURS);
    SessionRepo::upsert_active(
        &state.pool,
        user_id,
        &new_session_token(),
        Some(&jupyter_token),
        expires_at,
    )
    .await?;

    let login_url = sso_login_url(&state, user_id, &username)?;
    Ok(Html(redirect_page(&login_url)))
}

/// GET /api/v1/jupyter/status
///
/// Report whether the user has an active session, and the row if so.
pub async fn get_status(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<StatusResponse>> {
    let session = SessionRepo::find_active(&state.pool, user.user_id).await?;

    let response = match session {
        Some(session) => StatusResponse {
            status: "active",
            session: Some(session),
            message: None,
        },
        None => StatusResponse {
            status: "inactive",
            session: None,
            message: Some("No active session"),
        },
    };
    Ok(Json(response))
}

/// POST /api/v1/jupyter/stop
///
/// Ask the hub to stop the user's server (best-effort) and deactivate the
/// session record. Only a failed deactivation write surfaces as an error.
pub async fn stop_session(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<StopResponse>> {
    if let Err(err) = state.hub.stop_server(&user.username).await {
        if err.is_transient() {
            tracing::warn!(username = %user.username, error = %err, "Hub stop failed, continuing");
        } else {
            return Err(err.into());
        }
    }

    SessionRepo::deactivate(&state.pool, user.user_id).await?;

    Ok(Json(StopResponse {
        message: "Session stopped successfully",
    }))
}

/// GET /api/v1/jupyter/token
///
/// Return the hub access token stored on the active session, 404 if none.
pub async fn get_token(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<TokenResponse>> {
    let token = SessionRepo::active_token(&state.pool, user.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound("No active session".into())))?;

    Ok(Json(TokenResponse { token }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Mint an opaque session token for the registry row.
fn new_session_token() -> String {
    format!("session_{}", Uuid::new_v4().simple())
}

/// Resolve the caller's identity from a bearer header or an explicit token.
///
/// Both sources accept either token kind: access tokens decode as SSO claims
/// because their claim set is a superset. A header that fails validation
/// does not shadow the query parameter; each candidate is tried in turn.
fn resolve_identity(
    state: &AppState,
    headers: &HeaderMap,
    query_token: Option<&str>,
) -> Option<(DbId, String)> {
    let header_token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    [header_token, query_token]
        .into_iter()
        .flatten()
        .find_map(|token| validate_login_token(token, &state.config.jwt).ok())
        .map(|claims| (claims.sub, claims.username))
}

/// Ensure the hub user exists, then request a server spawn.
///
/// User creation is success-critical: a session recorded for a user the hub
/// does not know about is useless, so any failure aborts. The spawn is
/// best-effort -- a hub that is briefly unreachable or failing internally
/// must not block the login flow, and only a terminal rejection (bad
/// credentials, forbidden API token) surfaces to the caller.
async fn provision_user(state: &AppState, username: &str) -> AppResult<()> {
    state.hub.ensure_user(username).await?;

    if let Err(err) = state.hub.start_server(username).await {
        if err.is_transient() {
            tracing::warn!(username, error = %err, "Hub spawn failed, continuing");
        } else {
            return Err(err.into());
        }
    }
    Ok(())
}

/// Build the hub token-login URL carrying a fresh 5-minute SSO token.
fn sso_login_url(state: &AppState, user_id: DbId, username: &str) -> AppResult<String> {
    let login_token = generate_login_token(user_id, username, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(format!(
        "{}/hub/token-login?token={login_token}&next=/hub/spawn",
        state.config.hub.public_url
    ))
}

/// Minimal self-redirecting HTML page pointing at the hub login URL.
fn redirect_page(login_url: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <meta http-equiv="refresh" content="0; url={login_url}">
    <title>Redirecting to JupyterHub...</title>
</head>
<body>
    <p>Redirecting to JupyterHub...</p>
    <p><small>If you are not redirected automatically, <a href="{login_url}">click here</a>.</small></p>
    <script>window.location.href = '{login_url}';</script>
</body>
</html>"#
    )
}
