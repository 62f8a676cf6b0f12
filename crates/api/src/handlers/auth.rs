//! Handlers for account registration and login.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use hubgate_core::error::CoreError;
use hubgate_core::types::DbId;
use hubgate_db::models::user::{CreateUser, UserResponse};
use hubgate_db::repositories::UserRepo;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 64))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
    #[serde(default)]
    pub full_name: String,
}

/// Request body for `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response body for a successful registration.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub user_id: DbId,
}

/// Response body for a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/register
///
/// Create an account. The plaintext password is hashed before storage and is
/// never persisted. Returns 409 if the username or email is already taken.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let hashed = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let create_dto = CreateUser {
        username: input.username,
        email: input.email,
        password_hash: hashed,
        full_name: input.full_name,
    };

    // Duplicate username/email violates a uq_* constraint -> classified 409.
    let user = UserRepo::create(&state.pool, &create_dto).await?;
    tracing::info!(user_id = user.id, username = %user.username, "Registered new user");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User created successfully",
            user_id: user.id,
        }),
    ))
}

/// POST /api/v1/login
///
/// Authenticate with username + password. Returns a 24-hour bearer token and
/// the user record. Disabled accounts are rejected with 403 even when the
/// credentials are correct.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let user = UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Invalid credentials".into())))?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "User account is disabled".into(),
        )));
    }

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid credentials".into(),
        )));
    }

    let token = generate_access_token(
        user.id,
        &user.username,
        &user.email,
        user.is_admin,
        &state.config.jwt,
    )
    .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(Json(LoginResponse {
        token,
        user: UserResponse::from(&user),
    }))
}
