//! Handlers for the authenticated user's own profile.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use hubgate_core::error::CoreError;
use hubgate_db::models::user::UserResponse;
use hubgate_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `PUT /profile`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub full_name: String,
}

/// Response body for a successful profile update.
#[derive(Debug, Serialize)]
pub struct UpdateProfileResponse {
    pub message: &'static str,
}

/// GET /api/v1/profile
///
/// Return the authenticated user's record (without the password hash).
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<UserResponse>> {
    let row = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound("User not found".into())))?;

    Ok(Json(UserResponse::from(&row)))
}

/// PUT /api/v1/profile
///
/// Update the authenticated user's email and display name.
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<UpdateProfileRequest>,
) -> AppResult<Json<UpdateProfileResponse>> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    UserRepo::update_profile(&state.pool, user.user_id, &input.email, &input.full_name)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound("User not found".into())))?;

    Ok(Json(UpdateProfileResponse {
        message: "Profile updated successfully",
    }))
}
