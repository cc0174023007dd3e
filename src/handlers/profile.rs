use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::models::{Profile, ProfileView};
use crate::services::profile_service::{EducationInput, ExperienceInput, ProfileInput};
use crate::services::ProfileService;
use crate::AppState;

/// POST /api/profile - Create or update the caller's profile
pub async fn upsert(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<ProfileInput>,
) -> ApiResult<Profile> {
    let profile = ProfileService::new(state.store)
        .upsert(auth.user_id, input)
        .await?;
    Ok(ApiResponse::success(profile))
}

/// GET /api/profile/me - The caller's own profile
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<ProfileView> {
    let view = ProfileService::new(state.store).get_own(auth.user_id).await?;
    Ok(ApiResponse::success(view))
}

/// GET /api/profile - All profiles (public)
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<ProfileView>> {
    let views = ProfileService::new(state.store).list().await?;
    Ok(ApiResponse::success(views))
}

/// GET /api/profile/user/:user_id - Profile by user id (public)
pub async fn by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<ProfileView> {
    let view = ProfileService::new(state.store).get_by_user(&user_id).await?;
    Ok(ApiResponse::success(view))
}

/// DELETE /api/profile - Delete the caller's profile and user record
pub async fn delete_account(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Value> {
    ProfileService::new(state.store)
        .delete_account(auth.user_id)
        .await?;
    Ok(ApiResponse::success(json!({ "msg": "User deleted" })))
}

/// PUT /api/profile/experience - Add a work history entry
pub async fn add_experience(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<ExperienceInput>,
) -> ApiResult<Profile> {
    let profile = ProfileService::new(state.store)
        .add_experience(auth.user_id, input)
        .await?;
    Ok(ApiResponse::success(profile))
}

/// DELETE /api/profile/experience/:exp_id - Remove a work history entry
pub async fn remove_experience(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(exp_id): Path<String>,
) -> ApiResult<Profile> {
    let profile = ProfileService::new(state.store)
        .remove_experience(auth.user_id, &exp_id)
        .await?;
    Ok(ApiResponse::success(profile))
}

/// PUT /api/profile/education - Add an education entry
pub async fn add_education(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<EducationInput>,
) -> ApiResult<Profile> {
    let profile = ProfileService::new(state.store)
        .add_education(auth.user_id, input)
        .await?;
    Ok(ApiResponse::success(profile))
}

/// DELETE /api/profile/education/:edu_id - Remove an education entry
pub async fn remove_education(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(edu_id): Path<String>,
) -> ApiResult<Profile> {
    let profile = ProfileService::new(state.store)
        .remove_education(auth.user_id, &edu_id)
        .await?;
    Ok(ApiResponse::success(profile))
}
