//! User routes: signup, basic info, and skill sets.

use axum::extract::{Path, State};
use axum::Json;
use database::{user, validation, User, UserWithSkills};
use serde::Deserialize;
use tracing::info;

use crate::error::Result;
use crate::state::AppState;

/// Request body for creating or updating a user.
#[derive(Deserialize)]
pub struct UserPayload {
    pub name: String,
    pub email: String,
}

/// Request body for replacing a user's skill sets.
#[derive(Deserialize)]
pub struct SkillsPayload {
    #[serde(default)]
    pub offered: Vec<String>,
    #[serde(default)]
    pub wanted: Vec<String>,
}

/// Create a user.
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<UserPayload>,
) -> Result<Json<User>> {
    validation::validate_display_name(&payload.name)?;
    validation::validate_email(&payload.email)?;

    let user = user::create_user(state.db.pool(), payload.name.trim(), payload.email.trim()).await?;
    info!(user_id = user.id, "User created");
    Ok(Json(user))
}

/// List all users.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    let users = user::list_users(state.db.pool()).await?;
    Ok(Json(users))
}

/// Get a user together with their skill sets.
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserWithSkills>> {
    let user = user::get_user_with_skills(state.db.pool(), id).await?;
    Ok(Json(user))
}

/// Update a user's basic info.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UserPayload>,
) -> Result<Json<serde_json::Value>> {
    validation::validate_display_name(&payload.name)?;
    validation::validate_email(&payload.email)?;

    user::update_user(state.db.pool(), id, payload.name.trim(), payload.email.trim()).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// Replace a user's offered and wanted skill sets.
pub async fn replace_skills(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<SkillsPayload>,
) -> Result<Json<serde_json::Value>> {
    for skill in payload.offered.iter() {
        validation::validate_skill("offered", skill)?;
    }
    for skill in payload.wanted.iter() {
        validation::validate_skill("wanted", skill)?;
    }

    user::replace_skills(state.db.pool(), id, &payload.offered, &payload.wanted).await?;
    info!(user_id = id, "User skills replaced");
    Ok(Json(serde_json::json!({ "success": true })))
}
