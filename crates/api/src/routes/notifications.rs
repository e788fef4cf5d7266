//! Notification routes.

use axum::extract::{Path, State};
use axum::Json;
use database::{notification, Notification};
use serde::Serialize;

use crate::error::Result;
use crate::state::AppState;

/// How many notifications a single listing returns at most.
const LIST_LIMIT: i64 = 50;

#[derive(Serialize)]
pub struct UnreadCount {
    pub count: i64,
}

/// List a user's notifications, newest first.
pub async fn list(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<Notification>>> {
    let notifications = notification::list_for(state.db.pool(), user_id, LIST_LIMIT).await?;
    Ok(Json(notifications))
}

/// Mark a single notification as read.
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    notification::mark_read(state.db.pool(), id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// Mark all of a user's notifications as read.
pub async fn mark_all_read(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    notification::mark_all_read(state.db.pool(), user_id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// Count a user's unread notifications.
pub async fn unread_count(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<UnreadCount>> {
    let count = notification::unread_count(state.db.pool(), user_id).await?;
    Ok(Json(UnreadCount { count }))
}
