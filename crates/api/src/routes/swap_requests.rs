//! Swap request routes.

use axum::extract::{Path, State};
use axum::Json;
use database::{swap_request, NewSwapRequest, SwapRequestWithPeer};
use lifecycle::Decision;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Response for a created swap request.
#[derive(Serialize)]
pub struct CreatedResponse {
    pub success: bool,
    pub id: i64,
    pub status: database::SwapStatus,
}

/// Request body for answering a swap request.
#[derive(Deserialize)]
pub struct RespondPayload {
    pub status: String,
}

/// Create a swap request.
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<NewSwapRequest>,
) -> Result<Json<CreatedResponse>> {
    let request = state.lifecycle.send_request(payload).await?;
    Ok(Json(CreatedResponse {
        success: true,
        id: request.id,
        status: request.status,
    }))
}

/// List requests received by a user, joined with sender identity.
pub async fn received(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<SwapRequestWithPeer>>> {
    let requests = swap_request::list_received(state.db.pool(), user_id).await?;
    Ok(Json(requests))
}

/// List requests sent by a user, joined with recipient identity.
pub async fn sent(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<SwapRequestWithPeer>>> {
    let requests = swap_request::list_sent(state.db.pool(), user_id).await?;
    Ok(Json(requests))
}

/// Accept or reject a pending swap request.
pub async fn respond(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<RespondPayload>,
) -> Result<Json<serde_json::Value>> {
    let decision = match payload.status.as_str() {
        "accepted" => Decision::Accept,
        "rejected" => Decision::Reject,
        _ => {
            return Err(ApiError::BadRequest(
                "Invalid status. Must be \"accepted\" or \"rejected\"".to_string(),
            ))
        }
    };

    let request = state.lifecycle.respond(id, decision).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": format!("Swap request {}", request.status)
    })))
}
