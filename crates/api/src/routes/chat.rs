//! Chat routes, gated on swap request status by the lifecycle service.

use axum::extract::{Path, State};
use axum::Json;
use database::{chat_message, swap_request, ActiveChat, ChatMessageWithSender};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::state::AppState;

/// Request body for posting a chat message.
#[derive(Deserialize)]
pub struct PostMessagePayload {
    pub sender_id: i64,
    pub receiver_id: i64,
    pub message: String,
}

/// Response for a posted chat message.
#[derive(Serialize)]
pub struct PostedResponse {
    pub success: bool,
    pub id: i64,
}

/// Full message history for a swap request, oldest first.
pub async fn list_messages(
    State(state): State<AppState>,
    Path(swap_request_id): Path<i64>,
) -> Result<Json<Vec<ChatMessageWithSender>>> {
    // 404 on unknown swaps instead of an indistinguishable empty history.
    swap_request::get(state.db.pool(), swap_request_id).await?;

    let messages = chat_message::list_for_swap(state.db.pool(), swap_request_id).await?;
    Ok(Json(messages))
}

/// Post a message to an accepted swap request's chat.
pub async fn post_message(
    State(state): State<AppState>,
    Path(swap_request_id): Path<i64>,
    Json(payload): Json<PostMessagePayload>,
) -> Result<Json<PostedResponse>> {
    let message = state
        .lifecycle
        .post_message(
            swap_request_id,
            payload.sender_id,
            payload.receiver_id,
            &payload.message,
        )
        .await?;

    Ok(Json(PostedResponse {
        success: true,
        id: message.id,
    }))
}

/// A user's active chat threads (accepted swaps) with unread counts.
pub async fn active_chats(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<ActiveChat>>> {
    let chats = chat_message::active_chats(state.db.pool(), user_id).await?;
    Ok(Json(chats))
}
