//! Admin statistics route.

use axum::extract::State;
use axum::Json;
use database::{chat_message, notification, swap_request, user, SwapStatus};
use serde::Serialize;

use crate::error::Result;
use crate::state::AppState;

/// Aggregate platform statistics.
#[derive(Serialize)]
pub struct Stats {
    pub user_count: i64,
    pub swap_requests: SwapRequestStats,
    pub chat_message_count: i64,
    pub unread_notification_count: i64,
}

/// Swap request counts broken down by status.
#[derive(Serialize, Default)]
pub struct SwapRequestStats {
    pub total: i64,
    pub pending: i64,
    pub accepted: i64,
    pub rejected: i64,
}

/// Get aggregate statistics as JSON.
pub async fn stats(State(state): State<AppState>) -> Result<Json<Stats>> {
    let pool = state.db.pool();

    let user_count = user::count_users(pool).await?;
    let by_status = swap_request::count_by_status(pool).await?;
    let chat_message_count = chat_message::count_messages(pool).await?;
    let unread_notification_count = notification::total_unread_count(pool).await?;

    let mut swap_requests = SwapRequestStats::default();
    for (status, count) in by_status {
        swap_requests.total += count;
        match status {
            SwapStatus::Pending => swap_requests.pending = count,
            SwapStatus::Accepted => swap_requests.accepted = count,
            SwapStatus::Rejected => swap_requests.rejected = count,
        }
    }

    Ok(Json(Stats {
        user_count,
        swap_requests,
        chat_message_count,
        unread_notification_count,
    }))
}
