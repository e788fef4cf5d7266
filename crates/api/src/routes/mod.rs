//! Route handlers for the Skillswap API.

pub mod admin;
pub mod chat;
pub mod health;
pub mod notifications;
pub mod swap_requests;
pub mod users;

use axum::routing::{get, post, put};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/", get(health::root))
        .route("/health", get(health::health))
        // Users
        .route("/api/users", get(users::list).post(users::create))
        .route("/api/users/:id", get(users::get_one).put(users::update))
        .route("/api/users/:id/skills", put(users::replace_skills))
        // Swap requests
        .route("/api/swap-requests", post(swap_requests::create))
        .route(
            "/api/swap-requests/received/:user_id",
            get(swap_requests::received),
        )
        .route("/api/swap-requests/sent/:user_id", get(swap_requests::sent))
        .route("/api/swap-requests/:id", put(swap_requests::respond))
        // Notifications (the first segment is a user id for all but `read`)
        .route("/api/notifications/:id", get(notifications::list))
        .route("/api/notifications/:id/read", put(notifications::mark_read))
        .route(
            "/api/notifications/:id/read-all",
            put(notifications::mark_all_read),
        )
        .route(
            "/api/notifications/:id/unread-count",
            get(notifications::unread_count),
        )
        // Chat
        .route("/api/chat/user/:user_id", get(chat::active_chats))
        .route(
            "/api/chat/:swap_request_id",
            get(chat::list_messages).post(chat::post_message),
        )
        // Admin
        .route("/api/admin/stats", get(admin::stats))
}
