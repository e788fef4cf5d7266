//! Swap request lifecycle service for Skillswap.
//!
//! This crate provides the [`SwapLifecycle`] type which orchestrates the one
//! stateful part of the platform: the `pending → {accepted, rejected}` state
//! machine of a swap request, the notifications derived from its
//! transitions, and the chat gate that opens on acceptance.
//!
//! ```text
//!              send_request                respond(Accept)
//!   (client) ───────────────▶ pending ─────────────────────▶ accepted ─▶ chat unlocked
//!                                │
//!                                │ respond(Reject)
//!                                ▼
//!                             rejected
//! ```
//!
//! Both terminal states are final; the transition is taken exactly once.
//!
//! Notifications are best-effort side effects: they are written after the
//! response-defining store write, outside any transaction, and a failed
//! append is logged and swallowed rather than surfaced to the caller. A
//! crash between the two writes leaves a durable state change with a
//! missing notification, which is acceptable for UX hints.
//!
//! # Example
//!
//! ```no_run
//! use database::{Database, NewSwapRequest};
//! use lifecycle::{Decision, SwapLifecycle};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("sqlite:skillswap.db?mode=rwc").await?;
//!     db.migrate().await?;
//!     let lifecycle = SwapLifecycle::new(db);
//!
//!     let request = lifecycle
//!         .send_request(NewSwapRequest {
//!             from_user_id: 1,
//!             to_user_id: 2,
//!             offered_skill: "JavaScript".to_string(),
//!             wanted_skill: "Figma".to_string(),
//!             message: None,
//!         })
//!         .await?;
//!
//!     lifecycle.respond(request.id, Decision::Accept).await?;
//!     lifecycle.post_message(request.id, 2, 1, "thanks, when?").await?;
//!     Ok(())
//! }
//! ```

mod error;

pub use error::{LifecycleError, Result};

use database::{
    chat_message, notification, swap_request, user, validation, ChatMessage, Database,
    NewChatMessage, NewSwapRequest, NotificationKind, SwapRequest, SwapStatus, ValidationError,
};
use serde::Deserialize;
use tracing::warn;

/// The answer a recipient gives to a pending swap request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Accept,
    Reject,
}

impl Decision {
    /// The terminal status this decision resolves to.
    pub fn status(&self) -> SwapStatus {
        match self {
            Decision::Accept => SwapStatus::Accepted,
            Decision::Reject => SwapStatus::Rejected,
        }
    }
}

/// Orchestrates swap request creation, acceptance/rejection, and the
/// derived notification and chat-unlock effects.
///
/// Holds an explicitly injected [`Database`] handle; there is no
/// process-global storage state.
#[derive(Clone)]
pub struct SwapLifecycle {
    db: Database,
}

impl SwapLifecycle {
    /// Create a lifecycle service over the given database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Get a reference to the underlying database.
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Create a new swap request and notify the recipient.
    ///
    /// Both participants must exist, both skill fields must be non-empty,
    /// and a user cannot send a request to themselves. The created request
    /// is always `pending`.
    pub async fn send_request(&self, new: NewSwapRequest) -> Result<SwapRequest> {
        validation::validate_skill("offered_skill", &new.offered_skill)?;
        validation::validate_skill("wanted_skill", &new.wanted_skill)?;
        if let Some(message) = &new.message {
            validation::validate_message_body(message)?;
        }
        if new.from_user_id == new.to_user_id {
            return Err(ValidationError::SelfSwap.into());
        }

        let pool = self.db.pool();
        let sender = user::get_user(pool, new.from_user_id).await?;
        let recipient = user::get_user(pool, new.to_user_id).await?;

        let request = swap_request::create(pool, &new).await?;
        tracing::info!(
            request_id = request.id,
            from_user_id = request.from_user_id,
            to_user_id = request.to_user_id,
            "Swap request created"
        );

        // Best-effort: the request is already committed, a notification
        // failure must not fail it.
        if let Err(err) = notification::append(
            pool,
            recipient.id,
            NotificationKind::SwapRequest,
            "New Swap Request",
            &format!("You have a new swap request from {}", sender.name),
            Some(request.id),
        )
        .await
        {
            warn!(request_id = request.id, error = %err, "Failed to write swap_request notification");
        }

        Ok(request)
    }

    /// Answer a pending swap request and notify the original sender.
    ///
    /// The pending → terminal transition happens exactly once: a second
    /// call, or the loser of two concurrent calls, gets
    /// [`LifecycleError::InvalidState`].
    pub async fn respond(&self, id: i64, decision: Decision) -> Result<SwapRequest> {
        let pool = self.db.pool();

        let won = swap_request::set_status_if_pending(pool, id, decision.status()).await?;
        if !won {
            // Either the id is unknown or the request is already terminal.
            let existing = swap_request::get(pool, id).await?;
            return Err(LifecycleError::InvalidState {
                id,
                status: existing.status,
            });
        }

        let request = swap_request::get(pool, id).await?;
        tracing::info!(
            request_id = request.id,
            status = %request.status,
            "Swap request answered"
        );

        let (title, body) = match decision {
            Decision::Accept => (
                "Swap Request Accepted",
                "Your swap request has been accepted!",
            ),
            Decision::Reject => (
                "Swap Request Rejected",
                "Your swap request has been rejected.",
            ),
        };
        if let Err(err) = notification::append(
            pool,
            request.from_user_id,
            NotificationKind::SwapResponse,
            title,
            body,
            Some(request.id),
        )
        .await
        {
            warn!(request_id = request.id, error = %err, "Failed to write swap_response notification");
        }

        Ok(request)
    }

    /// Append a chat message to an accepted swap request and notify the
    /// receiver.
    ///
    /// The chat gate: the swap request must exist and be `accepted`.
    /// Accepted status alone unlocks chat, there is no separate activation
    /// step.
    pub async fn post_message(
        &self,
        swap_request_id: i64,
        sender_id: i64,
        receiver_id: i64,
        body: &str,
    ) -> Result<ChatMessage> {
        validation::validate_message_body(body)?;

        let pool = self.db.pool();
        let request = swap_request::get(pool, swap_request_id).await?;
        if request.status != SwapStatus::Accepted {
            return Err(LifecycleError::ChatUnavailable {
                id: swap_request_id,
                status: request.status,
            });
        }

        let sender = user::get_user(pool, sender_id).await?;
        user::get_user(pool, receiver_id).await?;

        let message = chat_message::append(
            pool,
            &NewChatMessage {
                swap_request_id,
                sender_id,
                receiver_id,
                body: body.trim().to_string(),
            },
        )
        .await?;

        if let Err(err) = notification::append(
            pool,
            receiver_id,
            NotificationKind::ChatMessage,
            "New Message",
            &format!("You have a new message from {}", sender.name),
            Some(message.id),
        )
        .await
        {
            warn!(message_id = message.id, error = %err, "Failed to write chat_message notification");
        }

        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::User;

    async fn test_lifecycle() -> SwapLifecycle {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        SwapLifecycle::new(db)
    }

    async fn seed_users(lifecycle: &SwapLifecycle) -> (User, User) {
        let pool = lifecycle.db().pool();
        let alice = user::create_user(pool, "Alice Brown", "alice@example.com")
            .await
            .unwrap();
        let bob = user::create_user(pool, "Bob Johnson", "bob@example.com")
            .await
            .unwrap();
        (alice, bob)
    }

    fn new_request(from: &User, to: &User) -> NewSwapRequest {
        NewSwapRequest {
            from_user_id: from.id,
            to_user_id: to.id,
            offered_skill: "JavaScript".to_string(),
            wanted_skill: "Figma".to_string(),
            message: Some("Let's trade".to_string()),
        }
    }

    #[tokio::test]
    async fn test_send_request_creates_pending_and_notifies_recipient() {
        let lifecycle = test_lifecycle().await;
        let (alice, bob) = seed_users(&lifecycle).await;
        let pool = lifecycle.db().pool();

        let request = lifecycle.send_request(new_request(&alice, &bob)).await.unwrap();
        assert_eq!(request.status, SwapStatus::Pending);

        let notifications = notification::list_for(pool, bob.id, 50).await.unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].kind, NotificationKind::SwapRequest);
        assert_eq!(notifications[0].title, "New Swap Request");
        assert_eq!(
            notifications[0].body,
            "You have a new swap request from Alice Brown"
        );
        assert_eq!(notifications[0].related_id, Some(request.id));
        assert_eq!(notification::unread_count(pool, bob.id).await.unwrap(), 1);

        // The sender gets nothing.
        assert!(notification::list_for(pool, alice.id, 50)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_send_request_validation() {
        let lifecycle = test_lifecycle().await;
        let (alice, bob) = seed_users(&lifecycle).await;

        let mut missing_skill = new_request(&alice, &bob);
        missing_skill.offered_skill = "  ".to_string();
        assert!(matches!(
            lifecycle.send_request(missing_skill).await,
            Err(LifecycleError::Validation(_))
        ));

        let self_swap = new_request(&alice, &alice);
        assert!(matches!(
            lifecycle.send_request(self_swap).await,
            Err(LifecycleError::Validation(ValidationError::SelfSwap))
        ));

        let mut unknown_recipient = new_request(&alice, &bob);
        unknown_recipient.to_user_id = 404;
        assert!(matches!(
            lifecycle.send_request(unknown_recipient).await,
            Err(LifecycleError::NotFound { entity: "User", .. })
        ));
    }

    #[tokio::test]
    async fn test_accept_unlocks_chat_and_notifies_sender() {
        let lifecycle = test_lifecycle().await;
        let (alice, bob) = seed_users(&lifecycle).await;
        let pool = lifecycle.db().pool();

        let request = lifecycle.send_request(new_request(&alice, &bob)).await.unwrap();
        let answered = lifecycle.respond(request.id, Decision::Accept).await.unwrap();
        assert_eq!(answered.status, SwapStatus::Accepted);

        let notifications = notification::list_for(pool, alice.id, 50).await.unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].kind, NotificationKind::SwapResponse);
        assert_eq!(notifications[0].title, "Swap Request Accepted");

        // Chat is now open in both directions.
        lifecycle
            .post_message(request.id, bob.id, alice.id, "hey!")
            .await
            .unwrap();
        lifecycle
            .post_message(request.id, alice.id, bob.id, "hello")
            .await
            .unwrap();
        let history = chat_message::list_for_swap(pool, request.id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].body, "hey!");
        assert_eq!(history[1].body, "hello");
    }

    #[tokio::test]
    async fn test_second_respond_is_invalid_state() {
        let lifecycle = test_lifecycle().await;
        let (alice, bob) = seed_users(&lifecycle).await;

        let request = lifecycle.send_request(new_request(&alice, &bob)).await.unwrap();
        lifecycle.respond(request.id, Decision::Accept).await.unwrap();

        let again = lifecycle.respond(request.id, Decision::Reject).await;
        assert!(matches!(
            again,
            Err(LifecycleError::InvalidState {
                status: SwapStatus::Accepted,
                ..
            })
        ));

        // Only one swap_response notification was ever written.
        let pool = lifecycle.db().pool();
        let notifications = notification::list_for(pool, alice.id, 50).await.unwrap();
        assert_eq!(notifications.len(), 1);
    }

    #[tokio::test]
    async fn test_respond_unknown_id() {
        let lifecycle = test_lifecycle().await;
        seed_users(&lifecycle).await;

        assert!(matches!(
            lifecycle.respond(404, Decision::Accept).await,
            Err(LifecycleError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_chat_gated_on_pending_request() {
        let lifecycle = test_lifecycle().await;
        let (alice, bob) = seed_users(&lifecycle).await;
        let pool = lifecycle.db().pool();

        let request = lifecycle.send_request(new_request(&alice, &bob)).await.unwrap();
        let result = lifecycle
            .post_message(request.id, bob.id, alice.id, "too early")
            .await;
        assert!(matches!(
            result,
            Err(LifecycleError::ChatUnavailable {
                status: SwapStatus::Pending,
                ..
            })
        ));

        // Nothing was written to the log.
        assert!(chat_message::list_for_swap(pool, request.id)
            .await
            .unwrap()
            .is_empty());
        assert_eq!(chat_message::count_messages(pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_rejected_request_stays_closed() {
        let lifecycle = test_lifecycle().await;
        let (alice, bob) = seed_users(&lifecycle).await;

        let request = lifecycle.send_request(new_request(&alice, &bob)).await.unwrap();
        let answered = lifecycle.respond(request.id, Decision::Reject).await.unwrap();
        assert_eq!(answered.status, SwapStatus::Rejected);

        // No reopening, no chat.
        assert!(matches!(
            lifecycle.respond(request.id, Decision::Accept).await,
            Err(LifecycleError::InvalidState { .. })
        ));
        assert!(matches!(
            lifecycle
                .post_message(request.id, bob.id, alice.id, "anyone?")
                .await,
            Err(LifecycleError::ChatUnavailable {
                status: SwapStatus::Rejected,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_post_message_unknown_swap() {
        let lifecycle = test_lifecycle().await;
        let (alice, bob) = seed_users(&lifecycle).await;

        assert!(matches!(
            lifecycle.post_message(404, alice.id, bob.id, "hello?").await,
            Err(LifecycleError::NotFound {
                entity: "SwapRequest",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_post_message_notifies_receiver() {
        let lifecycle = test_lifecycle().await;
        let (alice, bob) = seed_users(&lifecycle).await;
        let pool = lifecycle.db().pool();

        let request = lifecycle.send_request(new_request(&alice, &bob)).await.unwrap();
        lifecycle.respond(request.id, Decision::Accept).await.unwrap();

        let message = lifecycle
            .post_message(request.id, alice.id, bob.id, "when works for you?")
            .await
            .unwrap();

        let notifications = notification::list_for(pool, bob.id, 50).await.unwrap();
        // Newest first: chat_message on top, then the original swap_request.
        assert_eq!(notifications.len(), 2);
        assert_eq!(notifications[0].kind, NotificationKind::ChatMessage);
        assert_eq!(
            notifications[0].body,
            "You have a new message from Alice Brown"
        );
        assert_eq!(notifications[0].related_id, Some(message.id));

        // The derived unread chat count sees it too.
        let chats = chat_message::active_chats(pool, bob.id).await.unwrap();
        assert_eq!(chats.len(), 1);
        assert_eq!(chats[0].unread_count, 1);
    }
}
