//! Chat message log for accepted swap requests.
//!
//! The status precondition itself (only accepted swaps may be written to)
//! is enforced by the lifecycle service; this module is plain storage.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{ActiveChat, ChatMessage, ChatMessageWithSender, NewChatMessage};

/// Append a chat message.
pub async fn append(pool: &SqlitePool, new: &NewChatMessage) -> Result<ChatMessage> {
    let result = sqlx::query(
        r#"
        INSERT INTO chat_messages (swap_request_id, sender_id, receiver_id, body)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(new.swap_request_id)
    .bind(new.sender_id)
    .bind(new.receiver_id)
    .bind(&new.body)
    .execute(pool)
    .await?;

    get(pool, result.last_insert_rowid()).await
}

/// Get a message by ID.
pub async fn get(pool: &SqlitePool, id: i64) -> Result<ChatMessage> {
    sqlx::query_as::<_, ChatMessage>(
        r#"
        SELECT id, swap_request_id, sender_id, receiver_id, body, created_at
        FROM chat_messages
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "ChatMessage",
        id: id.to_string(),
    })
}

/// Full message history for a swap request, oldest first, joined with
/// sender display names. Not paginated.
pub async fn list_for_swap(
    pool: &SqlitePool,
    swap_request_id: i64,
) -> Result<Vec<ChatMessageWithSender>> {
    let messages = sqlx::query_as::<_, ChatMessageWithSender>(
        r#"
        SELECT cm.id, cm.swap_request_id, cm.sender_id, cm.receiver_id,
               cm.body, cm.created_at, u.name AS sender_name
        FROM chat_messages cm
        JOIN users u ON cm.sender_id = u.id
        WHERE cm.swap_request_id = ?
        ORDER BY cm.created_at ASC, cm.id ASC
        "#,
    )
    .bind(swap_request_id)
    .fetch_all(pool)
    .await?;

    Ok(messages)
}

/// Accepted swap requests involving a user, viewed as chat threads.
///
/// The unread count per thread is derived: messages addressed to the user
/// whose `chat_message` notification has not been marked read.
pub async fn active_chats(pool: &SqlitePool, user_id: i64) -> Result<Vec<ActiveChat>> {
    let chats = sqlx::query_as::<_, ActiveChat>(
        r#"
        SELECT
            sr.id AS swap_request_id,
            sr.offered_skill,
            sr.wanted_skill,
            sr.created_at AS request_date,
            u.id AS other_user_id,
            u.name AS other_user_name,
            (
                SELECT COUNT(*)
                FROM chat_messages cm
                WHERE cm.swap_request_id = sr.id
                  AND cm.receiver_id = ?
                  AND cm.id NOT IN (
                      SELECT n.related_id
                      FROM notifications n
                      WHERE n.user_id = ?
                        AND n.kind = 'chat_message'
                        AND n.is_read = 1
                        AND n.related_id IS NOT NULL
                  )
            ) AS unread_count
        FROM swap_requests sr
        JOIN users u
          ON u.id = CASE WHEN sr.from_user_id = ? THEN sr.to_user_id ELSE sr.from_user_id END
        WHERE sr.status = 'accepted'
          AND (sr.from_user_id = ? OR sr.to_user_id = ?)
        ORDER BY sr.updated_at DESC, sr.id DESC
        "#,
    )
    .bind(user_id)
    .bind(user_id)
    .bind(user_id)
    .bind(user_id)
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(chats)
}

/// Count all stored chat messages.
pub async fn count_messages(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM chat_messages
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewSwapRequest, NotificationKind, SwapStatus};
    use crate::user::create_user;
    use crate::{notification, swap_request, Database};

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    async fn accepted_swap(db: &Database) -> (i64, i64, i64) {
        let alice = create_user(db.pool(), "Alice Brown", "alice@example.com")
            .await
            .unwrap();
        let bob = create_user(db.pool(), "Bob Johnson", "bob@example.com")
            .await
            .unwrap();
        let request = swap_request::create(
            db.pool(),
            &NewSwapRequest {
                from_user_id: alice.id,
                to_user_id: bob.id,
                offered_skill: "JavaScript".to_string(),
                wanted_skill: "Figma".to_string(),
                message: None,
            },
        )
        .await
        .unwrap();
        swap_request::set_status_if_pending(db.pool(), request.id, SwapStatus::Accepted)
            .await
            .unwrap();
        (request.id, alice.id, bob.id)
    }

    #[tokio::test]
    async fn test_history_preserves_order() {
        let db = test_db().await;
        let (swap_id, alice, bob) = accepted_swap(&db).await;

        for i in 0..4 {
            append(
                db.pool(),
                &NewChatMessage {
                    swap_request_id: swap_id,
                    sender_id: if i % 2 == 0 { alice } else { bob },
                    receiver_id: if i % 2 == 0 { bob } else { alice },
                    body: format!("message {i}"),
                },
            )
            .await
            .unwrap();
        }

        let history = list_for_swap(db.pool(), swap_id).await.unwrap();
        assert_eq!(history.len(), 4);
        for (i, message) in history.iter().enumerate() {
            assert_eq!(message.body, format!("message {i}"));
        }
        assert_eq!(history[0].sender_name, "Alice Brown");
        assert_eq!(history[1].sender_name, "Bob Johnson");

        // Reads are idempotent: same order every time.
        let replay = list_for_swap(db.pool(), swap_id).await.unwrap();
        assert_eq!(history, replay);
    }

    #[tokio::test]
    async fn test_active_chats_unread_counts() {
        let db = test_db().await;
        let (swap_id, alice, bob) = accepted_swap(&db).await;

        // Two messages to Bob, each with its chat_message notification.
        for body in ["hey", "are you there?"] {
            let message = append(
                db.pool(),
                &NewChatMessage {
                    swap_request_id: swap_id,
                    sender_id: alice,
                    receiver_id: bob,
                    body: body.to_string(),
                },
            )
            .await
            .unwrap();
            notification::append(
                db.pool(),
                bob,
                NotificationKind::ChatMessage,
                "New Message",
                "You have a new message from Alice Brown",
                Some(message.id),
            )
            .await
            .unwrap();
        }

        let bobs = active_chats(db.pool(), bob).await.unwrap();
        assert_eq!(bobs.len(), 1);
        assert_eq!(bobs[0].swap_request_id, swap_id);
        assert_eq!(bobs[0].other_user_name, "Alice Brown");
        assert_eq!(bobs[0].unread_count, 2);

        // Alice sees the same thread with nothing unread.
        let alices = active_chats(db.pool(), alice).await.unwrap();
        assert_eq!(alices.len(), 1);
        assert_eq!(alices[0].other_user_name, "Bob Johnson");
        assert_eq!(alices[0].unread_count, 0);

        // Reading the notifications drains the derived count.
        notification::mark_all_read(db.pool(), bob).await.unwrap();
        let bobs = active_chats(db.pool(), bob).await.unwrap();
        assert_eq!(bobs[0].unread_count, 0);
    }

    #[tokio::test]
    async fn test_pending_swaps_are_not_chats() {
        let db = test_db().await;
        let alice = create_user(db.pool(), "Alice Brown", "alice@example.com")
            .await
            .unwrap();
        let bob = create_user(db.pool(), "Bob Johnson", "bob@example.com")
            .await
            .unwrap();
        swap_request::create(
            db.pool(),
            &NewSwapRequest {
                from_user_id: alice.id,
                to_user_id: bob.id,
                offered_skill: "React".to_string(),
                wanted_skill: "Photoshop".to_string(),
                message: None,
            },
        )
        .await
        .unwrap();

        assert!(active_chats(db.pool(), bob.id).await.unwrap().is_empty());
        assert!(active_chats(db.pool(), alice.id).await.unwrap().is_empty());
    }
}
