//! Notification append log and read/unread queries.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{Notification, NotificationKind};

/// Append a notification for a user. Returns the new notification's ID.
pub async fn append(
    pool: &SqlitePool,
    user_id: i64,
    kind: NotificationKind,
    title: &str,
    body: &str,
    related_id: Option<i64>,
) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO notifications (user_id, kind, title, body, related_id)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(kind)
    .bind(title)
    .bind(body)
    .bind(related_id)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// List a user's notifications, newest first.
pub async fn list_for(pool: &SqlitePool, user_id: i64, limit: i64) -> Result<Vec<Notification>> {
    let notifications = sqlx::query_as::<_, Notification>(
        r#"
        SELECT id, user_id, kind, title, body, related_id, is_read, created_at
        FROM notifications
        WHERE user_id = ?
        ORDER BY created_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(notifications)
}

/// Mark a single notification as read.
pub async fn mark_read(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE notifications
        SET is_read = 1
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Notification",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Mark all of a user's notifications as read. Returns how many changed.
pub async fn mark_all_read(pool: &SqlitePool, user_id: i64) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE notifications
        SET is_read = 1
        WHERE user_id = ? AND is_read = 0
        "#,
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Count a user's unread notifications.
pub async fn unread_count(pool: &SqlitePool, user_id: i64) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM notifications
        WHERE user_id = ? AND is_read = 0
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Count all unread notifications across users.
pub async fn total_unread_count(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM notifications
        WHERE is_read = 0
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
