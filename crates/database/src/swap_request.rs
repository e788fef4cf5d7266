//! Swap request storage and the pending → terminal status transition.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{NewSwapRequest, SwapRequest, SwapRequestWithPeer, SwapStatus};

/// Create a new swap request. The stored status is always `pending`.
pub async fn create(pool: &SqlitePool, new: &NewSwapRequest) -> Result<SwapRequest> {
    let result = sqlx::query(
        r#"
        INSERT INTO swap_requests (from_user_id, to_user_id, offered_skill, wanted_skill, message)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(new.from_user_id)
    .bind(new.to_user_id)
    .bind(&new.offered_skill)
    .bind(&new.wanted_skill)
    .bind(&new.message)
    .execute(pool)
    .await?;

    get(pool, result.last_insert_rowid()).await
}

/// Get a swap request by ID.
pub async fn get(pool: &SqlitePool, id: i64) -> Result<SwapRequest> {
    sqlx::query_as::<_, SwapRequest>(
        r#"
        SELECT id, from_user_id, to_user_id, offered_skill, wanted_skill,
               message, status, created_at, updated_at
        FROM swap_requests
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "SwapRequest",
        id: id.to_string(),
    })
}

/// Atomically move a pending request to a terminal status.
///
/// Returns `true` when this call won the transition. `false` means the
/// request either doesn't exist or was already terminal; the caller
/// disambiguates with [`get`]. Two concurrent calls racing to set
/// different terminal statuses cannot both succeed.
pub async fn set_status_if_pending(
    pool: &SqlitePool,
    id: i64,
    status: SwapStatus,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE swap_requests
        SET status = ?, updated_at = datetime('now')
        WHERE id = ? AND status = 'pending'
        "#,
    )
    .bind(status)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// List requests received by a user, newest first, joined with the
/// sender's identity.
pub async fn list_received(pool: &SqlitePool, user_id: i64) -> Result<Vec<SwapRequestWithPeer>> {
    let requests = sqlx::query_as::<_, SwapRequestWithPeer>(
        r#"
        SELECT sr.id, sr.from_user_id, sr.to_user_id, sr.offered_skill, sr.wanted_skill,
               sr.message, sr.status, sr.created_at, sr.updated_at,
               u.name AS peer_name, u.email AS peer_email
        FROM swap_requests sr
        JOIN users u ON sr.from_user_id = u.id
        WHERE sr.to_user_id = ?
        ORDER BY sr.created_at DESC, sr.id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(requests)
}

/// List requests sent by a user, newest first, joined with the
/// recipient's identity.
pub async fn list_sent(pool: &SqlitePool, user_id: i64) -> Result<Vec<SwapRequestWithPeer>> {
    let requests = sqlx::query_as::<_, SwapRequestWithPeer>(
        r#"
        SELECT sr.id, sr.from_user_id, sr.to_user_id, sr.offered_skill, sr.wanted_skill,
               sr.message, sr.status, sr.created_at, sr.updated_at,
               u.name AS peer_name, u.email AS peer_email
        FROM swap_requests sr
        JOIN users u ON sr.to_user_id = u.id
        WHERE sr.from_user_id = ?
        ORDER BY sr.created_at DESC, sr.id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(requests)
}

/// Count swap requests grouped by status.
pub async fn count_by_status(pool: &SqlitePool) -> Result<Vec<(SwapStatus, i64)>> {
    let rows = sqlx::query_as::<_, (SwapStatus, i64)>(
        r#"
        SELECT status, COUNT(*) as count
        FROM swap_requests
        GROUP BY status
        ORDER BY count DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
