//! User CRUD operations and skill-set management.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{User, UserWithSkills};

/// Create a new user.
pub async fn create_user(pool: &SqlitePool, name: &str, email: &str) -> Result<User> {
    let result = sqlx::query(
        r#"
        INSERT INTO users (name, email)
        VALUES (?, ?)
        "#,
    )
    .bind(name)
    .bind(email)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "User",
                    id: email.to_string(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    get_user(pool, result.last_insert_rowid()).await
}

/// Get a user by ID.
pub async fn get_user(pool: &SqlitePool, id: i64) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, status, created_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "User",
        id: id.to_string(),
    })
}

/// Get a user by email.
pub async fn get_user_by_email(pool: &SqlitePool, email: &str) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, status, created_at
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "User",
        id: email.to_string(),
    })
}

/// Update a user's basic info.
pub async fn update_user(pool: &SqlitePool, id: i64, name: &str, email: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET name = ?, email = ?
        WHERE id = ?
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "User",
                    id: email.to_string(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "User",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// List all users.
pub async fn list_users(pool: &SqlitePool) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, status, created_at
        FROM users
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(users)
}

/// Count total users.
pub async fn count_users(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM users
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Replace a user's offered and wanted skill sets.
///
/// The whole set is swapped out in one transaction, matching the
/// remove-then-insert contract of profile edits.
pub async fn replace_skills(
    pool: &SqlitePool,
    user_id: i64,
    offered: &[String],
    wanted: &[String],
) -> Result<()> {
    // Fails with NotFound before touching any rows.
    get_user(pool, user_id).await?;

    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM user_skills WHERE user_id = ?")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    for (direction, skills) in [("offered", offered), ("wanted", wanted)] {
        for skill in skills {
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO user_skills (user_id, skill, direction)
                VALUES (?, ?, ?)
                "#,
            )
            .bind(user_id)
            .bind(skill)
            .bind(direction)
            .execute(&mut *tx)
            .await?;
        }
    }

    tx.commit().await?;
    Ok(())
}

/// Get a user together with their skill sets.
pub async fn get_user_with_skills(pool: &SqlitePool, id: i64) -> Result<UserWithSkills> {
    let user = get_user(pool, id).await?;
    let skills_offered = list_skills(pool, id, "offered").await?;
    let skills_wanted = list_skills(pool, id, "wanted").await?;

    Ok(UserWithSkills {
        user,
        skills_offered,
        skills_wanted,
    })
}

async fn list_skills(pool: &SqlitePool, user_id: i64, direction: &str) -> Result<Vec<String>> {
    let skills = sqlx::query_scalar::<_, String>(
        r#"
        SELECT skill
        FROM user_skills
        WHERE user_id = ? AND direction = ?
        ORDER BY skill
        "#,
    )
    .bind(user_id)
    .bind(direction)
    .fetch_all(pool)
    .await?;

    Ok(skills)
}
