//! User queries
//!
//! Every statement binds its values; nothing from a request is interpolated
//! into SQL text.

use crate::error::{Result, StorageError};
use roster_core::types::{NewUser, User, UserId};
use sqlx::MySqlConnection;

/// Get all users in the server's default order
pub async fn get_all(conn: &mut MySqlConnection) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>("SELECT id, name, email, created_at FROM users")
        .fetch_all(conn)
        .await?;

    Ok(users)
}

/// Get one user by exact id
pub async fn get_by_id(conn: &mut MySqlConnection, id: UserId) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, created_at FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(user)
}

/// Insert a user and return the id the server assigned
pub async fn create(conn: &mut MySqlConnection, user: &NewUser) -> Result<UserId> {
    let result = sqlx::query("INSERT INTO users (name, email) VALUES (?, ?)")
        .bind(user.name())
        .bind(user.email())
        .execute(conn)
        .await?;

    let id = i64::try_from(result.last_insert_id())
        .map_err(|_| StorageError::Query("inserted id out of range".to_string()))?;

    Ok(UserId::new(id))
}

/// Update name and email; returns whether a row matched `id`
pub async fn update(conn: &mut MySqlConnection, id: UserId, user: &NewUser) -> Result<bool> {
    let result = sqlx::query("UPDATE users SET name = ?, email = ? WHERE id = ?")
        .bind(user.name())
        .bind(user.email())
        .bind(id)
        .execute(conn)
        .await?;

    // sqlx negotiates CLIENT_FOUND_ROWS, so an unchanged row still counts
    Ok(result.rows_affected() > 0)
}

/// Delete a user; returns whether a row was removed
pub async fn delete(conn: &mut MySqlConnection, id: UserId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected() > 0)
}
