use sqlx::PgPool;

use super::types::{NewUser, User};
use crate::db;

const SELECT_USER: &str = "SELECT id, username, email, password, created_at FROM users";

/// Insert a user and return the new id.
pub async fn create(pool: &PgPool, user: &NewUser) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as(
        "INSERT INTO users (username, email, password, created_at) \
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(user.username.trim())
    .bind(user.email.trim())
    .bind(&user.password)
    .bind(db::now())
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE username = $1"))
        .bind(username.trim())
        .fetch_optional(pool)
        .await
}

/// Whether the username or the email is already registered.
pub async fn exists(pool: &PgPool, username: &str, email: &str) -> Result<bool, sqlx::Error> {
    let row: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM users WHERE username = $1 OR email = $2",
    )
    .bind(username.trim())
    .bind(email.trim())
    .fetch_one(pool)
    .await?;
    Ok(row.0 > 0)
}
