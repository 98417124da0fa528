//! Users repository for database operations

use async_trait::async_trait;
use uuid::Uuid;

use super::{Repository, UsersStore};
use crate::{
    error::{is_unique_violation, violated_constraint, AppError, AppResult},
    models::User,
};

#[async_trait]
impl UsersStore for Repository {
    async fn users_create(&self, user: &User) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, first, last, username, email, password_hash,
                               email_verified, token, date_created)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.id)
        .bind(&user.first)
        .bind(&user.last)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.email_verified)
        .bind(&user.token)
        .bind(user.date_created)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                user_conflict(violated_constraint(&e))
            } else {
                AppError::Database(e)
            }
        })?;

        Ok(())
    }

    async fn users_get_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn users_get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn users_get_by_token(&self, token: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn users_username_exists(&self, username: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}

/// Unique constraint on `users.username`
const USERNAME_CONSTRAINT: &str = "users_username_key";

/// Only a username clash is the caller's fault; the id and token are generated
/// server side, so a collision on those is reported as a failed attempt.
fn user_conflict(constraint: Option<&str>) -> AppError {
    match constraint {
        Some(USERNAME_CONSTRAINT) => AppError::Conflict("Username already exists".to_string()),
        other => AppError::Internal(format!(
            "generated account identifier collided on {}",
            other.unwrap_or("an unnamed constraint")
        )),
    }
}
