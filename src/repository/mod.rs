//! Repository layer for database operations

pub mod books;
pub mod users;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Book, User},
};

/// Persistence of user accounts
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersStore: Send + Sync {
    /// Insert a new user row
    async fn users_create(&self, user: &User) -> AppResult<()>;

    async fn users_get_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn users_get_by_username(&self, username: &str) -> AppResult<Option<User>>;

    async fn users_get_by_token(&self, token: &str) -> AppResult<Option<User>>;

    async fn users_username_exists(&self, username: &str) -> AppResult<bool>;
}

/// Persistence of catalog rows
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BooksStore: Send + Sync {
    /// All books in insertion order
    async fn books_list_all(&self) -> AppResult<Vec<Book>>;

    async fn books_list_by_owner(&self, user_id: Uuid) -> AppResult<Vec<Book>>;

    async fn books_get_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>>;

    /// Insert a book. A taken ISBN is reported as `AppError::Conflict`.
    async fn books_create(&self, book: &Book) -> AppResult<Book>;

    /// Delete the book only if it belongs to `user_id`; returns whether a row went away
    async fn books_delete_owned(&self, isbn: &str, user_id: Uuid) -> AppResult<bool>;
}

/// Postgres-backed repository holding the connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Round-trip to the database, used by the readiness check
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
