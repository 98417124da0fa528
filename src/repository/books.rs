//! Books repository for database operations

use async_trait::async_trait;
use uuid::Uuid;

use super::{BooksStore, Repository};
use crate::{
    error::{is_unique_violation, AppError, AppResult},
    models::Book,
};

#[async_trait]
impl BooksStore for Repository {
    async fn books_list_all(&self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY date_created, isbn")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn books_list_by_owner(&self, user_id: Uuid) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(
            "SELECT * FROM books WHERE user_id = $1 ORDER BY date_created, isbn",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn books_get_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE isbn = $1")
            .bind(isbn)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    async fn books_create(&self, book: &Book) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (isbn, title, author, description, cover_image_url, user_id, date_created)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&book.isbn)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.description)
        .bind(&book.cover_image_url)
        .bind(book.user_id)
        .bind(book.date_created)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict(format!("A book with ISBN {} already exists", book.isbn))
            } else {
                AppError::Database(e)
            }
        })
    }

    async fn books_delete_owned(&self, isbn: &str, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE isbn = $1 AND user_id = $2")
            .bind(isbn)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
