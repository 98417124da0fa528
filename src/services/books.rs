//! Personal library service: listing, adding and deleting books

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{normalize_isbn, Book, BookFields, SearchHit},
        CurrentUser,
    },
    repository::BooksStore,
    services::openlibrary::CatalogGateway,
};

/// Shown both for books that do not exist and for books owned by someone else
pub const DELETE_DENIED: &str = "You do not have permission to delete this book.";

#[derive(Clone)]
pub struct BooksService {
    store: Arc<dyn BooksStore>,
    catalog: Arc<dyn CatalogGateway>,
}

impl BooksService {
    pub fn new(store: Arc<dyn BooksStore>, catalog: Arc<dyn CatalogGateway>) -> Self {
        Self { store, catalog }
    }

    /// Every book in the store
    pub async fn list_all(&self) -> AppResult<Vec<Book>> {
        self.store.books_list_all().await
    }

    pub async fn list_by_owner(&self, user_id: Uuid) -> AppResult<Vec<Book>> {
        self.store.books_list_by_owner(user_id).await
    }

    /// Insert a book for `user_id` with the given fields
    pub async fn add_for_user(
        &self,
        user_id: Uuid,
        isbn: &str,
        fields: BookFields,
    ) -> AppResult<Book> {
        self.ensure_absent(isbn).await?;
        self.insert(user_id, isbn, fields).await
    }

    /// Resolve an ISBN through the catalog and file it under the caller
    pub async fn add_by_isbn(&self, caller: CurrentUser, raw_isbn: &str) -> AppResult<Book> {
        let isbn = normalize_isbn(raw_isbn)
            .ok_or_else(|| AppError::Validation("A valid ISBN is required".to_string()))?;

        // Skip the remote call when the row could never be inserted
        self.ensure_absent(&isbn).await?;

        let fields = self.catalog.lookup_by_isbn(&isbn).await?;
        self.insert(caller.id, &isbn, fields).await
    }

    async fn ensure_absent(&self, isbn: &str) -> AppResult<()> {
        if self.store.books_get_by_isbn(isbn).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "A book with ISBN {} already exists",
                isbn
            )));
        }
        Ok(())
    }

    /// A row inserted by a concurrent request after `ensure_absent` is caught
    /// by the store's unique-violation mapping.
    async fn insert(&self, user_id: Uuid, isbn: &str, fields: BookFields) -> AppResult<Book> {
        let book = self
            .store
            .books_create(&Book::new(user_id, isbn.to_string(), fields))
            .await?;
        tracing::info!("User {} added book {}", user_id, book.isbn);
        Ok(book)
    }

    /// Delete a book the requester owns.
    ///
    /// Requested -> Found -> Authorized -> Deleted. A missing book and a book
    /// owned by someone else both end in the same `Authorization` error so the
    /// caller cannot learn whether the ISBN exists.
    pub async fn delete_owned(&self, isbn: &str, requester: Uuid) -> AppResult<()> {
        let denied = || AppError::Authorization(DELETE_DENIED.to_string());

        let Some(book) = self.store.books_get_by_isbn(isbn).await? else {
            tracing::debug!("Delete of {} denied: not found", isbn);
            return Err(denied());
        };

        if book.user_id != requester {
            tracing::warn!("User {} tried to delete book {} owned by another user", requester, isbn);
            return Err(denied());
        }

        if !self.store.books_delete_owned(isbn, requester).await? {
            // Removed concurrently between lookup and delete
            return Err(denied());
        }

        tracing::info!("User {} deleted book {}", requester, isbn);
        Ok(())
    }

    /// Free-text title search in the external catalog
    pub async fn search(&self, title: &str) -> AppResult<Vec<SearchHit>> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(Vec::new());
        }
        self.catalog.search_by_title(title).await
    }
}
