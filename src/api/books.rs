//! Library endpoints: list, add, delete and catalog search

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::book::{AddBookForm, Book, SearchHit, SearchQuery},
    AppState,
};

use super::{ApiForm, AuthenticatedUser, MessageResponse};

#[derive(Serialize, ToSchema)]
pub struct BooksResponse {
    pub books: Vec<Book>,
}

#[derive(Serialize, ToSchema)]
pub struct AddBookResponse {
    /// The book that was just added
    pub book: Book,
    /// Every book, including the new one
    pub books: Vec<Book>,
}

#[derive(Serialize, ToSchema)]
pub struct SearchResponse {
    pub books: Vec<SearchHit>,
}

/// List every book
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "All books", body = BooksResponse)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<BooksResponse>> {
    let books = state.services.books.list_all().await?;
    Ok(Json(BooksResponse { books }))
}

/// Add a book to the caller's library by ISBN
#[utoipa::path(
    post,
    path = "/add",
    tag = "books",
    security(("bearer_auth" = []), ("access_token" = [])),
    request_body(content = AddBookForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "Book added", body = AddBookResponse),
        (status = 400, description = "Missing or malformed ISBN"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "ISBN unknown to the catalog"),
        (status = 409, description = "ISBN already in the library"),
        (status = 502, description = "Catalog unavailable")
    )
)]
pub async fn add_book(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ApiForm(form): ApiForm<AddBookForm>,
) -> AppResult<(StatusCode, Json<AddBookResponse>)> {
    let book = state.services.books.add_by_isbn(user, &form.isbn).await?;
    let books = state.services.books.list_all().await?;

    Ok((StatusCode::CREATED, Json(AddBookResponse { book, books })))
}

/// Delete one of the caller's books
#[utoipa::path(
    delete,
    path = "/books/{isbn}",
    tag = "books",
    security(("bearer_auth" = []), ("access_token" = [])),
    params(
        ("isbn" = String, Path, description = "ISBN of the book")
    ),
    responses(
        (status = 200, description = "Book deleted", body = MessageResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Book absent or owned by another user")
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(isbn): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.services.books.delete_owned(&isbn, user.id).await?;

    Ok(Json(MessageResponse {
        message: "Book deleted successfully".to_string(),
    }))
}

/// Search the external catalog by title
#[utoipa::path(
    get,
    path = "/search",
    tag = "books",
    params(SearchQuery),
    responses(
        (status = 200, description = "Search results", body = SearchResponse),
        (status = 502, description = "Catalog unavailable")
    )
)]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<SearchResponse>> {
    let books = state.services.books.search(&query.title).await?;
    Ok(Json(SearchResponse { books }))
}
