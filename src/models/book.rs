//! Book model and catalog lookup types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// A book in somebody's library. The ISBN identifies the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    /// Owning user
    pub user_id: Uuid,
    pub date_created: DateTime<Utc>,
}

impl Book {
    pub fn new(user_id: Uuid, isbn: String, fields: BookFields) -> Self {
        Self {
            isbn,
            title: fields.title,
            author: fields.author,
            description: Some(fields.description),
            cover_image_url: Some(fields.cover),
            user_id,
            date_created: Utc::now(),
        }
    }
}

/// Normalized bibliographic fields returned by the catalog gateway.
/// Missing values are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub description: String,
    pub cover: String,
}

/// One search result from the external catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SearchHit {
    pub isbn: String,
    pub title: String,
    pub author: String,
}

/// `POST /add` form
#[derive(Debug, Deserialize, ToSchema)]
pub struct AddBookForm {
    #[serde(default)]
    pub isbn: String,
}

/// `GET /search` query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Words from the title
    #[serde(default)]
    pub title: String,
}

/// Trim an ISBN as submitted and check it is safe to use as a key and in a URL path
pub fn normalize_isbn(raw: &str) -> Option<String> {
    let isbn = raw.trim();
    if isbn.is_empty() || isbn.len() > 32 {
        return None;
    }
    if !isbn.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return None;
    }
    Some(isbn.to_string())
}
