//! Open Library client: ISBN lookup and title search
//!
//! All knowledge of the remote response shapes lives in this module. Callers
//! only ever see [`BookFields`] and [`SearchHit`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::{
    config::CatalogConfig,
    error::{AppError, AppResult},
    models::{BookFields, SearchHit},
};

const COVERS_BASE_URL: &str = "https://covers.openlibrary.org/b/id";

/// External bibliographic catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    /// Fetch the record for one ISBN
    async fn lookup_by_isbn(&self, isbn: &str) -> AppResult<BookFields>;

    /// Free-text title search, in the remote service's ordering
    async fn search_by_title(&self, title: &str) -> AppResult<Vec<SearchHit>>;
}

#[derive(Clone)]
pub struct OpenLibraryClient {
    client: Client,
    base_url: String,
}

impl OpenLibraryClient {
    pub fn new(config: &CatalogConfig) -> AppResult<Self> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json(&self, request: reqwest::RequestBuilder) -> AppResult<Option<Value>> {
        let response = request
            .send()
            .await
            .map_err(|e| AppError::Gateway(format!("Request to Open Library failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(AppError::Gateway(format!(
                "Open Library answered with status {}",
                status
            )));
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| AppError::Gateway(format!("Invalid JSON from Open Library: {}", e)))?;
        Ok(Some(body))
    }
}

#[async_trait]
impl CatalogGateway for OpenLibraryClient {
    async fn lookup_by_isbn(&self, isbn: &str) -> AppResult<BookFields> {
        let url = format!("{}/isbn/{}.json", self.base_url, isbn);
        tracing::debug!("Open Library lookup: {}", url);

        match self.get_json(self.client.get(&url)).await? {
            Some(record) => Ok(normalize_isbn_record(&record)),
            None => Err(AppError::NotFound(format!("No catalog record for ISBN {}", isbn))),
        }
    }

    async fn search_by_title(&self, title: &str) -> AppResult<Vec<SearchHit>> {
        let url = format!("{}/search.json", self.base_url);
        tracing::debug!("Open Library search: {:?}", title);

        let request = self.client.get(&url).query(&[("q", title)]);
        let body = self.get_json(request).await?.unwrap_or(Value::Null);
        let hits = normalize_search_results(&body);

        tracing::debug!("Open Library search returned {} documents", hits.len());
        Ok(hits)
    }
}

/// Map an `/isbn/{isbn}.json` record onto book fields
pub fn normalize_isbn_record(record: &Value) -> BookFields {
    let cover = match record.get("cover").and_then(Value::as_str) {
        Some(cover) => cover.to_string(),
        None => record
            .get("covers")
            .and_then(Value::as_array)
            // -1 marks a removed cover
            .and_then(|ids| ids.iter().filter_map(Value::as_i64).find(|id| *id > 0))
            .map(|id| format!("{}/{}-L.jpg", COVERS_BASE_URL, id))
            .unwrap_or_default(),
    };

    BookFields {
        title: string_field(record, "title"),
        author: string_field(record, "by_statement"),
        description: text_field(record, "description"),
        cover,
    }
}

/// Map a `/search.json` body onto search hits
pub fn normalize_search_results(body: &Value) -> Vec<SearchHit> {
    let Some(docs) = body.get("docs").and_then(Value::as_array) else {
        return Vec::new();
    };

    docs.iter()
        .map(|doc| SearchHit {
            isbn: first_string(doc, "isbn"),
            title: string_field(doc, "title"),
            author: first_string(doc, "author_name"),
        })
        .collect()
}

fn string_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Plain string, or Open Library's `{"type": "/type/text", "value": ...}`
fn text_field(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(obj @ Value::Object(_)) => string_field(obj, "value"),
        _ => String::new(),
    }
}

/// First element of a string list; a bare string is accepted too
fn first_string(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::Array(items)) => items
            .first()
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}
