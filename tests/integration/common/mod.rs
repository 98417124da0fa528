//! In-memory stand-ins for Postgres and Open Library

use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use axum::{body::Body, http::Request, Router};
use http_body_util::BodyExt;
use serde_json::Value;
use uuid::Uuid;

use bookshelf_server::{
    api,
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{Book, BookFields, SearchHit, User},
    repository::{BooksStore, UsersStore},
    services::{openlibrary::CatalogGateway, Services},
    AppState, StoreHealth,
};

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    books: Mutex<Vec<Book>>,
}

impl MemoryStore {
    pub fn users_snapshot(&self) -> Vec<User> {
        self.users.lock().unwrap().clone()
    }

    pub fn books_snapshot(&self) -> Vec<Book> {
        self.books.lock().unwrap().clone()
    }
}

#[async_trait]
impl UsersStore for MemoryStore {
    async fn users_create(&self, user: &User) -> AppResult<()> {
        let mut users = self.users.lock().unwrap();
        if users
            .iter()
            .any(|u| u.id == user.id || u.token == user.token || u.username == user.username)
        {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn users_get_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn users_get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn users_get_by_token(&self, token: &str) -> AppResult<Option<User>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.token == token).cloned())
    }

    async fn users_username_exists(&self, username: &str) -> AppResult<bool> {
        Ok(self.users.lock().unwrap().iter().any(|u| u.username == username))
    }
}

#[async_trait]
impl BooksStore for MemoryStore {
    async fn books_list_all(&self) -> AppResult<Vec<Book>> {
        Ok(self.books.lock().unwrap().clone())
    }

    async fn books_list_by_owner(&self, user_id: Uuid) -> AppResult<Vec<Book>> {
        Ok(self
            .books
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn books_get_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        Ok(self.books.lock().unwrap().iter().find(|b| b.isbn == isbn).cloned())
    }

    async fn books_create(&self, book: &Book) -> AppResult<Book> {
        let mut books = self.books.lock().unwrap();
        if books.iter().any(|b| b.isbn == book.isbn) {
            return Err(AppError::Conflict(format!(
                "A book with ISBN {} already exists",
                book.isbn
            )));
        }
        books.push(book.clone());
        Ok(book.clone())
    }

    async fn books_delete_owned(&self, isbn: &str, user_id: Uuid) -> AppResult<bool> {
        let mut books = self.books.lock().unwrap();
        let before = books.len();
        books.retain(|b| !(b.isbn == isbn && b.user_id == user_id));
        Ok(books.len() < before)
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

/// Canned catalog; can be switched into an outage
#[derive(Default)]
pub struct StubCatalog {
    records: HashMap<String, BookFields>,
    hits: Vec<SearchHit>,
    down: AtomicBool,
}

impl StubCatalog {
    pub fn with_record(mut self, isbn: &str, title: &str, author: &str) -> Self {
        self.records.insert(
            isbn.to_string(),
            BookFields {
                title: title.to_string(),
                author: author.to_string(),
                description: format!("About {}", title),
                cover: format!("https://covers.example/{}.jpg", isbn),
            },
        );
        self
    }

    pub fn with_hit(mut self, isbn: &str, title: &str, author: &str) -> Self {
        self.hits.push(SearchHit {
            isbn: isbn.to_string(),
            title: title.to_string(),
            author: author.to_string(),
        });
        self
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    fn check(&self) -> AppResult<()> {
        if self.down.load(Ordering::SeqCst) {
            return Err(AppError::Gateway("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogGateway for StubCatalog {
    async fn lookup_by_isbn(&self, isbn: &str) -> AppResult<BookFields> {
        self.check()?;
        self.records
            .get(isbn)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("No catalog record for ISBN {}", isbn)))
    }

    async fn search_by_title(&self, title: &str) -> AppResult<Vec<SearchHit>> {
        self.check()?;
        let needle = title.to_lowercase();
        Ok(self
            .hits
            .iter()
            .filter(|h| h.title.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }
}

pub struct TestApp {
    pub router: Router,
    pub services: Arc<Services>,
    pub store: Arc<MemoryStore>,
    pub catalog: Arc<StubCatalog>,
}

pub fn setup(catalog: StubCatalog) -> TestApp {
    let store = Arc::new(MemoryStore::default());
    let catalog = Arc::new(catalog);
    let auth = AuthConfig {
        jwt_secret: "test-secret".to_string(),
        jwt_expiration_hours: 1,
    };
    let services = Arc::new(Services::new(
        store.clone(),
        store.clone(),
        catalog.clone(),
        auth,
    ));
    let state = AppState {
        services: services.clone(),
        health: store.clone(),
    };

    TestApp {
        router: api::router(state),
        services,
        store,
        catalog,
    }
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

pub fn form_request(uri: &str, form: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::from(form.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn authed(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
