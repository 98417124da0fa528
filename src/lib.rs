//! Bookshelf
//!
//! A personal book tracking server: users register, add books to their
//! library by ISBN (metadata from Open Library), search the public catalog
//! and delete their own entries. Responses are JSON.

use std::sync::Arc;

use async_trait::async_trait;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Reports whether the backing store is reachable
#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> AppResult<()>;
}

#[async_trait]
impl StoreHealth for repository::Repository {
    async fn ping(&self) -> AppResult<()> {
        repository::Repository::ping(self).await
    }
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<services::Services>,
    pub health: Arc<dyn StoreHealth>,
}
