//! Business logic services

pub mod books;
pub mod openlibrary;
pub mod users;

use std::sync::Arc;

use crate::{
    config::AuthConfig,
    repository::{BooksStore, UsersStore},
};

use self::openlibrary::CatalogGateway;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub books: books::BooksService,
}

impl Services {
    /// Wire services onto their stores and the external catalog
    pub fn new(
        users_store: Arc<dyn UsersStore>,
        books_store: Arc<dyn BooksStore>,
        catalog: Arc<dyn CatalogGateway>,
        auth_config: AuthConfig,
    ) -> Self {
        Self {
            users: users::UsersService::new(users_store, auth_config),
            books: books::BooksService::new(books_store, catalog),
        }
    }
}
