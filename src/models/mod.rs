//! Data models for Bookshelf

pub mod book;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BookFields, SearchHit};
pub use user::{CurrentUser, Profile, User};
