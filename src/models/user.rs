//! User model and related types

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::book::Book;

/// Usernames are restricted to word characters
pub static USERNAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\w+$").unwrap());

/// Length in bytes of the random material behind a bearer token
pub const TOKEN_BYTES: usize = 24;

/// Full user model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub first: String,
    pub last: String,
    pub username: String,
    pub email: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email_verified: bool,
    /// Opaque API token, only shown to its owner through the profile view
    #[serde(skip_serializing)]
    pub token: String,
    pub date_created: DateTime<Utc>,
}

impl User {
    /// Build a fresh user. The id and the bearer token are generated here and
    /// never change afterwards.
    pub fn new(
        first: String,
        last: String,
        username: String,
        email: String,
        password_hash: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            first,
            last,
            username,
            email,
            password_hash,
            email_verified: false,
            token: generate_token(),
            date_created: Utc::now(),
        }
    }

    pub fn identity(&self) -> CurrentUser {
        CurrentUser { id: self.id }
    }
}

/// Random hex token, independent of any user attribute
pub fn generate_token() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// The only view of a user handed to the request/session machinery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Uuid,
}

impl CurrentUser {
    pub fn is_authenticated(&self) -> bool {
        true
    }
}

/// Registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterUser {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last: String,
    #[validate(regex(path = *USERNAME_RE, message = "Username may only contain letters, digits and underscores"))]
    pub username: String,
    #[serde(default)]
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Invalid email format")
    )]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Sign-in request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignIn {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Owner's view of their own account
#[derive(Debug, Serialize, ToSchema)]
pub struct Profile {
    pub id: Uuid,
    pub first: String,
    pub last: String,
    pub username: String,
    pub email: String,
    pub email_verified: bool,
    /// Bearer token for the `x-access-token` header
    pub token: String,
    pub date_created: DateTime<Utc>,
    pub books: Vec<Book>,
}

impl Profile {
    pub fn new(user: User, books: Vec<Book>) -> Self {
        Self {
            id: user.id,
            first: user.first,
            last: user.last,
            username: user.username,
            email: user.email,
            email_verified: user.email_verified,
            token: user.token,
            date_created: user.date_created,
            books,
        }
    }
}

/// JWT claims for a signed-in session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id
    pub sub: Uuid,
    pub exp: i64,
    pub iat: i64,
}

impl SessionClaims {
    pub fn new(user_id: Uuid, lifetime_hours: u64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id,
            exp: now + (lifetime_hours as i64 * 3600),
            iat: now,
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}
